#![deny(warnings)]
#![deny(rust_2018_idioms)]

use config::{Config, File};
use vessel_search::Settings;

pub mod search;

#[test]
fn local_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/local.yml").required(true))
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}

#[test]
fn development_settings_are_valid() {
    Config::builder()
        .add_source(File::with_name("config/development.yml").required(true))
        .build()
        .unwrap()
        .try_deserialize::<Settings>()
        .unwrap();
}
