#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod rank;
mod search;
pub mod settings;
mod stats;

pub use rank::*;
pub use search::*;
pub use settings::Settings;
pub use stats::*;
