#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod distance;
mod domain;
mod error;
mod geocell;
mod ports;
mod query;

pub use distance::*;
pub use domain::*;
pub use error::{BackendError, BoxError, Error, Result};
pub use geocell::*;
pub use ports::*;
pub use query::*;
