#![deny(warnings)]
#![deny(rust_2018_idioms)]

mod client;
mod error;
mod request;
mod response;

pub use reqwest::StatusCode;

pub use client::{DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT, HttpClient, HttpClientBuilder};
pub use error::{Error, Result};
pub use request::RequestBuilder;
pub use response::Response;
