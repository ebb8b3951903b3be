use reqwest::StatusCode;
use snafu::{Location, Snafu};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// The request never produced a response, connection failures,
    /// timeouts and middleware errors end up here after the retry
    /// policy is exhausted.
    #[snafu(display("HTTP request error"))]
    Request {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: reqwest_middleware::Error,
    },
    #[snafu(display("Failed to read the response body"))]
    Body {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: reqwest::Error,
    },
    #[snafu(display("HTTP request failed, status: '{status}', url: '{url}', body: '{body}'"))]
    FailedRequest {
        #[snafu(implicit)]
        location: Location,
        url: String,
        status: StatusCode,
        body: String,
    },
}

impl Error {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Request { .. } | Error::Body { .. } => None,
            Error::FailedRequest { status, .. } => Some(*status),
        }
    }

    pub fn body(&self) -> Option<&str> {
        match self {
            Error::Request { .. } | Error::Body { .. } => None,
            Error::FailedRequest { body, .. } => Some(body),
        }
    }

    /// Whether the request failed without the backend producing any
    /// response at all.
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Request { .. })
    }
}
