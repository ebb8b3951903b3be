use http_client::StatusCode;
use pelorus_core::BackendError;
use snafu::{Location, Snafu};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("HTTP transfer failed"))]
    Http {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: http_client::Error,
    },
    #[snafu(display("'{value}' is not a recognized timestamp"))]
    ParseTimestamp {
        #[snafu(implicit)]
        location: Location,
        value: String,
        #[snafu(source)]
        error: chrono::ParseError,
    },
    #[snafu(display("Failed to serialize a bulk document"))]
    Serialize {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: serde_json::Error,
    },
    #[snafu(display("Bulk indexing reported {failures} failed documents"))]
    Bulk {
        #[snafu(implicit)]
        location: Location,
        failures: usize,
    },
}

/// Classifies adapter failures into the cases the retrieval loop reacts
/// to. A 400 points at the aggregation body itself, everything else the
/// backend answered with is a plain response failure.
impl From<Error> for BackendError {
    #[track_caller]
    fn from(value: Error) -> Self {
        let caller = std::panic::Location::caller();
        let location = Location::new(caller.file(), caller.line(), caller.column());

        match value {
            Error::Http { error, .. } => match error {
                http_client::Error::FailedRequest { status, body, .. }
                    if status == StatusCode::BAD_REQUEST =>
                {
                    BackendError::QueryShape {
                        location,
                        reason: body,
                    }
                }
                http_client::Error::FailedRequest { status, body, .. } => BackendError::Response {
                    location,
                    status: status.as_u16(),
                    body,
                },
                error @ http_client::Error::Request { .. } => BackendError::Connection {
                    location,
                    opaque: Box::new(error),
                },
                error @ http_client::Error::Body { .. } => BackendError::Decode {
                    location,
                    opaque: Box::new(error),
                },
            },
            error @ (Error::ParseTimestamp { .. } | Error::Serialize { .. }) => {
                BackendError::Decode {
                    location,
                    opaque: Box::new(error),
                }
            }
            Error::Bulk { failures, .. } => BackendError::Response {
                location,
                status: StatusCode::OK.as_u16(),
                body: format!("bulk indexing reported {failures} failed documents"),
            },
        }
    }
}
