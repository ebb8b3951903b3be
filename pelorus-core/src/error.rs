use snafu::{Location, Snafu};

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures surfaced by a search backend adapter, classified into the
/// cases the retrieval loop reacts to.
#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum BackendError {
    #[snafu(display("Search backend unreachable or timed out"))]
    Connection {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        opaque: BoxError,
    },
    #[snafu(display("Backend rejected the aggregation shape: {reason}"))]
    QueryShape {
        #[snafu(implicit)]
        location: Location,
        reason: String,
    },
    #[snafu(display("Backend request failed with status '{status}': {body}"))]
    Response {
        #[snafu(implicit)]
        location: Location,
        status: u16,
        body: String,
    },
    #[snafu(display("Malformed aggregation response"))]
    Decode {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        opaque: BoxError,
    },
}

#[derive(Debug, Snafu)]
#[snafu(module, visibility(pub))]
pub enum Error {
    #[snafu(display("Search backend failure"))]
    #[snafu(context(false))]
    Backend {
        #[snafu(implicit)]
        location: Location,
        #[snafu(source)]
        error: BackendError,
    },
    #[snafu(display("'{given}' is not a valid YYYY-MM-DD date"))]
    InvalidDate {
        #[snafu(implicit)]
        location: Location,
        given: String,
        #[snafu(source)]
        error: chrono::ParseError,
    },
    #[snafu(display("Position ({latitude}, {longitude}) is outside the valid coordinate range"))]
    InvalidCoordinate {
        #[snafu(implicit)]
        location: Location,
        latitude: f64,
        longitude: f64,
        #[snafu(source)]
        error: geohash::GeohashError,
    },
}
