use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maritime Mobile Service Identity, the vessel key of the AIS data set.
///
/// Kept in the raw string form used by the source data and by the
/// backend's terms buckets, so identifiers with leading zeros survive
/// round-trips untouched.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct Mmsi(String);

/// A single AIS position report as stored in the backing index.
///
/// Static vessel fields are carried per report because the source data
/// repeats them on every row.
#[derive(Debug, Clone)]
pub struct AisPing {
    pub mmsi: Mmsi,
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_over_ground: Option<f64>,
    pub course_over_ground: Option<f64>,
    pub heading: Option<f64>,
    pub vessel_name: Option<String>,
    pub imo: Option<String>,
    pub call_sign: Option<String>,
    pub ship_type: Option<String>,
    pub navigational_status: Option<i32>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub draft: Option<f64>,
    pub cargo: Option<i32>,
    pub transceiver_class: Option<String>,
}

/// The reduced form of a ping kept after spatial downsampling.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct TrackPoint {
    pub timestamp: DateTime<Utc>,
    pub latitude: f64,
    pub longitude: f64,
}

impl Mmsi {
    pub fn new(mmsi: impl Into<String>) -> Self {
        Self(mmsi.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<String> for Mmsi {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Mmsi {
    fn from(value: &str) -> Self {
        Self(value.into())
    }
}

impl Display for Mmsi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&AisPing> for TrackPoint {
    fn from(ping: &AisPing) -> Self {
        Self {
            timestamp: ping.timestamp,
            latitude: ping.latitude,
            longitude: ping.longitude,
        }
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl Mmsi {
        pub fn test_new(mmsi: &str) -> Self {
            Self(mmsi.into())
        }
    }

    impl AisPing {
        pub fn test_default(mmsi: Mmsi, timestamp: DateTime<Utc>) -> Self {
            Self {
                mmsi,
                timestamp,
                latitude: 57.0,
                longitude: 5.0,
                speed_over_ground: Some(8.5),
                course_over_ground: Some(180.0),
                heading: Some(180.0),
                vessel_name: Some("test_vessel".to_string()),
                imo: Some("IMO9735206".to_string()),
                call_sign: Some("LF5678".to_string()),
                ship_type: Some("70".to_string()),
                navigational_status: Some(0),
                length: Some(100.0),
                width: Some(20.0),
                draft: Some(8.0),
                cargo: Some(70),
                transceiver_class: Some("A".to_string()),
            }
        }
    }

    impl TrackPoint {
        pub fn test_new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
            Self {
                timestamp,
                latitude,
                longitude,
            }
        }
    }
}
