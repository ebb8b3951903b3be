use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Mmsi, TrackPoint};
use crate::{downsample, track_distance_miles};

/// IMO placeholder emitted by feeds that do not know the vessel's number.
pub const UNKNOWN_IMO: &str = "IMO0000000";

/// Static vessel metadata attached to every position report.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct VesselStatics {
    pub name: Option<String>,
    pub imo: Option<String>,
    pub call_sign: Option<String>,
    pub ship_type: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub draft: Option<f64>,
}

/// A vessel's downsampled track for one day and the distance covered by it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct VesselTrack {
    pub mmsi: Mmsi,
    pub vessel: VesselStatics,
    pub track: Vec<TrackPoint>,
    pub distance_miles: f64,
}

/// Condensed view of a track handed to report consumers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackSummary {
    pub point_count: usize,
    pub distance_miles: f64,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VesselValidation {
    pub is_valid: bool,
    pub issues: Vec<VesselDataIssue>,
    pub completeness_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum VesselDataIssue {
    MissingMmsi,
    MissingName,
    MissingTrack,
    ShortTrack,
}

impl VesselStatics {
    pub fn has_name(&self) -> bool {
        self.name.as_deref().is_some_and(|v| !v.is_empty())
    }

    pub fn has_real_imo(&self) -> bool {
        self.imo
            .as_deref()
            .is_some_and(|v| !v.is_empty() && v != UNKNOWN_IMO)
    }
}

impl VesselTrack {
    /// Downsamples the given points to one per cell and computes the
    /// distance over the retained track.
    pub fn from_points(mmsi: Mmsi, vessel: VesselStatics, points: Vec<TrackPoint>) -> Self {
        let track = downsample(points);
        let distance_miles = track_distance_miles(&track);
        Self {
            mmsi,
            vessel,
            track,
            distance_miles,
        }
    }

    /// Adds points from a later retrieval round, re-downsamples the
    /// combined track and recomputes its distance.
    pub fn extend_with(&mut self, points: Vec<TrackPoint>) {
        let mut combined = std::mem::take(&mut self.track);
        combined.extend(points);
        self.track = downsample(combined);
        self.distance_miles = track_distance_miles(&self.track);
    }

    pub fn summary(&self) -> TrackSummary {
        TrackSummary {
            point_count: self.track.len(),
            distance_miles: self.distance_miles,
            start: self.track.first().map(|p| p.timestamp),
            end: self.track.last().map(|p| p.timestamp),
        }
    }

    pub fn validate(&self) -> VesselValidation {
        let mut issues = Vec::new();

        if self.mmsi.as_str().is_empty() {
            issues.push(VesselDataIssue::MissingMmsi);
        }
        if !self.vessel.has_name() {
            issues.push(VesselDataIssue::MissingName);
        }
        if self.track.is_empty() {
            issues.push(VesselDataIssue::MissingTrack);
        } else if self.track.len() < 2 {
            issues.push(VesselDataIssue::ShortTrack);
        }

        let fields = [
            !self.mmsi.as_str().is_empty(),
            self.vessel.has_name(),
            self.vessel.has_real_imo(),
            present_str(&self.vessel.call_sign),
            present_str(&self.vessel.ship_type),
            present_dim(self.vessel.length),
            present_dim(self.vessel.width),
            present_dim(self.vessel.draft),
        ];
        let present = fields.iter().filter(|v| **v).count();

        VesselValidation {
            is_valid: !issues.iter().any(|i| i.is_fatal()),
            completeness_score: present as f64 / fields.len() as f64,
            issues,
        }
    }
}

impl VesselDataIssue {
    pub fn is_fatal(self) -> bool {
        matches!(self, Self::MissingMmsi | Self::MissingTrack)
    }
}

fn present_str(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

// Zero-valued dimensions are treated as absent, the source data uses 0
// where the transponder did not report a value.
fn present_dim(value: Option<f64>) -> bool {
    value.is_some_and(|v| v != 0.0)
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl VesselStatics {
        pub fn test_default(name: &str) -> Self {
            Self {
                name: Some(name.to_string()),
                imo: Some("IMO9735206".to_string()),
                call_sign: Some("LF5678".to_string()),
                ship_type: Some("70".to_string()),
                length: Some(100.0),
                width: Some(20.0),
                draft: Some(8.0),
            }
        }
    }

    impl VesselTrack {
        pub fn test_default(mmsi: Mmsi, distance_miles: f64) -> Self {
            use chrono::TimeZone;

            let start = Utc.with_ymd_and_hms(2022, 1, 1, 0, 0, 0).unwrap();
            Self {
                mmsi,
                vessel: VesselStatics::test_default("test_vessel"),
                track: vec![
                    TrackPoint::test_new(57.0, 5.0, start),
                    TrackPoint::test_new(57.5, 5.0, start + chrono::Duration::hours(1)),
                ],
                distance_miles,
            }
        }
    }
}
