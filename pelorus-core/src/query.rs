use std::{fmt::Display, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;

use crate::{Error, error::error::InvalidDateSnafu};

pub const DEFAULT_MIN_DISTANCE_MILES: f64 = 50.0;
pub const DEFAULT_MAX_ROUNDS: u32 = 3;
pub const DEFAULT_VESSELS_PER_ROUND: u32 = 1000;

/// The calendar day a search covers, 00:00:00 through 23:59:59.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct SearchDay(NaiveDate);

/// Parameters of one ranked track search.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackQuery {
    pub day: SearchDay,
    pub min_distance_miles: f64,
    pub max_rounds: u32,
    /// Upper bound on distinct vessels per retrieval round, bounds the
    /// worst-case response size. Raise it and set `max_rounds` to 1 to
    /// fetch everything in a single request.
    pub vessels_per_round: u32,
    pub merge: MergePolicy,
}

/// How per-vessel results from successive rounds are combined.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MergePolicy {
    /// Rounds are expected to surface distinct vessels; a re-seen mmsi
    /// replaces its earlier record in place.
    #[default]
    ReplaceVessel,
    /// Rounds extend the tracks of vessels already seen; points are
    /// combined, re-downsampled and the distance recomputed.
    ExtendTrack,
}

impl SearchDay {
    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for SearchDay {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl FromStr for SearchDay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .context(InvalidDateSnafu { given: s })
            .map(Self)
    }
}

impl Display for SearchDay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl TrackQuery {
    pub fn new(day: SearchDay) -> Self {
        Self {
            day,
            min_distance_miles: DEFAULT_MIN_DISTANCE_MILES,
            max_rounds: DEFAULT_MAX_ROUNDS,
            vessels_per_round: DEFAULT_VESSELS_PER_ROUND,
            merge: MergePolicy::default(),
        }
    }
}
