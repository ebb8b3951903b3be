use async_trait::async_trait;

use crate::{BackendError, Mmsi, SearchDay, TrackPoint, VesselStatics, VesselTrack};

/// One backend retrieval round: the vessels it surfaced and the cursor
/// for the next round if the backend offered one.
#[derive(Debug, Clone, Default)]
pub struct AggregationRound {
    pub cursor: Option<ScrollCursor>,
    /// `None` when the backend reported no aggregation data at all,
    /// the signal to stop paging. An empty vessel list is `Some` and
    /// counts as a processable round.
    pub samples: Option<Vec<TrackSample>>,
}

/// Per-vessel payload of a round: static metadata plus one
/// representative point per spatial cell.
#[derive(Debug, Clone)]
pub struct TrackSample {
    pub mmsi: Mmsi,
    pub vessel: VesselStatics,
    pub points: Vec<TrackPoint>,
}

/// Continuation token for paging aggregation rounds. Holders must hand
/// it back through [`VesselSearchOutbound::release_cursor`] when done.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollCursor(String);

/// Which aggregation shape a round is requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum QueryShape {
    /// Grid on the indexed combined-coordinate field.
    GeoPoint,
    /// Grid on the raw latitude field, a 1-D approximation used when
    /// the combined field is missing from the index mapping.
    LatitudeOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendHealth {
    pub status: String,
    pub nodes: u64,
    pub index_exists: bool,
}

/// Outbound port of the track search engine. A backend has to provide
/// aggregated query execution, a continuation mechanism for further
/// rounds and an explicit release of that continuation context.
#[async_trait]
pub trait VesselSearchOutbound: Send + Sync {
    async fn open_tracks(
        &self,
        day: SearchDay,
        shape: QueryShape,
        vessels_per_round: u32,
    ) -> Result<AggregationRound, BackendError>;
    async fn continue_tracks(&self, cursor: &ScrollCursor)
    -> Result<AggregationRound, BackendError>;
    async fn release_cursor(&self, cursor: ScrollCursor) -> Result<(), BackendError>;
    async fn health(&self) -> Result<BackendHealth, BackendError>;
}

impl TrackSample {
    pub fn into_track(self) -> VesselTrack {
        VesselTrack::from_points(self.mmsi, self.vessel, self.points)
    }
}

impl ScrollCursor {
    pub fn new(cursor: impl Into<String>) -> Self {
        Self(cursor.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

#[cfg(feature = "test")]
mod test {
    use super::*;

    impl TrackSample {
        pub fn test_default(mmsi: Mmsi, points: Vec<TrackPoint>) -> Self {
            Self {
                mmsi,
                vessel: VesselStatics::test_default("test_vessel"),
                points,
            }
        }
    }
}
