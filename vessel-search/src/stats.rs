use pelorus_core::VesselTrack;
use serde::Serialize;

/// Aggregate figures over a set of vessel tracks, the summary numbers
/// reported alongside a search run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchStats {
    pub vessel_count: usize,
    pub total_distance_miles: f64,
    pub average_distance_miles: f64,
    pub max_distance_miles: f64,
    pub total_track_points: usize,
    pub vessels_with_names: usize,
    /// Vessels carrying a real IMO number, the `IMO0000000` placeholder
    /// does not count.
    pub vessels_with_imo: usize,
}

impl From<&[VesselTrack]> for SearchStats {
    fn from(vessels: &[VesselTrack]) -> Self {
        if vessels.is_empty() {
            return Self::default();
        }

        let total_distance_miles: f64 = vessels.iter().map(|v| v.distance_miles).sum();

        Self {
            vessel_count: vessels.len(),
            total_distance_miles,
            average_distance_miles: total_distance_miles / vessels.len() as f64,
            max_distance_miles: vessels.iter().map(|v| v.distance_miles).fold(0.0, f64::max),
            total_track_points: vessels.iter().map(|v| v.track.len()).sum(),
            vessels_with_names: vessels.iter().filter(|v| v.vessel.has_name()).count(),
            vessels_with_imo: vessels.iter().filter(|v| v.vessel.has_real_imo()).count(),
        }
    }
}
