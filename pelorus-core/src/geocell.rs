use std::{collections::HashMap, fmt::Display};

use geohash::Coord;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use tracing::warn;

use crate::{Result, TrackPoint, error::error::InvalidCoordinateSnafu};

/// Geohash precision used for spatial bucketing, cells are roughly
/// 4.9 km x 4.9 km. Must match the precision requested from the
/// backend's grid aggregation so client and server cells line up.
pub const CELL_PRECISION: usize = 5;

/// Identifier of one spatial bucket.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub struct GeoCell(String);

impl GeoCell {
    pub fn new(cell: impl Into<String>) -> Self {
        Self(cell.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for GeoCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Cell identifier of a position at the fixed precision.
pub fn cell(latitude: f64, longitude: f64) -> Result<GeoCell> {
    let hash = geohash::encode(
        Coord {
            x: longitude,
            y: latitude,
        },
        CELL_PRECISION,
    )
    .context(InvalidCoordinateSnafu {
        latitude,
        longitude,
    })?;
    Ok(GeoCell(hash))
}

/// Reduces a set of points to one representative per cell, keeping the
/// earliest point of each cell. The result is sorted ascending by
/// timestamp as required by the pairwise distance summation.
///
/// Points the cell encoding rejects (coordinates outside the valid
/// range) are dropped with a warning instead of failing the track.
pub fn downsample(points: impl IntoIterator<Item = TrackPoint>) -> Vec<TrackPoint> {
    let mut cells: HashMap<GeoCell, TrackPoint> = HashMap::new();

    for point in points {
        match cell(point.latitude, point.longitude) {
            Ok(cell) => {
                cells
                    .entry(cell)
                    .and_modify(|kept| {
                        if point.timestamp < kept.timestamp {
                            *kept = point;
                        }
                    })
                    .or_insert(point);
            }
            Err(error) => {
                warn!("dropping position outside the valid coordinate range: {error}");
            }
        }
    }

    let mut track: Vec<TrackPoint> = cells.into_values().collect();
    track.sort_by_key(|p| p.timestamp);
    track
}
