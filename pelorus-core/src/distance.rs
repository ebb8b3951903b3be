use itertools::Itertools;

use crate::TrackPoint;

pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Great-circle (haversine) distance in miles between two positions
/// given in degrees.
pub fn distance_miles(from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> f64 {
    let lat1 = from_lat.to_radians();
    let lat2 = to_lat.to_radians();
    let delta_lat = (to_lat - from_lat).to_radians();
    let delta_lon = (to_lon - from_lon).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_MILES * c
}

/// Sum of the great-circle distances over consecutive pairs of a
/// timestamp-ordered track. Zero for fewer than two points.
pub fn track_distance_miles(points: &[TrackPoint]) -> f64 {
    points
        .iter()
        .tuple_windows()
        .map(|(a, b)| distance_miles(a.latitude, a.longitude, b.latitude, b.longitude))
        .sum()
}
