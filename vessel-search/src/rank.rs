use pelorus_core::VesselTrack;

/// How many vessels a ranked result carries at most.
pub const RANKED_VESSEL_LIMIT: usize = 3;

/// Filters to vessels that covered at least `min_distance_miles` over
/// two or more retained points, sorts them by distance descending and
/// truncates to [`RANKED_VESSEL_LIMIT`]. The sort is stable, vessels
/// tied on distance keep their first-seen order. A distance over a
/// single point is undefined, such vessels never rank.
pub fn rank_by_distance(vessels: Vec<VesselTrack>, min_distance_miles: f64) -> Vec<VesselTrack> {
    let mut ranked: Vec<VesselTrack> = vessels
        .into_iter()
        .filter(|vessel| vessel.distance_miles >= min_distance_miles && vessel.track.len() >= 2)
        .collect();

    ranked.sort_by(|a, b| b.distance_miles.total_cmp(&a.distance_miles));
    ranked.truncate(RANKED_VESSEL_LIMIT);
    ranked
}
