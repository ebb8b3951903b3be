use std::{
    collections::{HashMap, hash_map::Entry},
    sync::Arc,
};

use pelorus_core::{
    BackendHealth, MergePolicy, Mmsi, QueryShape, Result, TrackQuery, TrackSample,
    VesselSearchOutbound, VesselTrack,
};
use tracing::{info, instrument, warn};

/// Multi-round track search over an injected backend.
///
/// One invocation runs a day's aggregation up to the query's round
/// limit, merges per-vessel results across rounds and releases the
/// backend's continuation context on every exit path.
#[derive(Clone)]
pub struct VesselSearch {
    backend: Arc<dyn VesselSearchOutbound>,
}

/// Everything one search produced besides the ranked list itself.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    /// All surfaced vessels in first-seen order, before any threshold
    /// or ranking is applied.
    pub vessels: Vec<VesselTrack>,
    pub rounds_completed: u32,
    /// Set when the latitude-only fallback shape produced the results.
    /// Its cells collapse to latitude bands, so distances derived from
    /// them undercount east-west movement.
    pub degraded: bool,
}

impl VesselSearch {
    pub fn new(backend: Arc<dyn VesselSearchOutbound>) -> Self {
        Self { backend }
    }

    /// Runs the search and returns the vessels above the query's
    /// distance threshold, furthest first, capped at
    /// [`RANKED_VESSEL_LIMIT`](crate::RANKED_VESSEL_LIMIT).
    pub async fn search_ranked(&self, query: &TrackQuery) -> Result<Vec<VesselTrack>> {
        let outcome = self.search(query).await?;
        Ok(crate::rank_by_distance(
            outcome.vessels,
            query.min_distance_miles,
        ))
    }

    /// Runs up to `max_rounds` aggregation rounds and merges their
    /// results. The first round decides success: an error there is
    /// retried once with the fallback shape and aborts the search if
    /// that fails too. Failures on later rounds degrade to partial
    /// results instead.
    #[instrument(name = "vessel_search", skip_all, fields(day = %query.day, merge = %query.merge))]
    pub async fn search(&self, query: &TrackQuery) -> Result<SearchOutcome> {
        let mut merge = TrackMerge::new(query.merge);
        let mut degraded = false;

        let mut round = match self
            .backend
            .open_tracks(query.day, QueryShape::GeoPoint, query.vessels_per_round)
            .await
        {
            Ok(round) => round,
            Err(error) => {
                warn!(
                    "aggregation on the combined coordinate field failed, retrying with the \
                     latitude-only shape: {error}"
                );
                degraded = true;
                self.backend
                    .open_tracks(query.day, QueryShape::LatitudeOnly, query.vessels_per_round)
                    .await?
            }
        };

        let mut cursor = round.cursor.take();
        let mut rounds_completed = 0;

        loop {
            let Some(samples) = round.samples.take() else {
                break;
            };

            info!("round {}: {} vessels", rounds_completed + 1, samples.len());
            merge.absorb(samples);
            rounds_completed += 1;

            if rounds_completed >= query.max_rounds {
                break;
            }
            let Some(active) = &cursor else {
                break;
            };

            match self.backend.continue_tracks(active).await {
                Ok(mut next) => {
                    if let Some(renewed) = next.cursor.take() {
                        cursor = Some(renewed);
                    }
                    round = next;
                }
                Err(error) => {
                    warn!(
                        "round {} failed, keeping the {rounds_completed} rounds retrieved so \
                         far: {error}",
                        rounds_completed + 1
                    );
                    break;
                }
            }
        }

        if let Some(cursor) = cursor {
            if let Err(error) = self.backend.release_cursor(cursor).await {
                warn!("failed to release the continuation context: {error}");
            }
        }

        Ok(SearchOutcome {
            vessels: merge.into_tracks(),
            rounds_completed,
            degraded,
        })
    }

    pub async fn health(&self) -> Result<BackendHealth> {
        Ok(self.backend.health().await?)
    }
}

/// Accumulates per-vessel results across rounds, preserving the order
/// vessels were first seen in. That order is the tie-break of the
/// final ranking.
struct TrackMerge {
    policy: MergePolicy,
    order: Vec<Mmsi>,
    tracks: HashMap<Mmsi, VesselTrack>,
}

impl TrackMerge {
    fn new(policy: MergePolicy) -> Self {
        Self {
            policy,
            order: Vec::new(),
            tracks: HashMap::new(),
        }
    }

    fn absorb(&mut self, samples: Vec<TrackSample>) {
        for sample in samples {
            match self.tracks.entry(sample.mmsi.clone()) {
                Entry::Vacant(entry) => {
                    self.order.push(sample.mmsi.clone());
                    entry.insert(sample.into_track());
                }
                Entry::Occupied(mut entry) => match self.policy {
                    MergePolicy::ReplaceVessel => {
                        entry.insert(sample.into_track());
                    }
                    MergePolicy::ExtendTrack => entry.get_mut().extend_with(sample.points),
                },
            }
        }
    }

    fn into_tracks(mut self) -> Vec<VesselTrack> {
        self.order
            .into_iter()
            .filter_map(|mmsi| self.tracks.remove(&mmsi))
            .collect()
    }
}
