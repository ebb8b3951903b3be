use config::{Config, ConfigError, File};
use pelorus_core::{MergePolicy, SearchDay, TrackQuery};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub elasticsearch: elasticsearch::Settings,
    pub search: SearchSettings,
}

/// Configured overrides for the per-query defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    pub min_distance_miles: Option<f64>,
    pub max_rounds: Option<u32>,
    pub vessels_per_round: Option<u32>,
    pub merge: Option<MergePolicy>,
}

impl Settings {
    pub fn new(config: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name(config).required(true))
            .add_source(config::Environment::with_prefix("PELORUS").separator("__"))
            .build()?
            .try_deserialize()
    }
}

impl SearchSettings {
    /// A query for `day` with every configured override applied.
    pub fn track_query(&self, day: SearchDay) -> TrackQuery {
        let mut query = TrackQuery::new(day);
        if let Some(min_distance_miles) = self.min_distance_miles {
            query.min_distance_miles = min_distance_miles;
        }
        if let Some(max_rounds) = self.max_rounds {
            query.max_rounds = max_rounds;
        }
        if let Some(vessels_per_round) = self.vessels_per_round {
            query.vessels_per_round = vessels_per_round;
        }
        if let Some(merge) = self.merge {
            query.merge = merge;
        }
        query
    }
}
