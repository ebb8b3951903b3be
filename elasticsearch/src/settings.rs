use std::time::Duration;

use serde::Deserialize;

/// Scroll contexts are renewed with this lifetime on every round when
/// the configuration does not set one.
pub const DEFAULT_SCROLL_TTL: Duration = Duration::from_secs(120);

/// Connection settings of the vessel index. Timeout and retry count
/// fall back to the HTTP client defaults when unset.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub host: String,
    pub index: String,
    pub api_key: Option<String>,
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
    pub max_retries: Option<u32>,
    #[serde(with = "humantime_serde")]
    pub scroll_ttl: Option<Duration>,
}
