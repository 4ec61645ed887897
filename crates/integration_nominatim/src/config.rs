//! Nominatim client configuration

use serde::{Deserialize, Serialize};

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Cache TTL in hours (0 to disable)
    #[serde(default = "default_cache_ttl_hours")]
    pub cache_ttl_hours: u64,

    /// Country code filter (e.g., "de" for Germany, empty for worldwide)
    #[serde(default)]
    pub country_filter: String,

    /// Maximum number of places returned by a forward lookup
    #[serde(default = "default_result_limit")]
    pub result_limit: u8,

    /// Preferred response languages (Accept-Language)
    #[serde(default = "default_language")]
    pub language: String,

    /// User-Agent header; Nominatim rejects requests without one
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum spacing between requests in milliseconds
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,
}

fn default_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_timeout_secs() -> u64 {
    5
}

const fn default_cache_ttl_hours() -> u64 {
    24
}

const fn default_result_limit() -> u8 {
    5
}

fn default_language() -> String {
    "en".to_string()
}

fn default_user_agent() -> String {
    concat!("locus/", env!("CARGO_PKG_VERSION")).to_string()
}

/// Nominatim usage policy allows at most one request per second
const fn default_min_request_interval_ms() -> u64 {
    1100
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            cache_ttl_hours: default_cache_ttl_hours(),
            country_filter: String::new(),
            result_limit: default_result_limit(),
            language: default_language(),
            user_agent: default_user_agent(),
            min_request_interval_ms: default_min_request_interval_ms(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing against a mock server
    #[must_use]
    pub fn for_testing(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cache_ttl_hours: 0,
            min_request_interval_ms: 0,
            ..Default::default()
        }
    }
}
