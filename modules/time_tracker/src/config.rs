use serde::{Deserialize, Serialize};

/// Configuration for the time_tracker module
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TimeTrackerConfig {
    /// Endpoint of the identity service queried on user creation
    #[serde(default = "default_identity_base_url")]
    pub identity_base_url: String,
    #[serde(default = "default_identity_timeout_ms")]
    pub identity_timeout_ms: u64,
    #[serde(default = "default_page_size")]
    pub default_page_size: u64,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u64,
}

impl Default for TimeTrackerConfig {
    fn default() -> Self {
        Self {
            identity_base_url: default_identity_base_url(),
            identity_timeout_ms: default_identity_timeout_ms(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

fn default_identity_base_url() -> String {
    "http://localhost:8081/info".to_string()
}

fn default_identity_timeout_ms() -> u64 {
    5000
}

fn default_page_size() -> u64 {
    50
}

fn default_max_page_size() -> u64 {
    1000
}
