//! Client configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend used when none is configured (local development server).
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";

/// Upper bound on one validation exchange, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Path of the validation endpoint, relative to the base URL.
pub const VALIDATE_PATH: &str = "/api/validate-license";

/// License client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the license backend (e.g. `https://licenses.example.com`).
    pub api_base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Creates a config pointing at `api_base_url` with default settings otherwise.
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            ..Default::default()
        }
    }

    /// Full URL of the validation endpoint.
    #[must_use]
    pub fn validation_url(&self) -> String {
        format!("{}{VALIDATE_PATH}", self.api_base_url.trim_end_matches('/'))
    }

    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
