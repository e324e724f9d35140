//! Application configuration. Backend URL, timeouts, mock mode.

use serde::Deserialize;
use std::time::Duration;

/// Default backend origin when TODO_DECK_BASE_URL is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Backend origin (scheme + host + port). Read from TODO_DECK_BASE_URL.
    pub base_url: Option<String>,

    /// Per-request timeout in seconds. Read from TODO_DECK_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Run against the in-memory mock gateway instead of a live backend.
    /// Read from TODO_DECK_USE_MOCK.
    #[serde(default)]
    pub use_mock: Option<bool>,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("TODO_DECK"));
        if let Ok(path) = std::env::var("TODO_DECK_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        c.build()?.try_deserialize()
    }

    /// Returns the backend origin. Defaults to DEFAULT_BASE_URL if unset.
    pub fn base_url_or_default(&self) -> String {
        self.base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Returns the per-request timeout. Defaults to DEFAULT_TIMEOUT_SECS if unset.
    pub fn request_timeout_or_default(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Whether to run against the mock gateway. Defaults to false.
    pub fn use_mock_or_default(&self) -> bool {
        self.use_mock.unwrap_or(false)
    }
}
