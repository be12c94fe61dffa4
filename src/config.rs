//! Run configuration handed to [`Scraper::new`](crate::Scraper::new).
//!
//! Nothing here reads the environment; the binary decides where values come
//! from and builds one [`ScraperConfig`] per run.

use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::fetch::FetchConfig;
use crate::scrape::DEFAULT_BASE_URL;

/// Highest accepted courtesy delay.
pub const MAX_REQUEST_DELAY: Duration = Duration::from_secs(60);

/// Highest accepted attempt bound.
pub const MAX_ATTEMPTS: u32 = 10;

/// Rejected configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("max attempts must be between 1 and {MAX_ATTEMPTS}, got {0}")]
    Attempts(u32),

    #[error("request delay must be at most {}s, got {}ms", MAX_REQUEST_DELAY.as_secs(), .0.as_millis())]
    RequestDelay(Duration),

    #[error("invalid base URL '{url}': {reason}")]
    BaseUrl { url: String, reason: String },
}

/// Everything one scrape run needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScraperConfig {
    /// Tracker root; every page URL is built beneath it.
    pub base_url: String,
    /// Fetch pacing, retry and session settings.
    pub fetch: FetchConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fetch: FetchConfig::default(),
        }
    }
}

impl ScraperConfig {
    /// Default settings against a different tracker root.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Checks every value a run depends on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let attempts = self.fetch.max_attempts;
        if attempts == 0 || attempts > MAX_ATTEMPTS {
            return Err(ConfigError::Attempts(attempts));
        }
        if self.fetch.request_delay > MAX_REQUEST_DELAY {
            return Err(ConfigError::RequestDelay(self.fetch.request_delay));
        }

        let base_error = |reason: &str| ConfigError::BaseUrl {
            url: self.base_url.clone(),
            reason: reason.to_string(),
        };
        let url = Url::parse(&self.base_url).map_err(|e| base_error(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(base_error("scheme must be http or https"));
        }
        if !url.path().ends_with('/') {
            return Err(base_error("path must end with '/'"));
        }
        Ok(())
    }
}
