//! Fault-tolerant HTTP fetch layer.
//!
//! This module knows nothing about HTML. It turns a URL into a [`Page`] or a
//! [`FetchError`], and keeps the run's request statistics.
//!
//! # Features
//!
//! - Bounded retry (3 attempts by default) with exponential backoff
//! - HTTP 429 handling that honours `Retry-After` without consuming attempts
//! - Optional courtesy delay before every attempt
//! - One reused session (connection pool, cookies, default headers) per run
//!
//! # Example
//!
//! ```no_run
//! use tracker_core::fetch::{FetchConfig, Fetcher};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let fetcher = Fetcher::new(&FetchConfig::default())?;
//! let page = fetcher.get("https://tracker.example/ProjectList.aspx?ClientId=36-67").await?;
//! let stats = fetcher.stats();
//! println!("{} bytes after {} request(s)", page.body.len(), stats.total_requests);
//! # Ok(())
//! # }
//! ```

mod client;
mod constants;
mod error;
mod retry;
mod stats;
mod throttle;

pub use client::{FetchConfig, Fetcher, Page};
pub use reqwest::Method;
pub use error::FetchError;
pub use retry::{
    DEFAULT_BASE_DELAY, DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy,
    classify_error,
};
pub use stats::{RunStats, StatsSnapshot};
pub use throttle::{DEFAULT_RATE_LIMIT_WAIT, RequestThrottle, parse_retry_after, rate_limit_wait};

// Note: no module-local Result alias; signatures spell out `Result<T, FetchError>`.
