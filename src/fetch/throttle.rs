//! Request pacing: the courtesy delay before every attempt and the
//! server-directed wait after an HTTP 429.
//!
//! The courtesy delay is a fixed pause applied before *every* request attempt,
//! independent of backoff. Rate-limit waits come from the `Retry-After` header
//! and fall back to a configured default when the header is absent or
//! unparseable.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use tracker_core::fetch::{RequestThrottle, parse_retry_after};
//!
//! # async fn example() {
//! let throttle = RequestThrottle::new(Duration::from_millis(250));
//! throttle.before_attempt().await;
//!
//! assert_eq!(parse_retry_after("5"), Some(Duration::from_secs(5)));
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{debug, instrument, warn};

use super::FetchError;

/// Warning threshold for cumulative rate-limit waiting in one run (5 minutes).
const CUMULATIVE_WAIT_WARNING_THRESHOLD: Duration = Duration::from_secs(300);

/// Maximum Retry-After value (1 hour) to prevent excessive delays.
const MAX_RETRY_AFTER: Duration = Duration::from_secs(3600);

/// Default wait when a 429 carries no usable Retry-After header.
pub const DEFAULT_RATE_LIMIT_WAIT: Duration = Duration::from_secs(60);

/// Paces requests for one fetcher.
///
/// Owned by a single [`Fetcher`](super::Fetcher); the cumulative counter is
/// atomic only so the fetcher can stay `&self` throughout.
#[derive(Debug)]
pub struct RequestThrottle {
    /// Fixed pause before every attempt (zero disables it).
    courtesy_delay: Duration,

    /// Total server-directed waiting so far, in milliseconds.
    cumulative_wait_ms: AtomicU64,
}

impl RequestThrottle {
    /// Creates a throttle with the given courtesy delay.
    #[must_use]
    pub fn new(courtesy_delay: Duration) -> Self {
        Self {
            courtesy_delay,
            cumulative_wait_ms: AtomicU64::new(0),
        }
    }

    /// Creates a throttle that never pauses before attempts.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    /// Returns the courtesy delay.
    #[must_use]
    pub fn courtesy_delay(&self) -> Duration {
        self.courtesy_delay
    }

    /// Sleeps for the courtesy delay, if any.
    pub async fn before_attempt(&self) {
        if self.courtesy_delay.is_zero() {
            return;
        }
        debug!(delay_ms = self.courtesy_delay.as_millis(), "courtesy delay");
        tokio::time::sleep(self.courtesy_delay).await;
    }

    /// Sleeps for a server-directed rate-limit wait and records it.
    #[instrument(skip(self), fields(wait_ms = wait.as_millis()))]
    pub async fn wait_rate_limit(&self, wait: Duration) {
        let cumulative = self.add_cumulative_wait(wait);
        if cumulative >= CUMULATIVE_WAIT_WARNING_THRESHOLD {
            warn!(
                cumulative_wait_secs = cumulative.as_secs(),
                "excessive server rate limiting - consider raising the request delay"
            );
        }
        tokio::time::sleep(wait).await;
    }

    /// Returns the total server-directed waiting recorded so far.
    #[must_use]
    pub fn cumulative_wait(&self) -> Duration {
        Duration::from_millis(self.cumulative_wait_ms.load(Ordering::SeqCst))
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_cumulative_wait(&self, wait: Duration) -> Duration {
        let wait_ms = wait.as_millis() as u64;
        let total = self.cumulative_wait_ms.fetch_add(wait_ms, Ordering::SeqCst) + wait_ms;
        Duration::from_millis(total)
    }
}

/// Returns how long to wait after a 429 response.
///
/// Uses the response's Retry-After header when it parses, otherwise
/// `fallback`.
#[must_use]
pub fn rate_limit_wait(error: &FetchError, fallback: Duration) -> Duration {
    let header = match error {
        FetchError::HttpStatus { retry_after, .. } => retry_after.as_deref(),
        _ => None,
    };
    match header.and_then(parse_retry_after) {
        Some(delay) => delay,
        None => {
            debug!(
                fallback_secs = fallback.as_secs(),
                "no usable Retry-After header, using fallback wait"
            );
            fallback
        }
    }
}

/// Parses a Retry-After header value into a Duration.
///
/// Supports both RFC 7231 forms:
/// - Integer seconds: `Retry-After: 120`
/// - HTTP-date: `Retry-After: Wed, 21 Oct 2025 07:28:00 GMT`
///
/// Returns `None` if the value cannot be parsed. Caps excessive values at 1 hour.
///
/// ```
/// use std::time::Duration;
/// use tracker_core::fetch::parse_retry_after;
///
/// assert_eq!(parse_retry_after("120"), Some(Duration::from_secs(120)));
/// assert_eq!(parse_retry_after("0"), Some(Duration::ZERO));
/// assert_eq!(parse_retry_after("invalid"), None);
/// ```
#[must_use]
#[instrument]
pub fn parse_retry_after(header_value: &str) -> Option<Duration> {
    let header_value = header_value.trim();

    if let Ok(seconds) = header_value.parse::<i64>() {
        if seconds < 0 {
            debug!(seconds, "negative Retry-After value, ignoring");
            return None;
        }

        #[allow(clippy::cast_sign_loss)]
        let duration = Duration::from_secs(seconds as u64);

        if duration > MAX_RETRY_AFTER {
            warn!(
                seconds,
                max_seconds = MAX_RETRY_AFTER.as_secs(),
                "Retry-After exceeds maximum, capping at 1 hour"
            );
            return Some(MAX_RETRY_AFTER);
        }

        return Some(duration);
    }

    if let Ok(datetime) = httpdate::parse_http_date(header_value) {
        let now = std::time::SystemTime::now();

        if let Ok(duration) = datetime.duration_since(now) {
            if duration > MAX_RETRY_AFTER {
                warn!(
                    delay_secs = duration.as_secs(),
                    max_secs = MAX_RETRY_AFTER.as_secs(),
                    "Retry-After date exceeds maximum, capping at 1 hour"
                );
                return Some(MAX_RETRY_AFTER);
            }
            Some(duration)
        } else {
            debug!(header_value, "Retry-After date is in the past, returning zero");
            Some(Duration::ZERO)
        }
    } else {
        debug!(header_value, "unparseable Retry-After value");
        None
    }
}
