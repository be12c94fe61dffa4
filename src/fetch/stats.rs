//! Run statistics for one scrape.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Request counters for one run, owned by the [`Fetcher`](super::Fetcher).
///
/// Only the fetcher mutates these; everyone else reads a [`StatsSnapshot`].
#[derive(Debug)]
pub struct RunStats {
    total_requests: AtomicUsize,
    successful: AtomicUsize,
    failed: AtomicUsize,
    retries: AtomicUsize,
    rate_limit_waits: AtomicUsize,
    started_at: Instant,
}

/// Read-only copy of [`RunStats`] at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    /// Attempts put on the wire, including retries and rate-limited ones.
    pub total_requests: usize,
    /// Fetches that ended with a page.
    pub successful_requests: usize,
    /// Fetches that ended with a terminal error.
    pub failed_requests: usize,
    /// Backoff retries performed.
    pub retries: usize,
    /// 429 waits performed.
    pub rate_limit_waits: usize,
    /// Time since the run started.
    pub elapsed_ms: u64,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    /// Starts a new run with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_requests: AtomicUsize::new(0),
            successful: AtomicUsize::new(0),
            failed: AtomicUsize::new(0),
            retries: AtomicUsize::new(0),
            rate_limit_waits: AtomicUsize::new(0),
            started_at: Instant::now(),
        }
    }

    /// Returns a snapshot of the counters.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            total_requests: self.total_requests.load(Ordering::SeqCst),
            successful_requests: self.successful.load(Ordering::SeqCst),
            failed_requests: self.failed.load(Ordering::SeqCst),
            retries: self.retries.load(Ordering::SeqCst),
            rate_limit_waits: self.rate_limit_waits.load(Ordering::SeqCst),
            elapsed_ms: self.elapsed().as_millis() as u64,
        }
    }

    /// Returns the time since the run started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    pub(super) fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_success(&self) {
        self.successful.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }

    pub(super) fn record_rate_limit_wait(&self) {
        self.rate_limit_waits.fetch_add(1, Ordering::SeqCst);
    }
}

impl StatsSnapshot {
    /// Returns the elapsed time as a `Duration`.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }
}
