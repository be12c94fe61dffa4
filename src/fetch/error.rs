//! Error types for the fetch module.
//!
//! Every variant carries the URL it concerns so a log line is enough to
//! reproduce the failing request.

use thiserror::Error;

/// Errors that can occur while fetching a tracker page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS resolution, connection refused, reset, TLS).
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The URL that failed.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request timed out before completion.
    #[error("timeout fetching {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// Non-success HTTP response (4xx client errors, 5xx server errors).
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The URL that returned an error status.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// The raw Retry-After header value, if present (429 responses).
        retry_after: Option<String>,
    },

    /// The provided URL is malformed or not http(s).
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// The HTTP client could not be constructed from the configuration.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The fetcher gave up on a URL; `source` is the last attempt's error.
    #[error("giving up on {url} after {attempts} attempt(s): {source}")]
    Terminal {
        /// The URL that could not be fetched.
        url: String,
        /// Attempts made, not counting rate-limit waits.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after: None,
        }
    }

    /// Creates an HTTP status error with a Retry-After header value.
    pub fn http_status_with_retry_after(
        url: impl Into<String>,
        status: u16,
        retry_after: Option<String>,
    ) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
            retry_after,
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Wraps the final attempt's error once the fetcher stops retrying.
    pub fn terminal(url: impl Into<String>, attempts: u32, last: FetchError) -> Self {
        Self::Terminal {
            url: url.into(),
            attempts,
            source: Box::new(last),
        }
    }

    /// Returns the HTTP status of this error or of the final attempt it wraps.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Terminal { source, .. } => source.status(),
            _ => None,
        }
    }
}

// reqwest::Error and url::ParseError carry no URL of their own, so there are
// no `From` impls here; the constructors above attach the URL instead.
