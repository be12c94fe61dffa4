//! Error types for the scrape module.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;

/// Fatal errors of a scrape run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The run configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The HTTP session could not be opened.
    #[error("failed to open HTTP session: {0}")]
    Session(#[from] FetchError),

    /// The client identifier is blank.
    #[error("invalid client id: '{client_id}'")]
    InvalidClientId {
        /// The rejected value.
        client_id: String,
    },

    /// The configured base URL cannot address tracker pages.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The project list page could not be fetched.
    #[error("failed to fetch project list {url}: {source}")]
    ListFetch {
        /// The list page URL.
        url: String,
        /// The fetcher's terminal error.
        #[source]
        source: FetchError,
    },
}

impl ScrapeError {
    /// Creates an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Creates a list fetch error.
    pub fn list_fetch(url: impl Into<String>, source: FetchError) -> Self {
        Self::ListFetch {
            url: url.into(),
            source,
        }
    }
}

/// The one hard failure of the detail pipeline.
#[derive(Debug, Error)]
pub enum DetailError {
    /// The project's summary page could not be fetched.
    #[error("failed to fetch project summary {url}: {source}")]
    SummaryFetch {
        /// The summary page URL.
        url: String,
        /// The fetcher's terminal error.
        #[source]
        source: FetchError,
    },
}

impl DetailError {
    /// Creates a summary fetch error.
    pub fn summary_fetch(url: impl Into<String>, source: FetchError) -> Self {
        Self::SummaryFetch {
            url: url.into(),
            source,
        }
    }
}

/// Why a list row produced no project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The row has fewer than the three cells a project row carries.
    TooFewCells {
        /// Cells found.
        found: usize,
    },
    /// The first cell holds no link.
    MissingLink,
    /// The first cell links somewhere other than a project summary.
    NotProjectLink {
        /// The link target as written in the page.
        href: String,
    },
    /// The link could not be resolved against the base URL.
    UnresolvableLink {
        /// The link target as written in the page.
        href: String,
    },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewCells { found } => write!(f, "row has {found} cell(s), expected at least 3"),
            Self::MissingLink => write!(f, "first cell has no link"),
            Self::NotProjectLink { href } => write!(f, "link '{href}' is not a project summary"),
            Self::UnresolvableLink { href } => write!(f, "link '{href}' cannot be resolved"),
        }
    }
}
