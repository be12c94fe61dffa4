//! Tracker Scraper Core Library
//!
//! This library walks a public project tracker: it fetches a client's
//! project list, follows every project to its summary and closeout pages,
//! extracts label/value fields from the loosely structured HTML, and exports
//! the result as tabular sheets.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`fetch`] - Resilient HTTP fetcher with pacing, retry and rate-limit handling
//! - [`extract`] - Label-anchored field extraction and certification resolution
//! - [`project`] - Project identity and record types
//! - [`scrape`] - Project list walker and per-project detail pipeline
//! - [`export`] - Sheet projection and JSON workbook output
//! - [`address`] - Address normalization collaborator
//! - [`config`] - Run configuration and validation

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod address;
pub mod config;
pub mod export;
pub mod extract;
pub mod fetch;
pub mod project;
pub mod scrape;
mod user_agent;

// Re-export commonly used types
pub use config::{ConfigError, ScraperConfig};
pub use export::{ExportError, Sheet, Workbook, build_workbook, write_json};
pub use extract::{CertificationResolver, ExtractError, LabelMatcher};
pub use fetch::{
    FailureType, FetchConfig, FetchError, Fetcher, RetryDecision, RetryPolicy, StatsSnapshot,
    classify_error,
};
pub use project::{Indicator, ProjectDetail, ProjectIds, ProjectSummary};
pub use scrape::{ScrapeError, Scraper, WalkOutcome};
