//! The scrape run: list walk, per-project detail pipeline, and the
//! [`Scraper`] that owns their shared state.
//!
//! # Example
//!
//! ```no_run
//! use tracker_core::{Scraper, ScraperConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let scraper = Scraper::new(&ScraperConfig::default())?;
//! let outcome = scraper
//!     .walk_with_progress("36-67", |done, total| println!("{done}/{total}"))
//!     .await?;
//! println!("{} projects, {:?}", outcome.summaries.len(), scraper.stats());
//! # Ok(())
//! # }
//! ```

pub mod detail;
mod error;
mod site;
pub mod walker;

pub use detail::{DetailOutcome, DetailPipeline, extract_summary_page};
pub use error::{DetailError, ScrapeError, SkipReason};
pub use site::{DEFAULT_BASE_URL, SUMMARY_PAGE, SiteUrls};
pub use walker::{
    IncompleteRow, PROJECT_TABLE_ID, ProjectListWalker, SkippedRow, WalkOutcome,
    parse_project_rows,
};

use tracing::instrument;

use crate::config::ScraperConfig;
use crate::extract::CertificationResolver;
use crate::fetch::{Fetcher, StatsSnapshot};

/// One scrape run's fetcher, site addresses and certification rules.
#[derive(Debug)]
pub struct Scraper {
    fetcher: Fetcher,
    site: SiteUrls,
    resolver: CertificationResolver,
}

impl Scraper {
    /// Validates `config` and opens the run's HTTP session.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Config`] for invalid settings and
    /// [`ScrapeError::Session`] if the HTTP client cannot be built.
    #[instrument(skip(config), fields(base_url = %config.base_url))]
    pub fn new(config: &ScraperConfig) -> Result<Self, ScrapeError> {
        config.validate()?;
        let site = SiteUrls::new(&config.base_url)?;
        let fetcher = Fetcher::new(&config.fetch)?;
        Ok(Self {
            fetcher,
            site,
            resolver: CertificationResolver::default(),
        })
    }

    /// Replaces the built-in certification rules.
    #[must_use]
    pub fn with_resolver(mut self, resolver: CertificationResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// The run's fetcher, for callers issuing extra requests in the same
    /// session.
    #[must_use]
    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    #[must_use]
    pub fn site(&self) -> &SiteUrls {
        &self.site
    }

    /// Request statistics so far.
    #[must_use]
    pub fn stats(&self) -> StatsSnapshot {
        self.fetcher.stats()
    }

    /// A detail pipeline bound to this run.
    #[must_use]
    pub fn detail_pipeline(&self) -> DetailPipeline<'_> {
        DetailPipeline::new(&self.fetcher, &self.site, &self.resolver)
    }

    /// A list walker bound to this run.
    #[must_use]
    pub fn walker(&self) -> ProjectListWalker<'_> {
        ProjectListWalker::new(&self.fetcher, &self.site, self.detail_pipeline())
    }

    /// Walks one client's project list.
    ///
    /// # Errors
    ///
    /// See [`ProjectListWalker::walk_with_progress`].
    pub async fn walk(&self, client_id: &str) -> Result<WalkOutcome, ScrapeError> {
        self.walker().walk(client_id).await
    }

    /// Walks one client's project list, reporting `(rows_processed,
    /// total_rows)` after every row.
    ///
    /// # Errors
    ///
    /// See [`ProjectListWalker::walk_with_progress`].
    pub async fn walk_with_progress<F>(
        &self,
        client_id: &str,
        progress: F,
    ) -> Result<WalkOutcome, ScrapeError>
    where
        F: FnMut(usize, usize),
    {
        self.walker().walk_with_progress(client_id, progress).await
    }
}
