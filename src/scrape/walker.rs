//! Project list walk: one summary per list row, one detail run per summary.
//!
//! Rows are processed strictly in page order. Each row resolves to a
//! `Result<ProjectSummary, SkipReason>` before any detail fetch, so the
//! parsed list page is released before the first network wait.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use tracing::{debug, error, info, instrument, warn};

use super::detail::DetailPipeline;
use super::site::SUMMARY_PAGE;
use super::{ScrapeError, SiteUrls, SkipReason};
use crate::extract::cell_text;
use crate::fetch::Fetcher;
use crate::project::{ProjectDetail, ProjectSummary};

/// Element id of the project table on the list page.
pub const PROJECT_TABLE_ID: &str = "ctl00_MainContent_gdvsch";

/// Cells a project row must carry: link, (unused), name.
const MIN_ROW_CELLS: usize = 3;

/// Compiles a CSS selector at static init; panics on invalid selector.
fn compile_static_selector(selector: &str) -> Selector {
    Selector::parse(selector).unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e:?}"))
}

static PROJECT_TABLE: LazyLock<Selector> =
    LazyLock::new(|| compile_static_selector(&format!("table#{PROJECT_TABLE_ID}")));
static ROW: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| compile_static_selector("a"));

/// A data row that produced no project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row index (the header row is not counted).
    pub index: usize,
    pub reason: SkipReason,
}

/// A project whose summary was kept but whose detail pipeline failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncompleteRow {
    /// 1-based data row index.
    pub index: usize,
    /// The project's summary URL.
    pub link: String,
    /// Rendered pipeline error.
    pub error: String,
}

/// Everything one walk produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalkOutcome {
    /// One record per project row, in page order, including rows whose
    /// detail pipeline failed.
    pub summaries: Vec<ProjectSummary>,
    /// Detail records for rows whose pipeline succeeded.
    pub details: Vec<ProjectDetail>,
    /// Data rows that were not project rows.
    pub skipped: Vec<SkippedRow>,
    /// Project rows kept with partial data.
    pub incomplete: Vec<IncompleteRow>,
    /// Data rows in the table, header excluded.
    pub total_rows: usize,
}

impl WalkOutcome {
    /// True when the walk found no projects at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summaries.is_empty()
    }
}

/// Walks a client's project list.
#[derive(Debug, Clone, Copy)]
pub struct ProjectListWalker<'a> {
    fetcher: &'a Fetcher,
    site: &'a SiteUrls,
    pipeline: DetailPipeline<'a>,
}

impl<'a> ProjectListWalker<'a> {
    #[must_use]
    pub fn new(fetcher: &'a Fetcher, site: &'a SiteUrls, pipeline: DetailPipeline<'a>) -> Self {
        Self {
            fetcher,
            site,
            pipeline,
        }
    }

    /// Walks `client_id`'s list without progress reporting.
    ///
    /// # Errors
    ///
    /// See [`walk_with_progress`](Self::walk_with_progress).
    pub async fn walk(&self, client_id: &str) -> Result<WalkOutcome, ScrapeError> {
        self.walk_with_progress(client_id, |_, _| {}).await
    }

    /// Walks `client_id`'s list, calling `progress(rows_processed,
    /// total_rows)` after every data row.
    ///
    /// A list page without the project table yields an empty outcome.
    /// Row-level problems never abort the walk.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidClientId`] for a blank id and
    /// [`ScrapeError::ListFetch`] when the list page cannot be fetched.
    #[instrument(skip(self, progress))]
    pub async fn walk_with_progress<F>(
        &self,
        client_id: &str,
        mut progress: F,
    ) -> Result<WalkOutcome, ScrapeError>
    where
        F: FnMut(usize, usize),
    {
        let list_url = self.site.project_list(client_id)?;
        let page = self
            .fetcher
            .get(&list_url)
            .await
            .map_err(|e| ScrapeError::list_fetch(&list_url, e))?;

        let Some(rows) = parse_project_rows(&page.body, self.site) else {
            error!(url = %list_url, table_id = PROJECT_TABLE_ID, "project table not found in list page");
            return Ok(WalkOutcome::default());
        };

        let total_rows = rows.len();
        info!(total_rows, "found project rows");

        let mut outcome = WalkOutcome {
            total_rows,
            ..WalkOutcome::default()
        };

        for (offset, row) in rows.into_iter().enumerate() {
            let index = offset + 1;
            match row {
                Ok(summary) => self.process_project(index, summary, &mut outcome).await,
                Err(reason) => {
                    warn!(row = index, %reason, "skipping list row");
                    outcome.skipped.push(SkippedRow { index, reason });
                }
            }
            progress(index, total_rows);
        }

        info!(
            projects = outcome.summaries.len(),
            details = outcome.details.len(),
            skipped = outcome.skipped.len(),
            incomplete = outcome.incomplete.len(),
            "project list walk complete"
        );
        Ok(outcome)
    }

    async fn process_project(
        &self,
        index: usize,
        mut summary: ProjectSummary,
        outcome: &mut WalkOutcome,
    ) {
        debug!(row = index, link = %summary.link, app_id = %summary.app_id, "processing project");

        match self.pipeline.run(&summary.link).await {
            Ok(result) => {
                summary.merge_from(&result.basic);
                let mut detail = result.detailed;
                detail.summary.clone_from(&summary);
                outcome.details.push(detail);
            }
            Err(error) => {
                error!(row = index, link = %summary.link, error = %error, "project detail failed, keeping partial summary");
                outcome.incomplete.push(IncompleteRow {
                    index,
                    link: summary.link.clone(),
                    error: error.to_string(),
                });
            }
        }

        outcome.summaries.push(summary);
    }
}

/// Parses the list page into per-row results, or `None` when the project
/// table is missing.
///
/// The first `tr` is the header and is not returned.
#[must_use]
pub fn parse_project_rows(
    body: &str,
    site: &SiteUrls,
) -> Option<Vec<Result<ProjectSummary, SkipReason>>> {
    let doc = Html::parse_document(body);
    let table = doc.select(&PROJECT_TABLE).next()?;
    Some(
        table
            .select(&ROW)
            .skip(1)
            .map(|row| parse_row(row, site))
            .collect(),
    )
}

fn parse_row(row: ElementRef<'_>, site: &SiteUrls) -> Result<ProjectSummary, SkipReason> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELL).collect();
    if cells.len() < MIN_ROW_CELLS {
        return Err(SkipReason::TooFewCells { found: cells.len() });
    }

    let link = cells[0].select(&LINK).next().ok_or(SkipReason::MissingLink)?;
    let href = link.value().attr("href").unwrap_or_default();
    if !href.contains(SUMMARY_PAGE) {
        return Err(SkipReason::NotProjectLink {
            href: href.to_string(),
        });
    }

    let absolute = site
        .absolutize(href)
        .ok_or_else(|| SkipReason::UnresolvableLink {
            href: href.to_string(),
        })?;

    Ok(ProjectSummary::from_row(absolute, cell_text(cells[2])))
}
