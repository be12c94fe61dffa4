//! Per-project detail pipeline: summary page, then closeout page.
//!
//! Only the summary page fetch can fail the pipeline. Everything after it
//! degrades: a missing label leaves its slot empty, an unreachable closeout
//! page leaves the certification type unresolved.

use scraper::Html;
use tracing::{debug, instrument, warn};

use super::{DetailError, SiteUrls};
use crate::extract::rules::{FIELD_MAPPINGS, NAME_LABEL, PTN_LABEL, SCOPE_LABEL};
use crate::extract::{CertificationResolver, LabelMatcher, extract_by_label, extract_indicator};
use crate::fetch::Fetcher;
use crate::project::{IndicatorField, ProjectDetail, ProjectSummary};

/// Both views of one project produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailOutcome {
    /// Fields that mirror the list record.
    pub basic: ProjectSummary,
    /// Superset record with every recovered optional field.
    pub detailed: ProjectDetail,
}

/// Runs extraction for one project URL.
///
/// Borrows the run's fetcher, so every request is paced and counted with
/// the rest of the run.
#[derive(Debug, Clone, Copy)]
pub struct DetailPipeline<'a> {
    fetcher: &'a Fetcher,
    site: &'a SiteUrls,
    resolver: &'a CertificationResolver,
}

impl<'a> DetailPipeline<'a> {
    #[must_use]
    pub fn new(
        fetcher: &'a Fetcher,
        site: &'a SiteUrls,
        resolver: &'a CertificationResolver,
    ) -> Self {
        Self {
            fetcher,
            site,
            resolver,
        }
    }

    /// Fetches and extracts the project behind `summary_url`.
    ///
    /// # Errors
    ///
    /// Returns [`DetailError::SummaryFetch`] when the summary page cannot be
    /// fetched. No other step fails the pipeline.
    #[instrument(skip_all, fields(url = %summary_url))]
    pub async fn run(&self, summary_url: &str) -> Result<DetailOutcome, DetailError> {
        let page = self
            .fetcher
            .get(summary_url)
            .await
            .map_err(|e| DetailError::summary_fetch(summary_url, e))?;

        let mut detailed = extract_summary_page(&page.body);

        match self.site.closeout_for(summary_url) {
            Some(closeout_url) => {
                detailed.summary.cert_type = self.certification(&closeout_url).await;
            }
            None => debug!("summary URL lacks OriginId/AppId, skipping closeout page"),
        }

        Ok(DetailOutcome {
            basic: detailed.summary.clone(),
            detailed,
        })
    }

    async fn certification(&self, closeout_url: &str) -> String {
        match self.fetcher.get(closeout_url).await {
            Ok(page) => {
                let doc = Html::parse_document(&page.body);
                self.resolver.resolve_cert_type(&doc)
            }
            Err(error) => {
                warn!(url = closeout_url, error = %error, "closeout page unavailable, certification unresolved");
                String::new()
            }
        }
    }
}

/// Extracts everything the summary page offers.
///
/// Summary fields are matched by pattern; mapped fields and indicators by
/// exact label. Mapped fields are written only when non-empty.
#[must_use]
pub fn extract_summary_page(body: &str) -> ProjectDetail {
    let doc = Html::parse_document(body);
    let mut detail = ProjectDetail::default();

    let summary = &mut detail.summary;
    if let Some(ptn) = extract_by_label(&doc, &LabelMatcher::regex(PTN_LABEL.clone())) {
        summary.ptn = ptn;
    }
    if let Some(name) = extract_by_label(&doc, &LabelMatcher::regex(NAME_LABEL.clone())) {
        summary.name = name;
    }
    summary.scope =
        extract_by_label(&doc, &LabelMatcher::regex(SCOPE_LABEL.clone())).unwrap_or_default();

    let mut mapped = 0usize;
    for mapping in &FIELD_MAPPINGS {
        let value = extract_by_label(&doc, &LabelMatcher::exact(mapping.label));
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            detail.set_field(mapping.field, value);
            mapped += 1;
        }
    }

    let mut indicators = 0usize;
    for field in IndicatorField::ALL {
        if let Some(state) = extract_indicator(&doc, field.label()) {
            detail.set_indicator(field, state);
            indicators += 1;
        }
    }

    debug!(
        ptn = %detail.summary.ptn,
        mapped_fields = mapped,
        indicators,
        "extracted summary page"
    );
    detail
}
