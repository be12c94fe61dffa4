//! Page addresses on the tracker site.

use url::Url;

use super::ScrapeError;
use crate::project::ProjectIds;

/// Default tracker root.
pub const DEFAULT_BASE_URL: &str = "https://www.apps2.dgs.ca.gov/dsa/tracker/";

const PROJECT_LIST_PAGE: &str = "ProjectList.aspx";
const CLOSEOUT_PAGE: &str = "ProjectCloseout.aspx";

/// Marker every project row link carries.
pub const SUMMARY_PAGE: &str = "ApplicationSummary.aspx";

/// Builds tracker page URLs relative to one base directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteUrls {
    base: Url,
}

impl SiteUrls {
    /// Creates the URL set for `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidBaseUrl`] unless `base_url` is an
    /// absolute http(s) URL whose path ends in `/`.
    pub fn new(base_url: &str) -> Result<Self, ScrapeError> {
        let base = Url::parse(base_url)
            .map_err(|e| ScrapeError::invalid_base_url(base_url, e.to_string()))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ScrapeError::invalid_base_url(base_url, "scheme must be http or https"));
        }
        if !base.path().ends_with('/') {
            return Err(ScrapeError::invalid_base_url(base_url, "path must end with '/'"));
        }
        Ok(Self { base })
    }

    /// The base directory all pages live under.
    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Project list page for one client.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::InvalidClientId`] for a blank client id.
    pub fn project_list(&self, client_id: &str) -> Result<String, ScrapeError> {
        let client_id = client_id.trim();
        if client_id.is_empty() {
            return Err(ScrapeError::InvalidClientId {
                client_id: client_id.to_string(),
            });
        }
        let mut url = self.page(PROJECT_LIST_PAGE);
        url.query_pairs_mut().append_pair("ClientId", client_id);
        Ok(url.into())
    }

    /// Closeout page for a project.
    #[must_use]
    pub fn closeout(&self, ids: &ProjectIds) -> String {
        let mut url = self.page(CLOSEOUT_PAGE);
        url.query_pairs_mut()
            .append_pair("OriginId", &ids.origin_id)
            .append_pair("AppId", &ids.app_id);
        url.into()
    }

    /// Closeout page for the project a summary URL points at, when the
    /// summary URL carries both identifiers.
    #[must_use]
    pub fn closeout_for(&self, summary_url: &str) -> Option<String> {
        ProjectIds::from_url(summary_url).map(|ids| self.closeout(&ids))
    }

    /// Resolves a link as written in a page against the base directory.
    #[must_use]
    pub fn absolutize(&self, href: &str) -> Option<String> {
        self.base.join(href.trim()).ok().map(Into::into)
    }

    fn page(&self, name: &str) -> Url {
        let mut url = self.base.clone();
        let path = format!("{}{name}", self.base.path());
        url.set_path(&path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

impl Default for SiteUrls {
    fn default() -> Self {
        Self {
            base: Url::parse(DEFAULT_BASE_URL)
                .unwrap_or_else(|e| panic!("invalid default base URL '{DEFAULT_BASE_URL}': {e}")),
        }
    }
}
