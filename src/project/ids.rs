//! Compound project identifiers carried in tracker URLs.
//!
//! A project is addressed by two query parameters, `OriginId` and `AppId`.
//! Their space-joined form is the record key used across every export sheet.

/// Query parameter holding the originating office id.
pub const ORIGIN_ID_PARAM: &str = "OriginId";

/// Query parameter holding the application id.
pub const APP_ID_PARAM: &str = "AppId";

/// The `OriginId`/`AppId` pair from a project URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectIds {
    /// Value of `OriginId`.
    pub origin_id: String,
    /// Value of `AppId`.
    pub app_id: String,
}

impl ProjectIds {
    /// Reads both identifiers from `url`'s query string.
    ///
    /// Works on absolute and relative URLs. Returns `None` unless both
    /// parameters are present with a non-blank value.
    #[must_use]
    pub fn from_url(url: &str) -> Option<Self> {
        let origin_id = query_param(url, ORIGIN_ID_PARAM)?;
        let app_id = query_param(url, APP_ID_PARAM)?;
        Some(Self { origin_id, app_id })
    }

    /// Returns the space-joined record key, e.g. `"12 345"`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{} {}", self.origin_id, self.app_id)
    }
}

/// Derives the `DSA AppId` record key from a project URL.
///
/// Returns an empty string when either parameter is missing; that is a
/// normal outcome, not an error.
///
/// ```
/// use tracker_core::project::derive_app_id;
///
/// assert_eq!(derive_app_id("ApplicationSummary.aspx?OriginId=12&AppId=345"), "12 345");
/// assert_eq!(derive_app_id("ApplicationSummary.aspx?OriginId=12"), "");
/// ```
#[must_use]
pub fn derive_app_id(url: &str) -> String {
    ProjectIds::from_url(url)
        .map(|ids| ids.key())
        .unwrap_or_default()
}

/// Returns the first non-blank value of query parameter `name` in `url`.
///
/// Parameter names match exactly; blank values are skipped so a repeated
/// parameter can still supply a value.
#[must_use]
pub fn query_param(url: &str, name: &str) -> Option<String> {
    let (_, rest) = url.split_once('?')?;
    let query = rest.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, value)| key == name && !value.trim().is_empty())
        .map(|(_, value)| value.trim().to_string())
}
