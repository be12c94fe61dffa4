//! User-Agent string for tracker requests.
//!
//! One fixed, honest identifier; rotating agents is not this crate's job.

/// Project URL for User-Agent identification (RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/tracker-scraper";

/// Default User-Agent for every request (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("tracker-scraper/{version} (public-records-tool; +{PROJECT_UA_URL})")
}
