//! Constants for the fetch module (timeouts, default headers).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default whole-request timeout (2 minutes; tracker pages render slowly).
pub const READ_TIMEOUT_SECS: u64 = 120;

/// `Accept` header sent with every request.
pub const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// `Accept-Language` header sent with every request.
pub const ACCEPT_LANGUAGE_EN: &str = "en-US,en;q=0.5";

/// Content type for form-encoded POST bodies.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
