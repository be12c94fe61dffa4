//! Error types for the extract module.
//!
//! Extraction itself never fails; only building a matcher from a bad pattern
//! does.

use thiserror::Error;

/// Errors raised while constructing label matchers or resolvers.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A label or certification pattern is not a valid regex.
    #[error("invalid extraction pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern text.
        pattern: String,
        /// The regex compiler's complaint.
        #[source]
        source: regex::Error,
    },

    /// A certification resolver was given no fallback patterns.
    #[error("certification resolver needs at least one fallback pattern")]
    NoPatterns,
}

impl ExtractError {
    /// Creates an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, source: regex::Error) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            source,
        }
    }
}
