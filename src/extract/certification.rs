//! Certification type resolution for the closeout page.
//!
//! Two stages, tried in order:
//! 1. the value cell next to the `Last Certification Letter Type:` label;
//! 2. the ordered fallback patterns, scanned against every text node of the
//!    page. The first *pattern* (not the first text node) with any match wins.
//!
//! An unresolved page yields an empty string, never an error.

use regex::{Regex, RegexBuilder};
use scraper::Html;
use tracing::{debug, instrument};

use super::labels::{LabelMatcher, extract_by_label};
use super::rules::{CERT_LABEL, CERT_PATTERNS};
use super::ExtractError;

/// Where a certification type came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertSource {
    /// The labelled value cell.
    Label,
    /// Fallback pattern at this index of the priority list.
    Pattern(usize),
}

/// A resolved certification type and how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertResolution {
    pub cert_type: String,
    pub source: CertSource,
}

/// Resolves a project's most recent certification type.
///
/// The pattern list is an opaque priority table; [`Default`] uses the
/// built-in one.
#[derive(Debug, Clone)]
pub struct CertificationResolver {
    label: LabelMatcher,
    patterns: Vec<Regex>,
}

impl Default for CertificationResolver {
    fn default() -> Self {
        let label = LabelMatcher::Pattern(case_insensitive_literal(CERT_LABEL));
        let patterns = CERT_PATTERNS
            .iter()
            .map(|pattern| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
            })
            .collect();
        Self { label, patterns }
    }
}

impl CertificationResolver {
    /// Creates a resolver with a custom label and fallback patterns.
    ///
    /// `label` is matched literally (case-insensitive, anywhere in the cell);
    /// `patterns` are regexes compiled case-insensitively and tried in the
    /// order given.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::NoPatterns`] for an empty list, or
    /// [`ExtractError::InvalidPattern`] for the first pattern that fails to
    /// compile.
    pub fn new<S: AsRef<str>>(label: &str, patterns: &[S]) -> Result<Self, ExtractError> {
        if patterns.is_empty() {
            return Err(ExtractError::NoPatterns);
        }
        let patterns = patterns
            .iter()
            .map(|pattern| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .map_err(|source| ExtractError::invalid_pattern(pattern, source))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            label: LabelMatcher::Pattern(case_insensitive_literal(label)),
            patterns,
        })
    }

    /// Number of fallback patterns.
    #[must_use]
    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Returns the certification type, or an empty string when unresolved.
    #[must_use]
    pub fn resolve_cert_type(&self, doc: &Html) -> String {
        self.resolve(doc)
            .map(|resolution| resolution.cert_type)
            .unwrap_or_default()
    }

    /// Returns the certification type with its provenance.
    #[instrument(level = "debug", skip_all)]
    pub fn resolve(&self, doc: &Html) -> Option<CertResolution> {
        if let Some(cert_type) = extract_by_label(doc, &self.label).filter(|v| !v.is_empty()) {
            debug!(%cert_type, "certification type from label");
            return Some(CertResolution {
                cert_type,
                source: CertSource::Label,
            });
        }

        let texts: Vec<&str> = doc
            .root_element()
            .descendants()
            .filter_map(|node| node.value().as_text())
            .map(|text| &**text)
            .collect();

        for (index, pattern) in self.patterns.iter().enumerate() {
            if let Some(text) = texts.iter().find(|text| pattern.is_match(text)) {
                let cert_type = text.trim().to_string();
                debug!(%cert_type, pattern_index = index, "certification type from fallback pattern");
                return Some(CertResolution {
                    cert_type,
                    source: CertSource::Pattern(index),
                });
            }
        }

        debug!("certification type unresolved");
        None
    }
}

fn case_insensitive_literal(text: &str) -> Regex {
    let pattern = regex::escape(text);
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}
