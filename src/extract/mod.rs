//! Field extraction from tracker pages.
//!
//! - [`labels`] finds values by the text of the cell that labels them
//! - [`certification`] resolves the certification type of a closeout page
//! - [`rules`] holds the ordered label and pattern tables

pub mod certification;
mod error;
pub mod labels;
pub mod rules;

pub use certification::{CertResolution, CertSource, CertificationResolver};
pub use error::ExtractError;
pub use labels::{
    LabelMatcher, cell_text, extract_by_label, extract_indicator, find_label_cell, normalize_text,
    value_text,
};
pub use rules::{CERT_LABEL, CERT_PATTERNS, FIELD_MAPPINGS, FieldMapping, compile_static_regex};
