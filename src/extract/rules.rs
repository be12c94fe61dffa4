//! Ordered rule tables driving extraction.
//!
//! Order matters in every table here: field mappings are applied in
//! sequence and certification patterns are tried in priority order.

use std::sync::LazyLock;

use regex::Regex;

use crate::project::DetailField;

/// Compiles a regex at static init; panics on invalid pattern.
pub fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Summary-page label for the project tracking number.
pub static PTN_LABEL: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"(?i)PTN\s+#:"));

/// Summary-page label for the project name.
pub static NAME_LABEL: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)Project\s+Name:"));

/// Summary-page label for the project scope.
pub static SCOPE_LABEL: LazyLock<Regex> =
    LazyLock::new(|| compile_static_regex(r"(?i)Project\s+Scope:"));

/// One row of the field mapping table: exact page label to record slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Whole-cell label text, compared case-insensitively.
    pub label: &'static str,
    /// Slot the adjacent value is written to.
    pub field: DetailField,
}

const fn mapping(label: &'static str, field: DetailField) -> FieldMapping {
    FieldMapping { label, field }
}

/// Exact-label field mappings for the summary page, in extraction order.
pub const FIELD_MAPPINGS: [FieldMapping; 25] = [
    mapping("Office ID:", DetailField::OfficeId),
    mapping("Application #:", DetailField::ApplicationNumber),
    mapping("File #:", DetailField::FileNumber),
    mapping("PTN #:", DetailField::PtnNumber),
    mapping("OPSC #:", DetailField::OpscNumber),
    mapping("Project Type:", DetailField::ProjectType),
    mapping("Project Class:", DetailField::ProjectClass),
    mapping("Special Type:", DetailField::SpecialType),
    mapping("# Of Incr:", DetailField::NumberOfIncrements),
    mapping("Address:", DetailField::Address),
    mapping("City:", DetailField::City),
    mapping("Zip:", DetailField::Zip),
    mapping("Estimated Amt:", DetailField::EstimatedAmount),
    mapping("Contracted Amt:", DetailField::ContractedAmount),
    mapping(
        "Construction Change Document Amt:",
        DetailField::ChangeDocumentAmount,
    ),
    mapping("Final Project Cost:", DetailField::FinalProjectCost),
    mapping("Adj Est.Date#1:", DetailField::AdjustmentDate1),
    mapping("Adj Est.Amt#1:", DetailField::AdjustmentAmount1),
    mapping("Adj Est.Date#2:", DetailField::AdjustmentDate2),
    mapping("Adj Est.Amt#2:", DetailField::AdjustmentAmount2),
    mapping("Received Date:", DetailField::ReceivedDate),
    mapping("Approved Date:", DetailField::ApprovedDate),
    mapping("Approval Ext. Date:", DetailField::ApprovalExtensionDate),
    mapping("Closed Date:", DetailField::ClosedDate),
    mapping(
        "Complete Submittal Received Date:",
        DetailField::CompleteSubmittalDate,
    ),
];

/// Closeout-page label consulted before the fallback patterns.
pub const CERT_LABEL: &str = "Last Certification Letter Type:";

/// Certification fallback patterns, highest priority first.
///
/// Several may match one page; the earliest entry wins. Compiled
/// case-insensitively by [`CertificationResolver`](super::CertificationResolver).
pub const CERT_PATTERNS: [&str; 4] = [
    r"#\d+-Certification & Close of File(?:\s+Per EDU Code \d+\(\w+\)\s+OR\s+\d+\(\w+\))?",
    r"DSA 301P Notification of Requirement for Certification",
    r"#\d+-Close of File w/o Certification - Exceptions",
    r"1 YR VOID",
];
