//! Export column names and the fixed column sets of each sheet.
//!
//! Sheets project records by these exact strings, so they must never drift
//! from the serde renames on the record types.

pub const LINK: &str = "Link";
pub const APP_ID: &str = "DSA AppId";
pub const PTN: &str = "PTN";
pub const PROJECT_NAME: &str = "Project Name";
pub const PROJECT_SCOPE: &str = "Project Scope";
pub const CERT_TYPE: &str = "Project Cert Type";
pub const ADDRESS: &str = "Address";
pub const CITY: &str = "City";
pub const ZIP: &str = "Zip";

/// Columns of the `Project List` sheet; always emitted in full.
pub const SUMMARY_COLUMNS: [&str; 6] = [LINK, APP_ID, PTN, PROJECT_NAME, PROJECT_SCOPE, CERT_TYPE];

/// Candidate columns of the `Financial Details` sheet.
pub const FINANCIAL_COLUMNS: [&str; 14] = [
    APP_ID,
    PROJECT_NAME,
    PTN,
    "Estimated Amount",
    "Contracted Amount",
    "Change Document Amount",
    "Final Project Cost",
    "Received Date",
    "Approved Date",
    "Closed Date",
    "Project Type",
    "Project Class",
    ADDRESS,
    CITY,
];

/// Candidate columns of the `Technical Requirements` sheet.
pub const TECHNICAL_COLUMNS: [&str; 14] = [
    APP_ID,
    PROJECT_NAME,
    "Project Type",
    "Project Class",
    "Access Compliance",
    "Fire & Life Safety",
    "Structural Safety",
    "Auto Fire Detection",
    "Sprinkler System",
    "Field Review",
    "CGS Review",
    "HPS",
    "Special Type",
    "Number of Increments",
];
