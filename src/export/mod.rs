//! Tabular export of a walk: named sheets projected by column name, written
//! as one JSON workbook.
//!
//! Cells are `null` where a record has no value for a column, so "unknown"
//! survives the export distinct from an empty string.

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::fetch::StatsSnapshot;
use crate::project::columns::{FINANCIAL_COLUMNS, SUMMARY_COLUMNS, TECHNICAL_COLUMNS};
use crate::project::{ProjectDetail, ProjectSummary};

pub const PROJECT_LIST_SHEET: &str = "Project List";
pub const FINANCIAL_SHEET: &str = "Financial Details";
pub const TECHNICAL_SHEET: &str = "Technical Requirements";

/// Errors produced while writing a workbook.
#[derive(Debug, Error)]
pub enum ExportError {
    /// I/O error creating the output directory or file.
    #[error("I/O error writing export: {0}")]
    Io(#[from] std::io::Error),
    /// JSON serialization error.
    #[error("JSON serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One named table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sheet {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl Sheet {
    /// Creates an empty sheet with the given columns.
    #[must_use]
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            columns: columns.iter().map(ToString::to_string).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends one row, projecting `cell` over the sheet's columns.
    pub fn push_row<'r>(&mut self, cell: impl Fn(&str) -> Option<&'r str>) {
        let row = self
            .columns
            .iter()
            .map(|column| cell(column).map(ToString::to_string))
            .collect();
        self.rows.push(row);
    }

    /// Returns the value at `row`, `column`, if both exist and the cell has
    /// a value.
    #[must_use]
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.get(index)?.as_deref()
    }
}

/// Every sheet of one run plus run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Workbook {
    pub client_id: String,
    /// Unix seconds at build time.
    pub generated_at: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<StatsSnapshot>,
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Returns the sheet called `name`.
    #[must_use]
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Adds a sheet after the existing ones.
    pub fn push_sheet(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    /// Records run statistics in the workbook.
    #[must_use]
    pub fn with_stats(mut self, stats: StatsSnapshot) -> Self {
        self.stats = Some(stats);
        self
    }

    /// File name this workbook is written under:
    /// `projects_<client>_<unix-seconds>.json`, with characters outside
    /// `[A-Za-z0-9_-]` in the client id replaced by `_`.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.file_name_with_suffix(1)
    }

    /// `file_name`, with `_<n>` before the extension for `n > 1`.
    fn file_name_with_suffix(&self, n: u32) -> String {
        let client: String = self
            .client_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        if n > 1 {
            format!("projects_{client}_{}_{n}.json", self.generated_at)
        } else {
            format!("projects_{client}_{}.json", self.generated_at)
        }
    }
}

/// `Project List`: every summary, all six identity columns.
#[must_use]
pub fn project_list_sheet(summaries: &[ProjectSummary]) -> Sheet {
    let mut sheet = Sheet::new(PROJECT_LIST_SHEET, &SUMMARY_COLUMNS);
    for summary in summaries {
        sheet.push_row(|column| summary.column(column));
    }
    sheet
}

/// A detail sheet restricted to the candidate columns that at least one
/// detail record has a value for, in candidate order.
#[must_use]
pub fn detail_sheet(name: &str, details: &[ProjectDetail], candidates: &[&str]) -> Sheet {
    let present: Vec<&str> = candidates
        .iter()
        .copied()
        .filter(|column| details.iter().any(|detail| detail.column(column).is_some()))
        .collect();

    let mut sheet = Sheet::new(name, &present);
    for detail in details {
        sheet.push_row(|column| detail.column(column));
    }
    sheet
}

/// Builds the three standard sheets for one walk.
#[must_use]
#[instrument(skip(summaries, details), fields(summaries = summaries.len(), details = details.len()))]
pub fn build_workbook(
    client_id: &str,
    summaries: &[ProjectSummary],
    details: &[ProjectDetail],
) -> Workbook {
    let sheets = vec![
        project_list_sheet(summaries),
        detail_sheet(FINANCIAL_SHEET, details, &FINANCIAL_COLUMNS),
        detail_sheet(TECHNICAL_SHEET, details, &TECHNICAL_COLUMNS),
    ];
    debug!(sheets = sheets.len(), "built workbook");
    Workbook {
        client_id: client_id.to_string(),
        generated_at: unix_seconds(),
        stats: None,
        sheets,
    }
}

/// Highest `_<n>` suffix tried before giving up on a free file name.
const MAX_NAME_SUFFIX: u32 = 100;

/// Writes `workbook` into `dir` (created if missing) and returns the path.
///
/// An existing file is never overwritten: when the name is taken, `_2`,
/// `_3`, ... are appended before the extension.
///
/// # Errors
///
/// Returns [`ExportError`] on I/O or serialization failure, including when
/// every suffixed name is taken.
#[instrument(skip(workbook), fields(dir = %dir.display()))]
pub fn write_json(workbook: &Workbook, dir: &Path) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;
    let (path, file) = create_unique(workbook, dir)?;

    let mut writer = BufWriter::new(file);
    let write_result = serde_json::to_writer_pretty(&mut writer, workbook)
        .map_err(ExportError::from)
        .and_then(|()| writer.flush().map_err(ExportError::from));
    if let Err(err) = write_result {
        drop(writer);
        let _ = fs::remove_file(&path);
        return Err(err);
    }

    info!(path = %path.display(), "export written");
    Ok(path)
}

fn create_unique(workbook: &Workbook, dir: &Path) -> Result<(PathBuf, fs::File), ExportError> {
    for n in 1..=MAX_NAME_SUFFIX {
        let path = dir.join(workbook.file_name_with_suffix(n));
        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
        {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "export name taken, trying next suffix");
            }
            Err(err) => return Err(err.into()),
        }
    }
    Err(std::io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "no free export name for {} in {}",
            workbook.file_name(),
            dir.display()
        ),
    )
    .into())
}

fn unix_seconds() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::project::{DetailField, Indicator, IndicatorField};

    fn summary(name: &str) -> ProjectSummary {
        ProjectSummary::from_row(format!("http://t/ApplicationSummary.aspx?OriginId=1&AppId={name}"), name)
    }

    #[test]
    fn test_project_list_sheet_has_all_columns() {
        let sheet = project_list_sheet(&[summary("a"), summary("b")]);
        assert_eq!(sheet.columns, SUMMARY_COLUMNS.to_vec());
        assert_eq!(sheet.rows.len(), 2);
        assert_eq!(sheet.cell(1, "DSA AppId"), Some("1 b"));
        assert_eq!(sheet.cell(0, "Project Cert Type"), Some(""));
    }

    #[test]
    fn test_detail_sheet_keeps_only_present_columns() {
        let mut first = ProjectDetail::new(summary("a"));
        first.set_field(DetailField::FinalProjectCost, "$5");
        let mut second = ProjectDetail::new(summary("b"));
        second.set_indicator(IndicatorField::Hps, Indicator::Yes);

        let details = [first, second];
        let financial = detail_sheet(FINANCIAL_SHEET, &details, &FINANCIAL_COLUMNS);
        assert_eq!(
            financial.columns,
            vec!["DSA AppId", "Project Name", "PTN", "Final Project Cost"]
        );
        assert_eq!(financial.cell(0, "Final Project Cost"), Some("$5"));
        assert_eq!(financial.cell(1, "Final Project Cost"), None);

        let technical = detail_sheet(TECHNICAL_SHEET, &details, &TECHNICAL_COLUMNS);
        assert_eq!(technical.columns, vec!["DSA AppId", "Project Name", "HPS"]);
        assert_eq!(technical.cell(1, "HPS"), Some("Yes"));
    }

    #[test]
    fn test_detail_sheet_without_details_is_empty() {
        let sheet = detail_sheet(TECHNICAL_SHEET, &[], &TECHNICAL_COLUMNS);
        assert!(sheet.columns.is_empty());
        assert!(sheet.rows.is_empty());
    }

    #[test]
    fn test_build_workbook_sheet_order() {
        let workbook = build_workbook("36-67", &[summary("a")], &[]);
        let names: Vec<&str> = workbook.sheets.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec![PROJECT_LIST_SHEET, FINANCIAL_SHEET, TECHNICAL_SHEET]);
        assert!(workbook.file_name().starts_with("projects_"));
        assert!(workbook.sheet(PROJECT_LIST_SHEET).is_some());
    }

    #[test]
    fn test_write_json_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out");
        let workbook = build_workbook("36-67", &[summary("a")], &[]);

        let path = write_json(&workbook, &target).unwrap();
        assert_eq!(path.file_name().unwrap().to_str().unwrap(), workbook.file_name());

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["client_id"], "36-67");
        assert_eq!(value["sheets"][0]["name"], "Project List");
        assert_eq!(value["sheets"][0]["rows"][0][1], "1 a");
        assert!(value.get("stats").is_none());
    }

    #[test]
    fn test_file_name_carries_client_id() {
        let mut workbook = build_workbook("36/67 x", &[], &[]);
        workbook.generated_at = 1_700_000_000;
        assert_eq!(workbook.file_name(), "projects_36_67_x_1700000000.json");
    }

    #[test]
    fn test_write_json_same_second_keeps_both_runs() {
        let dir = tempfile::tempdir().unwrap();
        let first = build_workbook("36-67", &[summary("a")], &[]);
        let mut second = build_workbook("36-67", &[summary("b")], &[]);
        second.generated_at = first.generated_at;

        let first_path = write_json(&first, dir.path()).unwrap();
        let second_path = write_json(&second, dir.path()).unwrap();

        assert_ne!(first_path, second_path);
        assert!(second_path.to_str().unwrap().ends_with("_2.json"));
        let kept: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&first_path).unwrap()).unwrap();
        assert_eq!(kept["sheets"][0]["rows"][0][1], "1 a");
        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&second_path).unwrap()).unwrap();
        assert_eq!(written["sheets"][0]["rows"][0][1], "1 b");
    }

    #[test]
    fn test_different_clients_never_share_a_name() {
        let mut a = build_workbook("36-67", &[], &[]);
        let mut b = build_workbook("12-34", &[], &[]);
        a.generated_at = 5;
        b.generated_at = 5;
        assert_ne!(a.file_name(), b.file_name());
    }
}
