//! Address normalization collaborator.
//!
//! The scraper does not normalize addresses itself. It gathers the raw
//! address, city and zip of every detail record into a de-duplicated batch,
//! hands the batch to an [`AddressNormalizer`], and projects the answers into
//! an `Addresses` sheet.
//!
//! # Example
//!
//! ```
//! use tracker_core::address::{MemoryNormalizer, address_sheet};
//! use tracker_core::project::{DetailField, ProjectDetail};
//!
//! # async fn example() -> Result<(), tracker_core::address::AddressError> {
//! let mut detail = ProjectDetail::default();
//! detail.set_field(DetailField::Address, "1  main st");
//!
//! let normalizer = MemoryNormalizer::new();
//! let sheet = address_sheet(&normalizer, &[detail]).await?;
//! assert_eq!(sheet.rows.len(), 1);
//! # Ok(())
//! # }
//! ```

mod memory;

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::export::Sheet;
use crate::project::ProjectDetail;
use crate::project::columns::{ADDRESS, APP_ID, CITY, ZIP};

pub use memory::MemoryNormalizer;

/// Name of the optional address sheet.
pub const ADDRESS_SHEET: &str = "Addresses";

/// Column holding the normalizer's answer.
pub const NORMALIZED_COLUMN: &str = "Normalized Address";

/// Errors reported by a normalizer.
#[derive(Debug, Error)]
pub enum AddressError {
    /// The normalizer backend could not be reached or answered badly.
    #[error("address normalizer '{backend}' failed: {message}")]
    Backend {
        /// Normalizer name.
        backend: String,
        /// Backend-specific description.
        message: String,
    },
}

/// One raw address as it appeared on a summary page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct AddressRecord {
    pub address: String,
    pub city: Option<String>,
    pub zip: Option<String>,
    /// Record key of the project it came from (its appId).
    pub label: String,
}

impl AddressRecord {
    /// Key identifying the raw address text, shared by every project at the
    /// same address.
    #[must_use]
    pub fn key(&self) -> String {
        let mut key = self.address.clone();
        if let Some(city) = &self.city {
            key.push_str(", ");
            key.push_str(city);
        }
        if let Some(zip) = &self.zip {
            key.push(' ');
            key.push_str(zip);
        }
        key
    }
}

/// Hit/miss counters of a normalizer's cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub size: usize,
    pub hits: usize,
    pub misses: usize,
}

/// Batch address normalizer with a cache.
///
/// # Object Safety
///
/// Uses `async_trait` so callers can hold a `Box<dyn AddressNormalizer>`.
#[async_trait]
pub trait AddressNormalizer: Send + Sync {
    /// Short backend name for logs and errors.
    fn name(&self) -> &str;

    /// Normalizes a batch, returning normalized text keyed by
    /// [`AddressRecord::key`]. Records the backend cannot normalize are
    /// left out of the map.
    async fn normalize_batch(
        &self,
        records: &[AddressRecord],
    ) -> Result<HashMap<String, String>, AddressError>;

    /// Current cache counters.
    fn cache_stats(&self) -> CacheStats;
}

/// Collects one record per distinct raw address from `details`, in first-seen
/// order. Details without an address are skipped.
#[must_use]
pub fn collect_address_records(details: &[ProjectDetail]) -> Vec<AddressRecord> {
    let mut seen = HashSet::new();
    details
        .iter()
        .filter_map(|detail| {
            let summary = &detail.summary;
            let address = summary.address.clone()?;
            Some(AddressRecord {
                address,
                city: summary.city.clone(),
                zip: summary.zip.clone(),
                label: summary.app_id.clone(),
            })
        })
        .filter(|record| seen.insert(record.key()))
        .collect()
}

/// Projects normalizer answers into the `Addresses` sheet, one row per
/// record. Records without an answer get a `null` normalized cell.
#[must_use]
pub fn build_address_sheet(records: &[AddressRecord], normalized: &HashMap<String, String>) -> Sheet {
    let mut sheet = Sheet::new(ADDRESS_SHEET, &[APP_ID, ADDRESS, CITY, ZIP, NORMALIZED_COLUMN]);
    for record in records {
        let key = record.key();
        sheet.push_row(|column| match column {
            APP_ID => Some(record.label.as_str()),
            ADDRESS => Some(record.address.as_str()),
            CITY => record.city.as_deref(),
            ZIP => record.zip.as_deref(),
            NORMALIZED_COLUMN => normalized.get(&key).map(String::as_str),
            _ => None,
        });
    }
    sheet
}

/// Runs `normalizer` over the addresses in `details` and builds the
/// `Addresses` sheet.
///
/// # Errors
///
/// Propagates the normalizer's [`AddressError`].
#[instrument(skip_all, fields(normalizer = normalizer.name(), details = details.len()))]
pub async fn address_sheet(
    normalizer: &dyn AddressNormalizer,
    details: &[ProjectDetail],
) -> Result<Sheet, AddressError> {
    let records = collect_address_records(details);
    if records.is_empty() {
        debug!("no addresses to normalize");
        return Ok(build_address_sheet(&records, &HashMap::new()));
    }

    let normalized = normalizer.normalize_batch(&records).await?;
    let missing = records
        .iter()
        .filter(|record| !normalized.contains_key(&record.key()))
        .count();
    if missing > 0 {
        warn!(missing, "normalizer left some addresses unresolved");
    }

    let stats = normalizer.cache_stats();
    info!(
        addresses = records.len(),
        cache_size = stats.size,
        cache_hits = stats.hits,
        cache_misses = stats.misses,
        "normalized addresses"
    );
    Ok(build_address_sheet(&records, &normalized))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::project::{DetailField, ProjectSummary};

    fn detail(app: &str, address: Option<&str>, city: Option<&str>) -> ProjectDetail {
        let mut detail = ProjectDetail::new(ProjectSummary::from_row(
            format!("x?OriginId=1&AppId={app}"),
            "n",
        ));
        if let Some(address) = address {
            detail.set_field(DetailField::Address, address);
        }
        if let Some(city) = city {
            detail.set_field(DetailField::City, city);
        }
        detail
    }

    struct FailingNormalizer;

    #[async_trait]
    impl AddressNormalizer for FailingNormalizer {
        fn name(&self) -> &str {
            "failing"
        }

        async fn normalize_batch(
            &self,
            _records: &[AddressRecord],
        ) -> Result<HashMap<String, String>, AddressError> {
            Err(AddressError::Backend {
                backend: "failing".into(),
                message: "offline".into(),
            })
        }

        fn cache_stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    #[test]
    fn test_record_key_joins_parts() {
        let record = AddressRecord {
            address: "1 Main St".into(),
            city: Some("Fresno".into()),
            zip: Some("93701".into()),
            label: "1 2".into(),
        };
        assert_eq!(record.key(), "1 Main St, Fresno 93701");
    }

    #[test]
    fn test_collect_skips_missing_and_duplicate_addresses() {
        let details = [
            detail("1", Some("1 Main St"), Some("Fresno")),
            detail("2", None, Some("Fresno")),
            detail("3", Some("1 Main St"), Some("Fresno")),
            detail("4", Some("1 Main St"), Some("Clovis")),
        ];
        let records = collect_address_records(&details);
        let labels: Vec<&str> = records.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["1 1", "1 4"]);
    }

    #[test]
    fn test_address_sheet_marks_unresolved_cells_null() {
        let records = collect_address_records(&[detail("1", Some("1 Main St"), None)]);
        let sheet = build_address_sheet(&records, &HashMap::new());
        assert_eq!(sheet.cell(0, ADDRESS), Some("1 Main St"));
        assert_eq!(sheet.cell(0, NORMALIZED_COLUMN), None);
        assert_eq!(sheet.cell(0, CITY), None);
    }

    #[tokio::test]
    async fn test_address_sheet_propagates_backend_errors() {
        let details = [detail("1", Some("1 Main St"), None)];
        let result = address_sheet(&FailingNormalizer, &details).await;
        assert!(matches!(result, Err(AddressError::Backend { .. })));
    }

    #[tokio::test]
    async fn test_address_sheet_without_addresses_skips_backend() {
        let details = [detail("1", None, None)];
        let sheet = address_sheet(&FailingNormalizer, &details).await.unwrap();
        assert!(sheet.rows.is_empty());
    }
}
