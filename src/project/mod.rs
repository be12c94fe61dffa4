//! Project records, identifiers and export column names.

pub mod columns;
mod ids;
mod record;

pub use ids::{APP_ID_PARAM, ORIGIN_ID_PARAM, ProjectIds, derive_app_id, query_param};
pub use record::{DetailField, Indicator, IndicatorField, ProjectDetail, ProjectSummary};
