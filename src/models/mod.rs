//! Core data models for search queries, fetched papers and report rows.

mod paper;
mod report;
mod search;

pub use paper::{AuthorRecord, PaperBuilder, PaperRecord};
pub use report::{ReportRow, FIELD_SEPARATOR, REPORT_COLUMNS};
pub use search::{SearchQuery, DEFAULT_MAX_RESULTS};
