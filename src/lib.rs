//! # Industry Papers
//!
//! Finds PubMed papers with at least one author affiliated with a
//! pharmaceutical, biotech or other commercial organisation.
//!
//! ## Architecture
//!
//! - [`sources`]: the search and fetch stages behind the [`Source`] trait
//! - [`classify`]: keyword-based affiliation classification
//! - [`pipeline`]: runs search, fetch and classification and projects report rows
//! - [`models`]: queries, paper and author records, report rows
//! - [`utils`]: HTTP client, XML tree, email extraction, report rendering
//! - [`config`]: layered configuration

pub mod classify;
pub mod config;
pub mod models;
pub mod pipeline;
pub mod sources;
pub mod utils;

// Re-export commonly used types
pub use classify::{AffiliationClassifier, AffiliationKeywords};
pub use models::{PaperRecord, ReportRow};
pub use pipeline::IndustryAuthorPipeline;
pub use sources::{PubMedSource, Source};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
