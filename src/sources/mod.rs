//! Literature sources feeding the search and fetch stages.
//!
//! The [`Source`] trait splits retrieval into two calls: [`Source::search_ids`]
//! resolves a free-text query into record identifiers, and
//! [`Source::fetch_papers`] turns identifiers into [`PaperRecord`]s with
//! author affiliations. [`PubMedSource`] talks to NCBI E-utilities;
//! [`MockSource`] serves canned data for tests.

mod pubmed;

pub mod mock;

pub use mock::MockSource;
pub use pubmed::PubMedSource;

use crate::models::{PaperRecord, SearchQuery};
use crate::utils::XmlError;
use async_trait::async_trait;

/// Interface for a literature database with a search and a batch fetch endpoint
#[async_trait]
pub trait Source: Send + Sync + std::fmt::Debug {
    /// Resolve a query into record identifiers, in the source's relevance order.
    ///
    /// Zero matches is an empty vector, not an error.
    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError>;

    /// Fetch full records for `ids` in one batch.
    ///
    /// An empty `ids` slice returns an empty vector without contacting the
    /// source. Output order follows the response document.
    async fn fetch_papers(&self, ids: &[String]) -> Result<Vec<PaperRecord>, SourceError>;
}

/// Errors that can occur when interacting with a source
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Connection failure or unreadable response body
    #[error("Network error: {0}")]
    Network(String),

    /// The source answered with a non-success status or an error payload
    #[error("API error: {0}")]
    Api(String),

    /// Response body did not have the expected JSON or XML shape
    #[error("Parse error: {0}")]
    Parse(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(err: serde_json::Error) -> Self {
        SourceError::Parse(format!("JSON: {}", err))
    }
}

impl From<XmlError> for SourceError {
    fn from(err: XmlError) -> Self {
        SourceError::Parse(format!("XML: {}", err))
    }
}
