//! Mock source for testing purposes.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::models::{PaperRecord, SearchQuery};
use crate::sources::{Source, SourceError};

/// A mock source for testing that returns predefined responses.
#[derive(Debug, Default)]
pub struct MockSource {
    ids: Mutex<Vec<String>>,
    papers: Mutex<Vec<PaperRecord>>,
    search_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
}

impl MockSource {
    /// Create a new mock source with no data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the identifiers returned by `search_ids`.
    pub fn set_ids<I, S>(&self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut guard = self.ids.lock().unwrap();
        *guard = ids.into_iter().map(Into::into).collect();
    }

    /// Set the papers returned by `fetch_papers`.
    pub fn set_papers(&self, papers: Vec<PaperRecord>) {
        let mut guard = self.papers.lock().unwrap();
        *guard = papers;
    }

    /// Number of times `search_ids` was called.
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    /// Number of times `fetch_papers` was called.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Source for MockSource {
    async fn search_ids(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.ids.lock().unwrap();
        Ok(guard.iter().take(query.max_results).cloned().collect())
    }

    async fn fetch_papers(&self, _ids: &[String]) -> Result<Vec<PaperRecord>, SourceError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let guard = self.papers.lock().unwrap();
        Ok(guard.clone())
    }
}
