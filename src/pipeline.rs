//! Search, fetch and filter orchestration.
//!
//! Stages run strictly one after another: the PMID list from the search stage
//! is the input of the fetch stage, and the fetched papers are classified
//! author by author. Papers without a non-academic author are dropped.

use std::sync::Arc;

use crate::classify::AffiliationClassifier;
use crate::models::{AuthorRecord, PaperRecord, ReportRow, SearchQuery};
use crate::sources::{Source, SourceError};

/// Result of a full pipeline run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineOutcome {
    /// PMIDs returned by the search stage
    pub pmid_count: usize,

    /// Papers parsed from the fetch stage
    pub paper_count: usize,

    /// One row per qualifying paper, in fetch order
    pub rows: Vec<ReportRow>,
}

/// Runs a query through a [`Source`] and keeps papers with industry authors
#[derive(Debug, Clone)]
pub struct IndustryAuthorPipeline {
    source: Arc<dyn Source>,
    classifier: AffiliationClassifier,
}

impl IndustryAuthorPipeline {
    pub fn new(source: Arc<dyn Source>, classifier: AffiliationClassifier) -> Self {
        Self { source, classifier }
    }

    /// Search stage: resolve the query into PMIDs
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<String>, SourceError> {
        self.source.search_ids(query).await
    }

    /// Fetch and classification stages for an already resolved PMID list.
    ///
    /// An empty list never reaches the source.
    pub async fn report(&self, pmids: &[String]) -> Result<Vec<ReportRow>, SourceError> {
        let (_, rows) = self.fetch_and_classify(pmids).await?;
        Ok(rows)
    }

    /// Run every stage for `query`
    pub async fn run(&self, query: &SearchQuery) -> Result<PipelineOutcome, SourceError> {
        let pmids = self.search(query).await?;
        if pmids.is_empty() {
            tracing::info!(query = %query.query, "Search returned no PMIDs");
        }

        let (paper_count, rows) = self.fetch_and_classify(&pmids).await?;

        Ok(PipelineOutcome {
            pmid_count: pmids.len(),
            paper_count,
            rows,
        })
    }

    async fn fetch_and_classify(
        &self,
        pmids: &[String],
    ) -> Result<(usize, Vec<ReportRow>), SourceError> {
        if pmids.is_empty() {
            return Ok((0, Vec::new()));
        }

        let papers = self.source.fetch_papers(pmids).await?;
        let rows = qualifying_rows(&papers, &self.classifier);

        tracing::debug!(
            papers = papers.len(),
            qualifying = rows.len(),
            "Classified fetched papers"
        );
        Ok((papers.len(), rows))
    }
}

/// Authors of `paper` with a non-academic affiliation, in original order
pub fn non_academic_authors<'a>(
    paper: &'a PaperRecord,
    classifier: &AffiliationClassifier,
) -> Vec<&'a AuthorRecord> {
    paper
        .authors
        .iter()
        .filter(|a| classifier.is_non_academic(&a.affiliation))
        .collect()
}

/// Project every qualifying paper onto a report row
pub fn qualifying_rows(papers: &[PaperRecord], classifier: &AffiliationClassifier) -> Vec<ReportRow> {
    papers
        .iter()
        .filter_map(|paper| {
            let authors = non_academic_authors(paper, classifier);
            ReportRow::project(paper, &authors)
        })
        .collect()
}
