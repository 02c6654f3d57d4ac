//! Report rows produced for qualifying papers.

use serde::{Deserialize, Serialize};

use super::{AuthorRecord, PaperRecord};

/// Column headers of the report, in output order
pub const REPORT_COLUMNS: [&str; 6] = [
    "PubmedID",
    "Title",
    "Publication Date",
    "Non-academic Author(s)",
    "Company Affiliation(s)",
    "Corresponding Author Email",
];

/// Separator used when joining author names and affiliations
pub const FIELD_SEPARATOR: &str = "; ";

/// One output row, for a paper with at least one non-academic author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "PubmedID")]
    pub pmid: Option<String>,

    #[serde(rename = "Title")]
    pub title: Option<String>,

    #[serde(rename = "Publication Date")]
    pub published_date: Option<String>,

    #[serde(rename = "Non-academic Author(s)")]
    pub non_academic_authors: String,

    #[serde(rename = "Company Affiliation(s)")]
    pub company_affiliations: String,

    /// Email of the first non-academic author, which is not necessarily
    /// the paper's actual corresponding author
    #[serde(rename = "Corresponding Author Email")]
    pub corresponding_email: String,
}

impl ReportRow {
    /// Project a paper onto a row given its non-academic authors.
    ///
    /// Returns `None` when `industry_authors` is empty.
    pub fn project(paper: &PaperRecord, industry_authors: &[&AuthorRecord]) -> Option<Self> {
        let first = industry_authors.first()?;

        Some(Self {
            pmid: paper.pmid.clone(),
            title: paper.title.clone(),
            published_date: paper.published_date.clone(),
            non_academic_authors: industry_authors
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR),
            company_affiliations: industry_authors
                .iter()
                .map(|a| a.affiliation.as_str())
                .collect::<Vec<_>>()
                .join(FIELD_SEPARATOR),
            corresponding_email: first.email.clone(),
        })
    }

    /// Cell values in column order; missing values become empty strings
    pub fn cells(&self) -> [&str; 6] {
        [
            self.pmid.as_deref().unwrap_or_default(),
            self.title.as_deref().unwrap_or_default(),
            self.published_date.as_deref().unwrap_or_default(),
            &self.non_academic_authors,
            &self.company_affiliations,
            &self.corresponding_email,
        ]
    }
}
