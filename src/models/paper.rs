//! Paper and author records as parsed from the fetch stage.

use serde::{Deserialize, Serialize};

use crate::utils::extract_email;

/// A single author of a paper
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorRecord {
    /// "First Last", trimmed; empty when the record carries neither name part
    pub name: String,

    /// Free-text affiliation, empty when absent
    pub affiliation: String,

    /// First email-shaped substring of the affiliation, empty when none
    pub email: String,
}

impl AuthorRecord {
    /// Create an author from name parts and affiliation text.
    ///
    /// The email is derived from the affiliation; PubMed has no separate field for it.
    pub fn new(first: &str, last: &str, affiliation: impl Into<String>) -> Self {
        let affiliation = affiliation.into();
        let email = extract_email(&affiliation).unwrap_or_default().to_string();

        Self {
            name: format!("{} {}", first, last).trim().to_string(),
            affiliation,
            email,
        }
    }
}

/// A paper returned by the fetch stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaperRecord {
    /// PubMed identifier; `None` if the entry had no PMID element
    pub pmid: Option<String>,

    /// Article title
    pub title: Option<String>,

    /// Publication year, or the free-text MedlineDate when no year is given
    pub published_date: Option<String>,

    /// Authors in the order listed by the source
    pub authors: Vec<AuthorRecord>,
}

impl PaperRecord {
    /// Create a new paper with only an identifier
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            pmid: Some(pmid.into()),
            ..Default::default()
        }
    }
}

/// Builder for constructing PaperRecord objects
#[derive(Debug, Clone, Default)]
pub struct PaperBuilder {
    paper: PaperRecord,
}

impl PaperBuilder {
    /// Create a new builder for the given PMID
    pub fn new(pmid: impl Into<String>) -> Self {
        Self {
            paper: PaperRecord::new(pmid),
        }
    }

    /// Set the PMID, or clear it
    pub fn pmid(mut self, pmid: Option<String>) -> Self {
        self.paper.pmid = pmid;
        self
    }

    /// Set title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.paper.title = Some(title.into());
        self
    }

    /// Set publication date
    pub fn published_date(mut self, date: impl Into<String>) -> Self {
        self.paper.published_date = Some(date.into());
        self
    }

    /// Append an author
    pub fn author(mut self, author: AuthorRecord) -> Self {
        self.paper.authors.push(author);
        self
    }

    /// Replace the author list
    pub fn authors(mut self, authors: Vec<AuthorRecord>) -> Self {
        self.paper.authors = authors;
        self
    }

    /// Build the PaperRecord
    pub fn build(self) -> PaperRecord {
        self.paper
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_author_name_joins_parts() {
        let author = AuthorRecord::new("Jane", "Doe", "");
        assert_eq!(author.name, "Jane Doe");
    }

    #[test]
    fn test_author_name_missing_parts() {
        assert_eq!(AuthorRecord::new("", "Doe", "").name, "Doe");
        assert_eq!(AuthorRecord::new("Jane", "", "").name, "Jane");
        assert_eq!(AuthorRecord::new("", "", "").name, "");
    }

    #[test]
    fn test_author_email_from_affiliation() {
        let author = AuthorRecord::new(
            "Jane",
            "Doe",
            "Pfizer Inc, New York, NY, USA. jane.doe@pfizer.com.",
        );
        assert_eq!(author.email, "jane.doe@pfizer.com.");

        let author = AuthorRecord::new("Jane", "Doe", "Pfizer Inc, New York");
        assert_eq!(author.email, "");
    }

    #[test]
    fn test_paper_builder() {
        let paper = PaperBuilder::new("12345")
            .title("Test Paper")
            .published_date("2021")
            .author(AuthorRecord::new("A", "B", "MIT"))
            .author(AuthorRecord::new("C", "D", "Pfizer Inc"))
            .build();

        assert_eq!(paper.pmid.as_deref(), Some("12345"));
        assert_eq!(paper.title.as_deref(), Some("Test Paper"));
        assert_eq!(paper.published_date.as_deref(), Some("2021"));
        assert_eq!(paper.authors.len(), 2);
        assert_eq!(paper.authors[1].name, "C D");
    }
}
