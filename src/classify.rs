//! Affiliation classification.
//!
//! An affiliation is non-academic when its lower-cased text contains any
//! industry keyword. Industry keywords are checked first, so "Pharma Dept,
//! University of X" is non-academic. Text matching neither list, including
//! the empty string, is treated as academic.
//!
//! Matching is plain substring search with no word boundaries: "inc" also
//! matches "Vincent" or "Princeton". The default lists reproduce that
//! behaviour exactly; supply different [`AffiliationKeywords`] to change it.

use serde::{Deserialize, Serialize};

/// Industry keywords, checked first
pub const DEFAULT_INDUSTRY_KEYWORDS: [&str; 11] = [
    "pharma",
    "pharmaceutical",
    "biotech",
    "inc",
    "ltd",
    "gmbh",
    "s.a.",
    "corp",
    "company",
    "laboratories",
    "labs",
];

/// Academic keywords, checked only when no industry keyword matched
pub const DEFAULT_ACADEMIC_KEYWORDS: [&str; 9] = [
    "university",
    "institute",
    "college",
    "school",
    "hospital",
    "faculty",
    "department",
    "center",
    "centre",
];

/// Outcome of classifying one affiliation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffiliationKind {
    /// Matched an industry keyword
    Industry,
    /// Matched an academic keyword and no industry keyword
    Academic,
    /// Matched nothing; counted as academic
    Unknown,
}

impl AffiliationKind {
    /// Whether this kind counts as a commercial affiliation
    pub fn is_non_academic(self) -> bool {
        matches!(self, AffiliationKind::Industry)
    }
}

/// Ordered keyword lists used by [`AffiliationClassifier`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AffiliationKeywords {
    #[serde(default = "default_industry")]
    pub industry_keywords: Vec<String>,

    #[serde(default = "default_academic")]
    pub academic_keywords: Vec<String>,
}

impl Default for AffiliationKeywords {
    fn default() -> Self {
        Self {
            industry_keywords: default_industry(),
            academic_keywords: default_academic(),
        }
    }
}

fn default_industry() -> Vec<String> {
    DEFAULT_INDUSTRY_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

fn default_academic() -> Vec<String> {
    DEFAULT_ACADEMIC_KEYWORDS.iter().map(|k| k.to_string()).collect()
}

impl AffiliationKeywords {
    /// Build keyword lists from arbitrary strings
    pub fn new<I, A>(industry: I, academic: A) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
        A: IntoIterator,
        A::Item: Into<String>,
    {
        Self {
            industry_keywords: industry.into_iter().map(Into::into).collect(),
            academic_keywords: academic.into_iter().map(Into::into).collect(),
        }
    }

    /// Lower-case every keyword and drop empty entries.
    ///
    /// An empty keyword would match every affiliation.
    pub fn normalized(self) -> Self {
        let clean = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|k| k.to_lowercase())
                .filter(|k| !k.is_empty())
                .collect()
        };

        Self {
            industry_keywords: clean(self.industry_keywords),
            academic_keywords: clean(self.academic_keywords),
        }
    }
}

/// Classifies affiliation text with injected keyword lists
#[derive(Debug, Clone, Default)]
pub struct AffiliationClassifier {
    keywords: AffiliationKeywords,
}

impl AffiliationClassifier {
    /// Create a classifier; keywords are normalized to lower case
    pub fn new(keywords: AffiliationKeywords) -> Self {
        Self {
            keywords: keywords.normalized(),
        }
    }

    /// The keyword lists in use
    pub fn keywords(&self) -> &AffiliationKeywords {
        &self.keywords
    }

    /// Classify one affiliation string
    pub fn classify(&self, affiliation: &str) -> AffiliationKind {
        let text = affiliation.to_lowercase();

        if self
            .keywords
            .industry_keywords
            .iter()
            .any(|k| text.contains(k.as_str()))
        {
            return AffiliationKind::Industry;
        }

        if self
            .keywords
            .academic_keywords
            .iter()
            .any(|k| text.contains(k.as_str()))
        {
            return AffiliationKind::Academic;
        }

        AffiliationKind::Unknown
    }

    /// Whether an affiliation counts as non-academic
    pub fn is_non_academic(&self, affiliation: &str) -> bool {
        self.classify(affiliation).is_non_academic()
    }
}
