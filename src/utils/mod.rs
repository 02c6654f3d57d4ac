//! Utility modules supporting the search/fetch/report pipeline.
//!
//! - [`HttpClient`]: shared reqwest client
//! - [`parse_document`] and [`XmlElement`]: owned XML tree with depth-first lookups
//! - [`extract_email`]: pull an email address out of affiliation text
//! - [`write_report`]: render report rows as CSV, JSON or a table
//!
//! # Depth-first lookup
//!
//! ```rust
//! use industry_papers::utils::parse_document;
//!
//! let root = parse_document("<Author><AffiliationInfo><Affiliation>Acme Inc</Affiliation></AffiliationInfo></Author>").unwrap();
//! assert_eq!(root.find_text("Affiliation").as_deref(), Some("Acme Inc"));
//! ```

mod email;
mod http;
mod report;
mod xml;

pub use email::extract_email;
pub use http::HttpClient;
pub use report::{write_report, ReportError, ReportFormat, NO_RESULTS_MESSAGE};
pub use xml::{parse_document, XmlElement, XmlError, XmlNode};
