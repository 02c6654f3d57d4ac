//! Email extraction from free-text affiliations.

use regex::Regex;
use std::sync::OnceLock;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"[\w.-]+@[\w.-]+").expect("valid email regex"))
}

/// Return the first email-shaped substring of `text`.
///
/// The pattern is loose: any run of word characters, dots and
/// dashes on both sides of an `@`. Trailing punctuation such as a sentence
/// period is kept.
pub fn extract_email(text: &str) -> Option<&str> {
    email_regex().find(text).map(|m| m.as_str())
}
