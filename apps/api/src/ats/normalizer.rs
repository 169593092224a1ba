use std::sync::LazyLock;

use regex::Regex;

/// Common short words dropped from the token list.
pub const STOPWORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "of", "in", "on", "with", "for", "to", "from", "by", "as",
    "at", "this", "that", "is", "are", "be", "have", "has", "it", "its",
];

static WORD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Lower-cased resume text plus its stopword-filtered word tokens.
///
/// Keyword matching runs against `lowered`, never `tokens`: phrases such as
/// "machine learning" or "ci/cd" only survive in the full text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    pub lowered: String,
    pub tokens: Vec<String>,
}

pub fn normalize(text: &str) -> NormalizedText {
    let lowered = text.to_lowercase();
    let tokens = WORD_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !is_stopword(w))
        .map(String::from)
        .collect();

    NormalizedText { lowered, tokens }
}

pub fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word)
}
