//! Query and label normalization.

use std::collections::BTreeSet;

/// Normalize text for comparison: lowercase, trimmed, internal whitespace
/// collapsed to single spaces.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Distinct lowercase whitespace tokens with edge punctuation trimmed.
pub fn tokenize(text: &str) -> BTreeSet<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|word| !word.is_empty())
        .map(str::to_lowercase)
        .collect()
}
