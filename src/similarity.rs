//! Token sets and Jaccard similarity for story clustering.

use std::collections::BTreeSet;

use crate::tags::normalize_keyword;

pub type TokenSet = BTreeSet<String>;

/// Tokens shorter than this (in chars) are dropped.
const MIN_TOKEN_CHARS: usize = 2;

/// Lowercased alphanumeric tokens of `text`, as a set.
pub fn tokenize(text: &str) -> TokenSet {
    normalize_keyword(text)
        .split(' ')
        .filter(|t| t.chars().count() >= MIN_TOKEN_CHARS)
        .map(str::to_string)
        .collect()
}

/// `|A ∩ B| / |A ∪ B|`; zero when either side is empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let inter = a.intersection(b).count();
    let union = a.len() + b.len() - inter;
    if union == 0 {
        0.0
    } else {
        inter as f64 / union as f64
    }
}
