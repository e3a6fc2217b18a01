//! # Keyword ranking & trends
//!
//! Counts are **per distinct article**: an article tagged `["Vaksin", "vaksin"]`
//! adds one to `vaksin`, not two. Ties keep first-seen order, so the output
//! is reproducible regardless of hashing.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::keywords::KeywordVocabulary;
use crate::store::TagRow;
use crate::tags::{normalize_keyword, parse_tags};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordRankRow {
    /// Display form (first raw spelling seen).
    pub keyword: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeywordTrendRow {
    pub keyword: String,
    pub points: Vec<TrendPoint>,
}

/// Tag co-mentioned with a tracked keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MentionRow {
    pub keyword: String,
    pub tag: String,
    pub count: usize,
}

/// Insertion-ordered counter keyed by normalized keyword.
#[derive(Debug, Default)]
pub struct KeywordCounter {
    index: HashMap<String, usize>,
    entries: Vec<(String, String, usize)>,
}

impl KeywordCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one for `normalized`; `display` is only kept the first time.
    pub fn bump(&mut self, normalized: &str, display: &str) {
        match self.index.get(normalized) {
            Some(&i) => self.entries[i].2 += 1,
            None => {
                self.index.insert(normalized.to_string(), self.entries.len());
                self.entries
                    .push((normalized.to_string(), display.to_string(), 1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `(display, count)` sorted by count desc, stable on first-seen order.
    pub fn top(self, limit: usize) -> Vec<(String, usize)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.2.cmp(&a.2));
        entries
            .into_iter()
            .take(limit)
            .map(|(_, display, count)| (display, count))
            .collect()
    }
}

/// Distinct meaningful tags of one article as `(normalized, display)` pairs.
fn unique_meaningful(row: &TagRow, vocab: &KeywordVocabulary) -> Vec<(String, String)> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for tag in parse_tags(&row.tags) {
        if !vocab.is_meaningful(&tag) {
            continue;
        }
        let normalized = normalize_keyword(&tag);
        if seen.insert(normalized.clone()) {
            out.push((normalized, tag));
        }
    }
    out
}

/// Top `limit` meaningful keywords across `rows`.
pub fn rank_keywords(rows: &[TagRow], vocab: &KeywordVocabulary, limit: usize) -> Vec<KeywordRankRow> {
    let mut counter = KeywordCounter::new();
    for row in rows {
        for (normalized, display) in unique_meaningful(row, vocab) {
            counter.bump(&normalized, &display);
        }
    }
    counter
        .top(limit)
        .into_iter()
        .map(|(keyword, count)| KeywordRankRow { keyword, count })
        .collect()
}

/// Tags co-occurring with `keyword` (the keyword itself excluded).
pub fn co_mentions(
    rows: &[TagRow],
    vocab: &KeywordVocabulary,
    keyword: &str,
    limit: usize,
) -> Vec<MentionRow> {
    let own = normalize_keyword(keyword);
    let mut counter = KeywordCounter::new();
    for row in rows {
        for (normalized, display) in unique_meaningful(row, vocab) {
            if normalized == own {
                continue;
            }
            counter.bump(&normalized, &display);
        }
    }
    counter
        .top(limit)
        .into_iter()
        .map(|(tag, count)| MentionRow {
            keyword: keyword.to_string(),
            tag,
            count,
        })
        .collect()
}

/// Calendar days `start..=end`. Empty when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start.iter_days().take_while(move |d| *d <= end)
}

/// Dense daily series for each of `keywords` over `[start, end]`.
///
/// Keywords match tags by normalized form; rows without a date are skipped.
pub fn build_trends(
    rows: &[TagRow],
    keywords: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<KeywordTrendRow> {
    if keywords.is_empty() {
        return Vec::new();
    }
    let keys: Vec<String> = keywords.iter().map(|k| normalize_keyword(k)).collect();
    let mut by_key: Vec<HashMap<NaiveDate, usize>> = vec![HashMap::new(); keys.len()];

    for row in rows {
        let Some(date) = row.date else { continue };
        let unique: HashSet<String> = parse_tags(&row.tags)
            .iter()
            .map(|t| normalize_keyword(t))
            .collect();
        for (i, key) in keys.iter().enumerate() {
            if unique.contains(key) {
                *by_key[i].entry(date).or_insert(0) += 1;
            }
        }
    }

    keywords
        .iter()
        .zip(by_key)
        .map(|(keyword, counts)| KeywordTrendRow {
            keyword: keyword.clone(),
            points: days_inclusive(start, end)
                .map(|date| TrendPoint {
                    date,
                    count: counts.get(&date).copied().unwrap_or(0),
                })
                .collect(),
        })
        .collect()
}
