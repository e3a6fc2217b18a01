// src/store/memory.rs
//! In-memory [`ArticleStore`] over a loaded article pool (JSON file or vector).
//! Used by the CLI and by tests; mirrors the query semantics a SQL-backed
//! store would have.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::path::Path;

use crate::article::{non_blank, ArticleRecord};
use crate::store::{ArticleStore, DateRange, TagRow};

pub struct MemoryStore {
    articles: Vec<ArticleRecord>,
}

impl MemoryStore {
    pub fn new(articles: Vec<ArticleRecord>) -> Self {
        Self { articles }
    }

    /// Parse a JSON array of articles.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let articles: Vec<ArticleRecord> =
            serde_json::from_str(s).context("parse article pool JSON")?;
        Ok(Self::new(articles))
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let s = std::fs::read_to_string(path)
            .with_context(|| format!("reading article pool from {}", path.display()))?;
        Self::from_json_str(&s)
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Pharma-related articles published inside `range`.
    fn in_range(&self, range: DateRange) -> impl Iterator<Item = &ArticleRecord> {
        self.articles.iter().filter(move |a| {
            a.pharma_related && a.published_date.is_some_and(|d| range.contains(d))
        })
    }

    fn matching<'a>(
        &'a self,
        keyword: &'a str,
        range: DateRange,
    ) -> impl Iterator<Item = &'a ArticleRecord> + 'a {
        let needle = keyword.to_lowercase();
        self.in_range(range)
            .filter(move |a| matches_keyword(a, &needle))
    }
}

/// Case-insensitive substring match on the display title or the body text.
fn matches_keyword(a: &ArticleRecord, needle_lower: &str) -> bool {
    if a.display_title().to_lowercase().contains(needle_lower) {
        return true;
    }
    let body = non_blank(a.kor_summary.as_deref()).or(a.content.as_deref());
    body.is_some_and(|b| b.to_lowercase().contains(needle_lower))
}

/// importance desc (missing last), date desc (missing last), id desc.
pub fn retrieval_order(a: &ArticleRecord, b: &ArticleRecord) -> Ordering {
    desc_nulls_last(a.importance, b.importance)
        .then_with(|| desc_nulls_last(a.published_date, b.published_date))
        .then_with(|| b.id.cmp(&a.id))
}

fn desc_nulls_last<T: Ord>(a: Option<T>, b: Option<T>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[async_trait]
impl ArticleStore for MemoryStore {
    async fn count_articles(&self, keyword: &str, range: DateRange) -> Result<usize> {
        Ok(self.matching(keyword, range).count())
    }

    async fn daily_counts(&self, keyword: &str, range: DateRange) -> Result<Vec<(NaiveDate, usize)>> {
        let mut by_day = std::collections::BTreeMap::new();
        for a in self.matching(keyword, range) {
            if let Some(d) = a.published_date {
                *by_day.entry(d).or_insert(0usize) += 1;
            }
        }
        Ok(by_day.into_iter().collect())
    }

    async fn source_breakdown(&self, keyword: &str, range: DateRange) -> Result<Vec<(String, usize)>> {
        let mut rows: Vec<(String, usize)> = Vec::new();
        for a in self.matching(keyword, range) {
            let source = a.source.clone().unwrap_or_else(|| "Unknown".to_string());
            match rows.iter_mut().find(|(s, _)| *s == source) {
                Some((_, c)) => *c += 1,
                None => rows.push((source, 1)),
            }
        }
        rows.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(rows)
    }

    async fn top_articles(
        &self,
        keyword: Option<&str>,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ArticleRecord>> {
        let mut picked: Vec<&ArticleRecord> = match keyword {
            Some(kw) => self.matching(kw, range).collect(),
            None => self.in_range(range).collect(),
        };
        picked.sort_by(|a, b| retrieval_order(a, b));
        Ok(picked.into_iter().take(limit).cloned().collect())
    }

    async fn tags_in_range(&self, range: DateRange, keyword: Option<&str>) -> Result<Vec<TagRow>> {
        let rows = match keyword {
            Some(kw) => self.matching(kw, range).collect::<Vec<_>>(),
            None => self.in_range(range).collect::<Vec<_>>(),
        };
        Ok(rows
            .into_iter()
            .filter(|a| !a.tags.is_null())
            .map(|a| TagRow {
                date: a.published_date,
                tags: a.tags.clone(),
            })
            .collect())
    }

    async fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let mut dates = self.articles.iter().filter_map(|a| a.published_date);
        let Some(first) = dates.next() else {
            return Ok(None);
        };
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(Some((min, max)))
    }

    fn name(&self) -> &'static str {
        "MemoryStore"
    }
}
