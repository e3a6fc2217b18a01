// src/store/mod.rs
//! Data collaborator consumed by the report engine.
//!
//! The engine never talks to a database itself; it asks an [`ArticleStore`]
//! for already-materialized slices of the article pool. Errors from the store
//! abort the whole report.

pub mod memory;

use anyhow::{anyhow, Result};
use chrono::{NaiveDate, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::article::ArticleRecord;

pub use memory::MemoryStore;

/// Inclusive calendar-day range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Number of days covered, counting both ends.
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Last `days` days ending at `self.end`.
    pub fn trailing(&self, days: i64) -> Result<Self> {
        Ok(Self {
            start: shift_back(self.end, days.saturating_sub(1))?,
            end: self.end,
        })
    }

    /// Equal-length window immediately before this one.
    pub fn previous(&self) -> Result<Self> {
        Ok(Self {
            start: shift_back(self.start, self.days())?,
            end: shift_back(self.start, 1)?,
        })
    }
}

/// `date - days`, or an error when the result leaves chrono's calendar.
pub fn shift_back(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(days)
        .and_then(|d| date.checked_sub_signed(d))
        .ok_or_else(|| anyhow!("date out of range: {date} minus {days} days"))
}

/// Raw tags of one article plus its publication day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagRow {
    pub date: Option<NaiveDate>,
    pub tags: serde_json::Value,
}

#[async_trait::async_trait]
pub trait ArticleStore: Send + Sync {
    /// Number of qualifying articles matching `keyword` in `range`.
    async fn count_articles(&self, keyword: &str, range: DateRange) -> Result<usize>;

    /// `(date, count)` for days with at least one match, ascending by date.
    async fn daily_counts(&self, keyword: &str, range: DateRange) -> Result<Vec<(NaiveDate, usize)>>;

    /// `(source, count)` sorted by count desc.
    async fn source_breakdown(&self, keyword: &str, range: DateRange) -> Result<Vec<(String, usize)>>;

    /// Best articles: importance desc, then date desc, then id desc.
    /// `keyword = None` means every qualifying article in range.
    async fn top_articles(
        &self,
        keyword: Option<&str>,
        range: DateRange,
        limit: usize,
    ) -> Result<Vec<ArticleRecord>>;

    /// Tag rows of qualifying articles in range, optionally keyword-scoped.
    async fn tags_in_range(&self, range: DateRange, keyword: Option<&str>) -> Result<Vec<TagRow>>;

    /// `(min, max)` publication date, `None` when the store is empty.
    async fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>>;

    fn name(&self) -> &'static str;
}
