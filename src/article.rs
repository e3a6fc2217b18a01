//! # Article records
//! Immutable article snapshots handed to the engine by the data collaborator.
//!
//! Titles and summaries come in two flavours: the original scraped `title`
//! plus translated/processed variants (`kor_title`, `kor_summary`,
//! `id_summary`). The helpers here pick the best available text.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

fn default_pharma_related() -> bool {
    true
}

/// One processed news article.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRecord {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub kor_title: Option<String>,
    #[serde(default)]
    pub kor_summary: Option<String>,
    #[serde(default)]
    pub id_summary: Option<String>,
    /// Full body text, used only for keyword matching.
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub published_date: Option<NaiveDate>,
    /// Editorial importance, nominally 0..=100.
    #[serde(default)]
    pub importance: Option<i32>,
    /// Raw tag container (array, JSON string, or comma list). See [`crate::tags::parse_tags`].
    #[serde(default)]
    pub tags: serde_json::Value,
    #[serde(default = "default_pharma_related")]
    pub pharma_related: bool,
}

impl ArticleRecord {
    /// Translated title if present, otherwise the original one.
    pub fn display_title(&self) -> &str {
        match non_blank(self.kor_title.as_deref()) {
            Some(t) => t,
            None => &self.title,
        }
    }

    /// Translated summary, falling back to the Indonesian summary.
    pub fn summary(&self) -> Option<&str> {
        non_blank(self.kor_summary.as_deref()).or_else(|| non_blank(self.id_summary.as_deref()))
    }

    /// Text fed to the similarity tokenizer: display title plus summary.
    pub fn title_for_similarity(&self) -> String {
        match self.summary() {
            Some(s) => format!("{} {}", self.display_title(), s),
            None => self.display_title().to_string(),
        }
    }

    pub fn importance_safe(&self) -> i32 {
        self.importance.unwrap_or(0)
    }

    /// Best single piece of text describing the article for insight corpora:
    /// summary, else translated title, else original title.
    pub fn insight_text(&self) -> Option<&str> {
        self.summary()
            .or_else(|| non_blank(self.kor_title.as_deref()))
            .or_else(|| non_blank(Some(self.title.as_str())))
    }

    pub fn to_ref(&self) -> ArticleRef {
        ArticleRef {
            article_id: self.id,
            title: self.display_title().to_string(),
            link: self.link.clone(),
            source: self.source.clone(),
            date: self.published_date,
            importance: self.importance,
        }
    }
}

/// Compact reference to an article, used in cluster samples.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRef {
    pub article_id: i64,
    pub title: String,
    pub link: Option<String>,
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
    pub importance: Option<i32>,
}

pub(crate) fn non_blank(s: Option<&str>) -> Option<&str> {
    s.filter(|v| !v.trim().is_empty())
}
