//! Issue titles: one short line per top story of a period, deduplicated.

use chrono::NaiveDate;
use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::article::ArticleRecord;
use crate::tags::normalize_title;

pub const ISSUE_LINE_MAX_CHARS: usize = 120;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueTitleRow {
    pub title: String,
    pub link: Option<String>,
    pub source: Option<String>,
    pub date: Option<NaiveDate>,
}

fn sentence_break_re() -> &'static Regex {
    static RE: OnceCell<Regex> = OnceCell::new();
    RE.get_or_init(|| Regex::new(r"[.!?\u{3002}\u{FF0E}\u{FF01}\u{FF1F}]|\n").expect("sentence regex"))
}

/// First sentence of `summary` (or of `fallback_title` when the summary is blank),
/// markdown stars removed, capped at [`ISSUE_LINE_MAX_CHARS`] characters.
pub fn issue_line(summary: Option<&str>, fallback_title: &str) -> String {
    let base = match summary {
        Some(s) if !s.trim().is_empty() => s,
        _ => fallback_title,
    };
    let cleaned = base.replace('*', "");
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let first = sentence_break_re()
        .split(trimmed)
        .next()
        .unwrap_or(trimmed)
        .trim();
    if first.chars().count() > ISSUE_LINE_MAX_CHARS {
        first
            .chars()
            .take(ISSUE_LINE_MAX_CHARS)
            .collect::<String>()
            .trim()
            .to_string()
    } else {
        first.to_string()
    }
}

/// Turn retrieval-ordered articles into at most `limit` distinct issue lines.
pub fn build_issue_titles(articles: &[ArticleRecord], limit: usize) -> Vec<IssueTitleRow> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for a in articles {
        if out.len() >= limit {
            break;
        }
        let title = issue_line(a.summary(), a.display_title());
        let key = normalize_title(&title);
        if key.is_empty() || !seen.insert(key) {
            continue;
        }
        out.push(IssueTitleRow {
            title,
            link: a.link.clone(),
            source: a.source.clone(),
            date: a.published_date,
        });
    }
    out
}
