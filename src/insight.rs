//! # Insight synthesizer
//! Rule-based, deterministic one-paragraph summary per keyword.
//!
//! The paragraph is a fixed template filled with:
//! - the strategic category detected from co-mention tags and article text,
//! - the two most frequent co-mentioned tags,
//! - an optional trend clause from the period-over-period delta.

use serde::{Deserialize, Serialize};

use crate::article::ArticleRecord;
use crate::ranking::MentionRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InsightRow {
    pub keyword: String,
    pub summary: String,
}

/// A themed vocabulary plus the phrases the template uses for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StrategicCategory {
    pub label: &'static str,
    pub needles: &'static [&'static str],
    pub strategy_estimate: &'static str,
    pub mid_long_direction: &'static str,
    pub our_impact: &'static str,
    pub competition_impact: &'static str,
}

pub const INVESTMENT: StrategicCategory = StrategicCategory {
    label: "investment/share price",
    needles: &["투자", "주가", "매수", "외국인", "자사주", "수급", "증권사", "목표가"],
    strategy_estimate: "growing investor interest in the market",
    mid_long_direction: "strengthening capital-market capabilities",
    our_impact: "shifts in investor sentiment",
    competition_impact: "market positioning competition",
};

pub const MERGERS: StrategicCategory = StrategicCategory {
    label: "M&A/merger",
    needles: &["합병", "인수", "m&a", "acquisition", "merger", "포트폴리오", "외형 성장"],
    strategy_estimate: "a stronger business expansion strategy",
    mid_long_direction: "a possible portfolio restructuring",
    our_impact: "market consolidation",
    competition_impact: "changes in the competitive landscape",
};

pub const PRODUCT: StrategicCategory = StrategicCategory {
    label: "product/new drug/clinical",
    needles: &["의약품", "신약", "제품", "임상", "pipeline", "launch", "drug", "medicine"],
    strategy_estimate: "an expanding product portfolio",
    mid_long_direction: "an R&D-driven growth model",
    our_impact: "intensifying competition in the same therapeutic area",
    competition_impact: "market share movement",
};

pub const REGULATION: StrategicCategory = StrategicCategory {
    label: "regulation/policy",
    needles: &["규제", "정책", "정부", "허가", "승인", "bpom", "moh", "policy", "approval"],
    strategy_estimate: "adaptation to a changing regulatory environment",
    mid_long_direction: "more mature approval and compliance processes",
    our_impact: "a heavier regulatory compliance burden",
    competition_impact: "approval speed competition",
};

pub const BUSINESS: StrategicCategory = StrategicCategory {
    label: "business/market",
    needles: &[],
    strategy_estimate: "a reorganized business strategy",
    mid_long_direction: "adjusted mid- to long-term strategic direction",
    our_impact: "a changing competitive environment",
    competition_impact: "market response strategy",
};

/// Evaluation order decides ties: the first category reaching the max wins.
pub const CATEGORY_ORDER: [StrategicCategory; 4] = [INVESTMENT, MERGERS, PRODUCT, REGULATION];

const FALLBACK_FIRST_KEYWORD: &str = "core keywords";
const FALLBACK_SECOND_KEYWORD: &str = "market issues";

/// Number of `needles` occurring (as substrings) in `text`; each needle counts once.
fn count_matches(text: &str, needles: &[&str]) -> usize {
    needles
        .iter()
        .filter(|n| text.contains(&n.to_lowercase()))
        .count()
}

/// Pick the highest-scoring category for an already lowercased corpus.
pub fn detect_category(text: &str) -> StrategicCategory {
    let mut best = BUSINESS;
    let mut best_score = 0;
    for cat in CATEGORY_ORDER {
        let score = count_matches(text, cat.needles);
        if score > best_score {
            best_score = score;
            best = cat;
        }
    }
    best
}

/// Lowercased corpus: co-mention tags, then one text per article
/// (summary, else translated title, else title).
pub fn insight_corpus(mentions: &[MentionRow], articles: &[ArticleRecord]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for m in mentions {
        if !m.tag.trim().is_empty() {
            parts.push(&m.tag);
        }
    }
    parts.extend(articles.iter().filter_map(|a| a.insight_text()));
    parts.join(" ").to_lowercase()
}

/// Up to two distinct co-mention tags, most frequent first.
pub fn top_mention_keywords(mentions: &[MentionRow]) -> Vec<String> {
    let mut sorted: Vec<&MentionRow> = mentions.iter().filter(|m| !m.tag.trim().is_empty()).collect();
    sorted.sort_by(|a, b| b.count.cmp(&a.count));
    let mut out: Vec<String> = Vec::new();
    for m in sorted {
        if !out.contains(&m.tag) {
            out.push(m.tag.clone());
        }
        if out.len() == 2 {
            break;
        }
    }
    out
}

/// Inputs for one keyword's insight.
#[derive(Debug, Clone, Copy)]
pub struct InsightInput<'a> {
    pub keyword: &'a str,
    /// Articles in the current window.
    pub total: usize,
    /// Current minus previous-window count.
    pub delta: i64,
    pub period_days: i64,
    pub mentions: &'a [MentionRow],
    pub articles: &'a [ArticleRecord],
}

pub fn build_insight(input: InsightInput<'_>) -> String {
    let kw = input.keyword;
    if input.total == 0 {
        return format!(
            "No related articles were collected for {kw} over the last {} days, so there is not enough data to judge its strategic direction.",
            input.period_days
        );
    }

    let corpus = insight_corpus(input.mentions, input.articles);
    let category = detect_category(&corpus);
    let top = top_mention_keywords(input.mentions);
    let k1 = top.first().map(String::as_str).unwrap_or(FALLBACK_FIRST_KEYWORD);
    let k2 = top.get(1).map(String::as_str).unwrap_or(FALLBACK_SECOND_KEYWORD);

    let mut s = format!(
        "Recent coverage of {kw} centers on {label} moves. \
         Mentions of {k1} and {k2} recur, pointing to {strategy}. \
         Beyond short-term issue response, this can be read as {direction}. \
         For our company, {impact} is a possibility to keep in mind, and {competition} needs monitoring.",
        label = category.label,
        strategy = category.strategy_estimate,
        direction = category.mid_long_direction,
        impact = category.our_impact,
        competition = category.competition_impact,
    );

    if input.delta > 0 {
        s.push_str(" Related coverage has been increasing recently.");
    } else if input.delta < 0 {
        s.push_str(" Related coverage has been easing recently.");
    }
    s
}
