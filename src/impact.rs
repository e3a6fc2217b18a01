//! Impact score: absolute coverage intensity of a keyword.
//!
//! `score = Σ (1 + min(1, importance / 100)) × source_weight`, rounded to one
//! decimal. Not normalized against corpus size.

use serde::{Deserialize, Serialize};

use crate::article::ArticleRecord;
use crate::pins::round1;
use crate::source_weights::SourceWeights;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImpactRow {
    pub keyword: String,
    pub score: f64,
    pub article_count: usize,
}

/// Contribution of a single article before rounding.
pub fn article_weight(article: &ArticleRecord, weights: &SourceWeights) -> f64 {
    let importance = article
        .importance
        .map(|i| (f64::from(i) / 100.0).min(1.0))
        .unwrap_or(0.0);
    (1.0 + importance) * weights.weight_for(article.source.as_deref())
}

pub fn impact_score(articles: &[ArticleRecord], weights: &SourceWeights) -> f64 {
    round1(articles.iter().map(|a| article_weight(a, weights)).sum())
}

pub fn impact_row(keyword: &str, articles: &[ArticleRecord], weights: &SourceWeights) -> ImpactRow {
    ImpactRow {
        keyword: keyword.to_string(),
        score: impact_score(articles, weights),
        article_count: articles.len(),
    }
}
