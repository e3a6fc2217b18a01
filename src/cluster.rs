//! # Story clustering
//! Greedy single-pass clustering of a keyword's article pool.
//!
//! Each article joins the most similar existing cluster (Jaccard over token
//! sets) if the score reaches the threshold, otherwise it seeds a new one.
//! The result depends on input order; callers feed articles in retrieval
//! order (importance, date, id, all descending) so output is reproducible.
//! A cluster's title is its first member's title and never changes.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::article::{ArticleRecord, ArticleRef};
use crate::similarity::{jaccard, tokenize, TokenSet};

pub const DEFAULT_CLUSTER_THRESHOLD: f64 = 0.25;
pub const TOP_TITLES_PER_CLUSTER: usize = 3;
pub const SAMPLES_PER_CLUSTER: usize = 5;

/// A group of articles judged to cover the same story.
#[derive(Debug, Clone)]
pub struct Cluster<'a> {
    pub title: String,
    pub tokens: TokenSet,
    pub members: Vec<&'a ArticleRecord>,
}

impl<'a> Cluster<'a> {
    fn seed(article: &'a ArticleRecord, tokens: TokenSet) -> Self {
        Self {
            title: article.display_title().to_string(),
            tokens,
            members: vec![article],
        }
    }

    /// Up to `limit` distinct, non-blank member titles in member order.
    pub fn top_titles(&self, limit: usize) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        for m in &self.members {
            let t = m.display_title();
            if t.trim().is_empty() || out.iter().any(|o| o == t) {
                continue;
            }
            out.push(t.to_string());
            if out.len() >= limit {
                break;
            }
        }
        out
    }

    /// Up to `limit` members by importance desc (missing = 0), ties in member order.
    pub fn samples(&self, limit: usize) -> Vec<ArticleRef> {
        let mut sorted = self.members.clone();
        sorted.sort_by_key(|a| std::cmp::Reverse(a.importance_safe()));
        sorted.into_iter().take(limit).map(|a| a.to_ref()).collect()
    }
}

/// Output row for one cluster of one keyword.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRow {
    pub keyword: String,
    /// 1-based rank by size.
    pub cluster_id: usize,
    pub title: String,
    pub count: usize,
    pub top_titles: Vec<String>,
    pub sample_articles: Vec<ArticleRef>,
}

/// Cluster `articles` (in the given order) and return clusters largest first.
pub fn cluster_by_similarity(articles: &[ArticleRecord], threshold: f64) -> Vec<Cluster<'_>> {
    let mut clusters: Vec<Cluster<'_>> = Vec::new();

    for article in articles {
        let tokens = tokenize(&article.title_for_similarity());

        let mut best: Option<usize> = None;
        let mut best_score = 0.0;
        for (i, c) in clusters.iter().enumerate() {
            let sim = jaccard(&tokens, &c.tokens);
            if sim > best_score {
                best_score = sim;
                best = Some(i);
            }
        }

        match best {
            Some(i) if best_score >= threshold => {
                let c = &mut clusters[i];
                c.members.push(article);
                c.tokens.extend(tokens);
            }
            _ => clusters.push(Cluster::seed(article, tokens)),
        }
    }

    // stable: equal sizes keep creation order
    clusters.sort_by(|a, b| b.members.len().cmp(&a.members.len()));

    debug!(
        target: "cluster",
        articles = articles.len(),
        clusters = clusters.len(),
        threshold,
        "clustering done"
    );
    clusters
}

/// Flatten clusters into report rows for `keyword`.
pub fn cluster_rows(keyword: &str, clusters: &[Cluster<'_>]) -> Vec<ClusterRow> {
    clusters
        .iter()
        .enumerate()
        .map(|(i, c)| ClusterRow {
            keyword: keyword.to_string(),
            cluster_id: i + 1,
            title: c.title.clone(),
            count: c.members.len(),
            top_titles: c.top_titles(TOP_TITLES_PER_CLUSTER),
            sample_articles: c.samples(SAMPLES_PER_CLUSTER),
        })
        .collect()
}
