// src/report.rs
//! # Competitor report engine
//!
//! Orchestrates ranking, clustering, pin detection, impact scoring and insight
//! synthesis into one [`CompetitorReport`].
//!
//! Range-independent sections (keyword ranks, weekly/monthly issues, issue
//! titles, trends) are always filled. Per-keyword sections are filled only for
//! trimmed, non-blank keywords. Any store error aborts the whole build.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::article::ArticleRecord;
use crate::cluster::{cluster_by_similarity, cluster_rows, ClusterRow};
use crate::config::ReportConfig;
use crate::impact::{impact_row, ImpactRow};
use crate::insight::{build_insight, InsightInput, InsightRow};
use crate::issues::{build_issue_titles, IssueTitleRow};
use crate::keywords::KeywordVocabulary;
use crate::pins::{build_pins, DailyRow, PinRow};
use crate::ranking::{build_trends, co_mentions, rank_keywords, KeywordRankRow, KeywordTrendRow, MentionRow};
use crate::source_weights::SourceWeights;
use crate::store::{shift_back, ArticleStore, DateRange};

/// Window used when the store has no dated articles at all.
pub const FALLBACK_RANGE_DAYS: i64 = 30;
pub const DEFAULT_TOP_LIMIT: usize = 10;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("report_builds_total", "Competitor reports built.");
        describe_counter!("report_keywords_total", "Keywords processed across reports.");
        describe_counter!("report_clusters_total", "Story clusters emitted.");
        describe_counter!("report_pins_total", "Coverage spikes (pins) emitted.");
        describe_histogram!("report_build_ms", "Report build time in milliseconds.");
    });
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TotalRow {
    pub keyword: String,
    pub count: usize,
    pub previous_count: usize,
    pub delta: i64,
    /// `delta / previous_count`; null when the previous window is empty.
    pub change_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SourceRow {
    pub keyword: String,
    pub source: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleRow {
    pub keyword: String,
    pub article_id: i64,
    pub title: String,
    pub kor_title: Option<String>,
    pub kor_summary: Option<String>,
    pub id_summary: Option<String>,
    pub link: Option<String>,
    pub source: Option<String>,
    pub img: Option<String>,
    pub date: Option<NaiveDate>,
    pub importance: Option<i32>,
}

impl ArticleRow {
    pub fn from_article(keyword: &str, a: &ArticleRecord) -> Self {
        Self {
            keyword: keyword.to_string(),
            article_id: a.id,
            title: a.title.clone(),
            kor_title: a.kor_title.clone(),
            kor_summary: a.kor_summary.clone(),
            id_summary: a.id_summary.clone(),
            link: a.link.clone(),
            source: a.source.clone(),
            img: a.img.clone(),
            date: a.published_date,
            importance: a.importance,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorReport {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub keywords: Vec<String>,
    pub totals: Vec<TotalRow>,
    pub daily: Vec<DailyRow>,
    pub sources: Vec<SourceRow>,
    pub top_articles: Vec<ArticleRow>,
    pub clusters: Vec<ClusterRow>,
    pub insights: Vec<InsightRow>,
    pub pins: Vec<PinRow>,
    pub impacts: Vec<ImpactRow>,
    pub mentioned_keywords: Vec<MentionRow>,
    pub keyword_ranks: Vec<KeywordRankRow>,
    pub auto_competitors: Vec<String>,
    pub weekly_issues: Vec<KeywordRankRow>,
    pub monthly_issues: Vec<KeywordRankRow>,
    pub weekly_issue_titles: Vec<IssueTitleRow>,
    pub monthly_issue_titles: Vec<IssueTitleRow>,
    pub range_issue_titles: Vec<IssueTitleRow>,
    pub keyword_trends: Vec<KeywordTrendRow>,
}

impl CompetitorReport {
    fn empty(range: DateRange) -> Self {
        Self {
            start: range.start,
            end: range.end,
            keywords: Vec::new(),
            totals: Vec::new(),
            daily: Vec::new(),
            sources: Vec::new(),
            top_articles: Vec::new(),
            clusters: Vec::new(),
            insights: Vec::new(),
            pins: Vec::new(),
            impacts: Vec::new(),
            mentioned_keywords: Vec::new(),
            keyword_ranks: Vec::new(),
            auto_competitors: Vec::new(),
            weekly_issues: Vec::new(),
            monthly_issues: Vec::new(),
            weekly_issue_titles: Vec::new(),
            monthly_issue_titles: Vec::new(),
            range_issue_titles: Vec::new(),
            keyword_trends: Vec::new(),
        }
    }
}

/// Fill only the missing side(s) of the request from the store's bounds,
/// falling back to the last 30 days ending `today` when the store is empty.
pub fn resolve_range(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    bounds: Option<(NaiveDate, NaiveDate)>,
    today: NaiveDate,
) -> Result<DateRange> {
    if let (Some(start), Some(end)) = (start, end) {
        return Ok(DateRange::new(start, end));
    }
    let (min, max) = match bounds {
        Some(b) => b,
        None => (shift_back(today, FALLBACK_RANGE_DAYS)?, today),
    };
    Ok(DateRange::new(start.unwrap_or(min), end.unwrap_or(max)))
}

/// Split `a, b ,,c` into trimmed, non-blank keywords; duplicates dropped, order kept.
pub fn parse_keyword_list(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for kw in raw.split(',').map(str::trim).filter(|k| !k.is_empty()) {
        if !out.iter().any(|k| k == kw) {
            out.push(kw.to_string());
        }
    }
    out
}

fn change_rate(delta: i64, previous: usize) -> Option<f64> {
    (previous > 0).then(|| delta as f64 / previous as f64)
}

pub struct ReportEngine {
    store: Arc<dyn ArticleStore>,
    config: ReportConfig,
    vocabulary: KeywordVocabulary,
    weights: SourceWeights,
}

impl ReportEngine {
    /// Engine with vocabulary and outlet weights resolved from `config`.
    pub fn new(store: Arc<dyn ArticleStore>, config: ReportConfig) -> Result<Self> {
        let vocabulary = config.vocabulary()?;
        let weights = config.source_weights()?;
        Ok(Self::with_parts(store, config, vocabulary, weights))
    }

    pub fn with_parts(
        store: Arc<dyn ArticleStore>,
        config: ReportConfig,
        vocabulary: KeywordVocabulary,
        weights: SourceWeights,
    ) -> Self {
        ensure_metrics_described();
        Self {
            store,
            config,
            vocabulary,
            weights,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Build a report; a missing range side defaults relative to the local date.
    pub async fn build_competitor_report(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        keywords: &[String],
        top_limit: usize,
    ) -> Result<CompetitorReport> {
        let today = chrono::Local::now().date_naive();
        self.build_competitor_report_at(today, start, end, keywords, top_limit)
            .await
    }

    /// Same as [`Self::build_competitor_report`] with an explicit "today".
    pub async fn build_competitor_report_at(
        &self,
        today: NaiveDate,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        keywords: &[String],
        top_limit: usize,
    ) -> Result<CompetitorReport> {
        let started = Instant::now();

        let bounds = if start.is_none() || end.is_none() {
            self.store
                .date_bounds()
                .await
                .context("resolving date bounds")?
        } else {
            None
        };
        let range = resolve_range(start, end, bounds, today).context("resolving report range")?;

        let mut report = CompetitorReport::empty(range);
        self.fill_overview(&mut report, range).await?;

        let keywords: Vec<String> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .collect();

        for kw in &keywords {
            self.fill_keyword(&mut report, kw, range, top_limit).await?;
        }
        report.keywords = keywords;
        report.pins = build_pins(&report.daily, self.config.pin_params());

        let ms = started.elapsed().as_secs_f64() * 1000.0;
        counter!("report_builds_total").increment(1);
        counter!("report_keywords_total").increment(report.keywords.len() as u64);
        counter!("report_clusters_total").increment(report.clusters.len() as u64);
        counter!("report_pins_total").increment(report.pins.len() as u64);
        histogram!("report_build_ms").record(ms);

        info!(
            target: "report",
            store = self.store.name(),
            start = %range.start,
            end = %range.end,
            keywords = report.keywords.len(),
            clusters = report.clusters.len(),
            pins = report.pins.len(),
            ms,
            "competitor report built"
        );
        Ok(report)
    }

    /// Sections that do not depend on the requested keywords.
    async fn fill_overview(&self, report: &mut CompetitorReport, range: DateRange) -> Result<()> {
        let cfg = &self.config;

        report.keyword_ranks = self.ranks(range).await.context("keyword ranks")?;
        report.auto_competitors = report
            .keyword_ranks
            .iter()
            .take(cfg.auto_competitor_limit)
            .map(|r| r.keyword.clone())
            .collect();

        let weekly = range
            .trailing(cfg.weekly_issue_days)
            .context("weekly window")?;
        let monthly = range
            .trailing(cfg.monthly_issue_days)
            .context("monthly window")?;
        report.weekly_issues = self.ranks(weekly).await.context("weekly issues")?;
        report.monthly_issues = self.ranks(monthly).await.context("monthly issues")?;
        report.weekly_issue_titles = self.issue_titles(weekly).await.context("weekly issue titles")?;
        report.monthly_issue_titles = self
            .issue_titles(monthly)
            .await
            .context("monthly issue titles")?;
        report.range_issue_titles = self.issue_titles(range).await.context("range issue titles")?;

        let trend_keywords: Vec<String> = report
            .keyword_ranks
            .iter()
            .take(cfg.trend_keyword_limit)
            .map(|r| r.keyword.clone())
            .collect();
        if !trend_keywords.is_empty() {
            let rows = self
                .store
                .tags_in_range(range, None)
                .await
                .context("keyword trends")?;
            report.keyword_trends = build_trends(&rows, &trend_keywords, range.start, range.end);
        }
        Ok(())
    }

    async fn ranks(&self, range: DateRange) -> Result<Vec<KeywordRankRow>> {
        let rows = self.store.tags_in_range(range, None).await?;
        Ok(rank_keywords(&rows, &self.vocabulary, self.config.keyword_rank_limit))
    }

    async fn issue_titles(&self, range: DateRange) -> Result<Vec<IssueTitleRow>> {
        let limit = self.config.issue_title_limit;
        let fetch = limit.saturating_mul(self.config.issue_title_fetch_multiplier);
        let articles = self.store.top_articles(None, range, fetch).await?;
        Ok(build_issue_titles(&articles, limit))
    }

    async fn fill_keyword(
        &self,
        report: &mut CompetitorReport,
        kw: &str,
        range: DateRange,
        top_limit: usize,
    ) -> Result<()> {
        let store = &self.store;
        let cfg = &self.config;

        let count = store
            .count_articles(kw, range)
            .await
            .with_context(|| format!("total count for {kw}"))?;
        let previous = range
            .previous()
            .with_context(|| format!("previous window for {kw}"))?;
        let previous_count = store
            .count_articles(kw, previous)
            .await
            .with_context(|| format!("previous count for {kw}"))?;
        let delta = count as i64 - previous_count as i64;
        report.totals.push(TotalRow {
            keyword: kw.to_string(),
            count,
            previous_count,
            delta,
            change_rate: change_rate(delta, previous_count),
        });

        let daily = store
            .daily_counts(kw, range)
            .await
            .with_context(|| format!("daily counts for {kw}"))?;
        report.daily.extend(daily.into_iter().map(|(date, count)| DailyRow {
            keyword: kw.to_string(),
            date,
            count,
        }));

        let sources = store
            .source_breakdown(kw, range)
            .await
            .with_context(|| format!("source breakdown for {kw}"))?;
        report.sources.extend(sources.into_iter().map(|(source, count)| SourceRow {
            keyword: kw.to_string(),
            source,
            count,
        }));

        let top = store
            .top_articles(Some(kw), range, top_limit)
            .await
            .with_context(|| format!("top articles for {kw}"))?;
        report
            .top_articles
            .extend(top.iter().map(|a| ArticleRow::from_article(kw, a)));

        let pool = store
            .top_articles(Some(kw), range, cfg.cluster_limit)
            .await
            .with_context(|| format!("cluster pool for {kw}"))?;
        let clusters = cluster_by_similarity(&pool, cfg.cluster_threshold);
        report.clusters.extend(cluster_rows(kw, &clusters));
        report.impacts.push(impact_row(kw, &pool, &self.weights));

        let tag_rows = store
            .tags_in_range(range, Some(kw))
            .await
            .with_context(|| format!("co-mentions for {kw}"))?;
        let mentions = co_mentions(&tag_rows, &self.vocabulary, kw, cfg.mention_limit);

        let summary = build_insight(InsightInput {
            keyword: kw,
            total: count,
            delta,
            period_days: range.days(),
            mentions: &mentions,
            articles: &pool,
        });
        report.insights.push(InsightRow {
            keyword: kw.to_string(),
            summary,
        });
        report.mentioned_keywords.extend(mentions);

        debug!(
            target: "report",
            keyword = kw,
            count,
            previous_count,
            pool = pool.len(),
            clusters = clusters.len(),
            "keyword processed"
        );
        Ok(())
    }
}
