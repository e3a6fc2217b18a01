// tests/report_scenarios.rs
//! End-to-end report builds against the in-memory store.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use pharma_competitor_report::{
    ArticleRecord, ArticleStore, DateRange, MemoryStore, ReportConfig, ReportEngine, TagRow,
};
use serde_json::json;
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn engine(store: MemoryStore) -> ReportEngine {
    ReportEngine::new(Arc::new(store), ReportConfig::default()).expect("default engine")
}

fn vaksin_store() -> MemoryStore {
    MemoryStore::from_json_str(
        &json!([
            {
                "id": 1,
                "title": "Vaksin baru disetujui BPOM",
                "source": "Kompas",
                "publishedDate": "2024-01-10",
                "importance": 80,
                "tags": ["Vaksin", "BPOM"]
            },
            {
                "id": 2,
                "title": "Distribusi vaksin meluas",
                "publishedDate": "2024-01-11",
                "tags": "[\"vaksin\"]"
            },
            {
                "id": 3,
                "title": "Harga saham bank naik",
                "publishedDate": "2024-01-11",
                "importance": 99,
                "tags": ["bank"],
                "pharmaRelated": false
            }
        ])
        .to_string(),
    )
    .expect("fixture parses")
}

#[tokio::test]
async fn vaksin_scenario_ranks_and_impact() {
    let engine = engine(vaksin_store());
    let report = engine
        .build_competitor_report_at(
            d(2024, 2, 1),
            Some(d(2024, 1, 10)),
            Some(d(2024, 1, 11)),
            &["vaksin".to_string()],
            10,
        )
        .await
        .unwrap();

    // BPOM is a stopword, so only one ranked keyword counted once per article
    assert_eq!(report.keyword_ranks.len(), 1);
    assert_eq!(report.keyword_ranks[0].keyword, "Vaksin");
    assert_eq!(report.keyword_ranks[0].count, 2);
    assert_eq!(report.auto_competitors, vec!["Vaksin"]);

    assert_eq!(report.impacts.len(), 1);
    assert_eq!(report.impacts[0].score, 3.2);
    assert_eq!(report.impacts[0].article_count, 2);

    let total = &report.totals[0];
    assert_eq!(total.count, 2);
    assert_eq!(total.previous_count, 0);
    assert_eq!(total.delta, 2);
    assert_eq!(total.change_rate, None);

    let sources: Vec<_> = report
        .sources
        .iter()
        .map(|s| (s.source.as_str(), s.count))
        .collect();
    assert_eq!(sources, vec![("Kompas", 1), ("Unknown", 1)]);

    // dissimilar titles stay apart
    assert_eq!(report.clusters.len(), 2);
    assert_eq!(report.clusters[0].title, "Vaksin baru disetujui BPOM");
    assert_eq!(report.clusters[0].cluster_id, 1);

    assert!(report.pins.is_empty());
    assert!(report.insights[0].summary.contains("vaksin"));
    assert!(report.insights[0].summary.ends_with("increasing recently."));

    let trend = &report.keyword_trends[0];
    let counts: Vec<_> = trend.points.iter().map(|p| p.count).collect();
    assert_eq!(counts, vec![1, 1]);
}

#[tokio::test]
async fn top_limit_bounds_article_rows() {
    let engine = engine(vaksin_store());
    let report = engine
        .build_competitor_report_at(d(2024, 2, 1), None, None, &["vaksin".to_string()], 1)
        .await
        .unwrap();
    assert_eq!(report.start, d(2024, 1, 10));
    assert_eq!(report.end, d(2024, 1, 11));
    assert_eq!(report.top_articles.len(), 1);
    assert_eq!(report.top_articles[0].article_id, 1);
    assert_eq!(report.top_articles[0].keyword, "vaksin");
}

#[tokio::test]
async fn blank_keywords_leave_per_keyword_sections_empty() {
    let engine = engine(vaksin_store());
    let report = engine
        .build_competitor_report_at(
            d(2024, 2, 1),
            Some(d(2024, 1, 1)),
            Some(d(2024, 1, 11)),
            &["  ".to_string(), String::new()],
            10,
        )
        .await
        .unwrap();

    assert!(report.keywords.is_empty());
    assert!(report.totals.is_empty());
    assert!(report.daily.is_empty());
    assert!(report.clusters.is_empty());
    assert!(report.impacts.is_empty());
    assert!(report.insights.is_empty());
    assert!(report.pins.is_empty());

    assert!(!report.keyword_ranks.is_empty());
    assert!(!report.weekly_issues.is_empty());
    assert_eq!(report.keyword_trends[0].points.len(), 11);
    assert_eq!(report.range_issue_titles.len(), 2);
    assert_eq!(report.range_issue_titles[0].title, "Vaksin baru disetujui BPOM");
}

#[tokio::test]
async fn empty_store_defaults_to_last_thirty_days() {
    let engine = engine(MemoryStore::new(Vec::new()));
    let today = d(2024, 3, 31);
    let report = engine
        .build_competitor_report_at(today, None, None, &["Kalbe".to_string()], 10)
        .await
        .unwrap();

    assert_eq!(report.start, d(2024, 3, 1));
    assert_eq!(report.end, today);
    assert!(report.keyword_ranks.is_empty());
    assert!(report.keyword_trends.is_empty());
    assert_eq!(report.totals[0].count, 0);
    assert_eq!(report.impacts[0].score, 0.0);
    assert!(report.insights[0].summary.contains("not enough data"));
    assert!(report.insights[0].summary.contains("31 days"));
}

#[tokio::test]
async fn daily_spike_is_pinned() {
    let start = d(2024, 5, 1);
    let mut articles = Vec::new();
    let mut id = 0;
    for (day, n) in [1, 1, 1, 1, 1, 1, 10].into_iter().enumerate() {
        for _ in 0..n {
            id += 1;
            articles.push(json!({
                "id": id,
                "title": format!("Kalbe Farma update {id}"),
                "publishedDate": (start + chrono::Duration::days(day as i64)).to_string(),
                "tags": ["Kalbe Farma"]
            }));
        }
    }
    let store = MemoryStore::from_json_str(&serde_json::Value::Array(articles).to_string()).unwrap();
    let report = engine(store)
        .build_competitor_report_at(
            d(2024, 6, 1),
            Some(start),
            Some(d(2024, 5, 7)),
            &["kalbe".to_string()],
            10,
        )
        .await
        .unwrap();

    assert_eq!(report.daily.len(), 7);
    assert_eq!(report.pins.len(), 1);
    let pin = &report.pins[0];
    assert_eq!(pin.keyword, "kalbe");
    assert_eq!(pin.date, d(2024, 5, 7));
    assert_eq!(pin.count, 10);
    assert_eq!(pin.baseline, 1.0);
    assert_eq!(pin.ratio, 10.0);

    // near-identical titles collapse into one story
    assert_eq!(report.clusters.len(), 1);
    assert_eq!(report.clusters[0].count, 16);
    assert_eq!(report.clusters[0].top_titles.len(), 3);
    assert_eq!(report.clusters[0].sample_articles.len(), 5);
}

#[tokio::test]
async fn report_serializes_camel_case() {
    let report = engine(vaksin_store())
        .build_competitor_report_at(d(2024, 2, 1), None, None, &["vaksin".to_string()], 10)
        .await
        .unwrap();
    let v = serde_json::to_value(&report).unwrap();
    for key in [
        "topArticles",
        "mentionedKeywords",
        "keywordRanks",
        "autoCompetitors",
        "weeklyIssueTitles",
        "keywordTrends",
    ] {
        assert!(v.get(key).is_some(), "missing {key}");
    }
    assert!(v["totals"][0]["changeRate"].is_null());
    assert_eq!(v["clusters"][0]["clusterId"], 1);
}

/// Store whose keyword lookups always fail.
struct BrokenStore;

#[async_trait]
impl ArticleStore for BrokenStore {
    async fn count_articles(&self, _keyword: &str, _range: DateRange) -> Result<usize> {
        Err(anyhow!("connection reset"))
    }
    async fn daily_counts(&self, _: &str, _: DateRange) -> Result<Vec<(NaiveDate, usize)>> {
        Ok(Vec::new())
    }
    async fn source_breakdown(&self, _: &str, _: DateRange) -> Result<Vec<(String, usize)>> {
        Ok(Vec::new())
    }
    async fn top_articles(&self, _: Option<&str>, _: DateRange, _: usize) -> Result<Vec<ArticleRecord>> {
        Ok(Vec::new())
    }
    async fn tags_in_range(&self, _: DateRange, _: Option<&str>) -> Result<Vec<TagRow>> {
        Ok(Vec::new())
    }
    async fn date_bounds(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        Ok(None)
    }
    fn name(&self) -> &'static str {
        "BrokenStore"
    }
}

#[tokio::test]
async fn store_errors_abort_the_build() {
    let engine = ReportEngine::new(Arc::new(BrokenStore), ReportConfig::default()).unwrap();
    let ok = engine
        .build_competitor_report_at(d(2024, 1, 31), None, None, &[], 10)
        .await;
    assert!(ok.is_ok(), "no keyword lookups without keywords");

    let err = engine
        .build_competitor_report_at(d(2024, 1, 31), None, None, &["Sanbe".to_string()], 10)
        .await
        .unwrap_err();
    let msg = format!("{err:#}");
    assert!(msg.contains("Sanbe"));
    assert!(msg.contains("connection reset"));
}

#[tokio::test]
async fn windows_past_the_calendar_start_return_an_error() {
    let early = NaiveDate::MIN + chrono::Days::new(3);
    let engine = engine(MemoryStore::new(Vec::new()));
    let err = engine
        .build_competitor_report_at(early, Some(NaiveDate::MIN), Some(early), &["kalbe".to_string()], 10)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("out of range"));

    let err = engine
        .build_competitor_report_at(NaiveDate::MIN, None, None, &[], 10)
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("report range"));
}
