//! Competitor report CLI.
//! Loads an article pool from JSON, builds one report and prints it to stdout.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pharma_competitor_report::report::DEFAULT_TOP_LIMIT;
use pharma_competitor_report::{parse_keyword_list, MemoryStore, ReportConfig, ReportEngine};

#[derive(Debug, Parser)]
#[command(name = "pharma-report", version, about = "Build a competitor report from an article pool")]
struct Cli {
    /// JSON array of article records.
    #[arg(long)]
    articles: PathBuf,

    /// First day of the range (YYYY-MM-DD); defaults to the earliest article.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the range (YYYY-MM-DD); defaults to the latest article.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Comma-separated keywords, e.g. `Kalbe,Sanbe`.
    #[arg(long, default_value = "")]
    keywords: String,

    #[arg(long, default_value_t = DEFAULT_TOP_LIMIT)]
    top_limit: usize,

    /// Report config TOML (falls back to $REPORT_CONFIG_PATH, then config/report.toml).
    #[arg(long, env = "REPORT_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[arg(long)]
    pretty: bool,
}

/// Logs go to stderr so stdout stays valid JSON.
/// Filter: RUST_LOG, else `report=info,warn`. JSON lines when REPORT_LOG_JSON=1.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("report=info,warn"));
    let json = std::env::var("REPORT_LOG_JSON").ok().is_some_and(|v| v == "1");

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    let config = ReportConfig::load(cli.config.as_deref())?;
    let store = MemoryStore::from_json_file(&cli.articles)?;
    tracing::info!(target: "report", articles = store.len(), "article pool loaded");

    let engine = ReportEngine::new(Arc::new(store), config)?;
    let keywords = parse_keyword_list(&cli.keywords);
    let report = engine
        .build_competitor_report(cli.start, cli.end, &keywords, cli.top_limit)
        .await?;

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serializing report")?;
    println!("{out}");
    Ok(())
}
