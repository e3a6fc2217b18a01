// src/config.rs
//! Report engine configuration (TOML).
//!
//! Resolution order for the file:
//! 1) explicit path (CLI `--config`)
//! 2) $REPORT_CONFIG_PATH
//! 3) config/report.toml, if present
//! 4) built-in defaults
//!
//! `$REPORT_CLUSTER_THRESHOLD` overrides the clustering threshold afterwards.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cluster::DEFAULT_CLUSTER_THRESHOLD;
use crate::keywords::KeywordVocabulary;
use crate::pins::{PinParams, PIN_MIN_COUNT, PIN_MULTIPLIER};
use crate::rolling::DEFAULT_LOOKBACK_DAYS;
use crate::source_weights::SourceWeights;

pub const DEFAULT_REPORT_CONFIG_PATH: &str = "config/report.toml";
pub const ENV_REPORT_CONFIG_PATH: &str = "REPORT_CONFIG_PATH";
pub const ENV_CLUSTER_THRESHOLD: &str = "REPORT_CLUSTER_THRESHOLD";
/// Upper bound for the weekly/monthly issue windows (ten years).
pub const MAX_ISSUE_WINDOW_DAYS: i64 = 3660;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Articles pulled per keyword for clustering and impact.
    pub cluster_limit: usize,
    pub cluster_threshold: f64,
    pub pin_min_count: usize,
    pub pin_multiplier: f64,
    pub pin_lookback_days: usize,
    pub keyword_rank_limit: usize,
    pub auto_competitor_limit: usize,
    pub weekly_issue_days: i64,
    pub monthly_issue_days: i64,
    pub trend_keyword_limit: usize,
    pub issue_title_limit: usize,
    pub issue_title_fetch_multiplier: usize,
    pub mention_limit: usize,
    /// Optional allowlist/stopword file (TOML or JSON).
    pub vocabulary_path: Option<PathBuf>,
    /// Optional outlet weight file (JSON).
    pub source_weights_path: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            cluster_limit: 50,
            cluster_threshold: DEFAULT_CLUSTER_THRESHOLD,
            pin_min_count: PIN_MIN_COUNT,
            pin_multiplier: PIN_MULTIPLIER,
            pin_lookback_days: DEFAULT_LOOKBACK_DAYS,
            keyword_rank_limit: 20,
            auto_competitor_limit: 6,
            weekly_issue_days: 7,
            monthly_issue_days: 30,
            trend_keyword_limit: 6,
            issue_title_limit: 8,
            issue_title_fetch_multiplier: 3,
            mention_limit: 10,
            vocabulary_path: None,
            source_weights_path: None,
        }
    }
}

// parse optional float env and clamp to <0.0..=1.0>
fn parse_threshold_env(raw: Option<String>) -> Option<f64> {
    raw.and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
}

impl ReportConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: ReportConfig = toml::from_str(s).context("parsing report config TOML")?;
        Ok(cfg.sanitized())
    }

    /// Resolve and load the config (see module docs), then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(ENV_REPORT_CONFIG_PATH).ok().map(PathBuf::from))
            .or_else(|| {
                let p = PathBuf::from(DEFAULT_REPORT_CONFIG_PATH);
                p.exists().then_some(p)
            });

        let mut cfg = match path {
            Some(p) => {
                let content = fs::read_to_string(&p)
                    .with_context(|| format!("Failed to read report config at {}", p.display()))?;
                Self::from_toml_str(&content)?
            }
            None => Self::default(),
        };

        if let Some(t) = parse_threshold_env(std::env::var(ENV_CLUSTER_THRESHOLD).ok()) {
            cfg.cluster_threshold = t;
        }
        Ok(cfg)
    }

    fn sanitized(mut self) -> Self {
        if !self.cluster_threshold.is_finite() {
            self.cluster_threshold = DEFAULT_CLUSTER_THRESHOLD;
        }
        self.cluster_threshold = self.cluster_threshold.clamp(0.0, 1.0);
        if self.pin_lookback_days == 0 {
            self.pin_lookback_days = 1;
        }
        if !self.pin_multiplier.is_finite() || self.pin_multiplier <= 0.0 {
            self.pin_multiplier = PIN_MULTIPLIER;
        }
        self.weekly_issue_days = self.weekly_issue_days.clamp(1, MAX_ISSUE_WINDOW_DAYS);
        self.monthly_issue_days = self.monthly_issue_days.clamp(1, MAX_ISSUE_WINDOW_DAYS);
        self.issue_title_limit = self.issue_title_limit.max(1);
        self.issue_title_fetch_multiplier = self.issue_title_fetch_multiplier.max(1);
        self
    }

    pub fn pin_params(&self) -> PinParams {
        PinParams {
            min_count: self.pin_min_count,
            multiplier: self.pin_multiplier,
            lookback: self.pin_lookback_days,
        }
    }

    /// Vocabulary from `vocabulary_path`, or the built-in seed.
    pub fn vocabulary(&self) -> Result<KeywordVocabulary> {
        match &self.vocabulary_path {
            Some(p) => KeywordVocabulary::load_from_file(p),
            None => Ok(KeywordVocabulary::default_seed()),
        }
    }

    /// Outlet weights from `source_weights_path`, or the built-in seed.
    pub fn source_weights(&self) -> Result<SourceWeights> {
        match &self.source_weights_path {
            Some(p) => SourceWeights::load_from_file(p),
            None => Ok(SourceWeights::default_seed()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = ReportConfig::from_toml_str("cluster_limit = 10\npin_multiplier = 3.0\n").unwrap();
        assert_eq!(cfg.cluster_limit, 10);
        assert_eq!(cfg.pin_multiplier, 3.0);
        assert_eq!(cfg.keyword_rank_limit, 20);
        assert_eq!(cfg.cluster_threshold, 0.25);
    }

    #[test]
    fn out_of_range_values_are_sanitized() {
        let cfg = ReportConfig::from_toml_str(
            "cluster_threshold = 4.0\npin_lookback_days = 0\npin_multiplier = -1.0\n",
        )
        .unwrap();
        assert_eq!(cfg.cluster_threshold, 1.0);
        assert_eq!(cfg.pin_lookback_days, 1);
        assert_eq!(cfg.pin_multiplier, 2.0);
    }

    #[test]
    fn issue_windows_and_title_limit_are_bounded() {
        let cfg = ReportConfig::from_toml_str(
            "weekly_issue_days = 9223372036854775807\nmonthly_issue_days = -5\nissue_title_limit = 0\n",
        )
        .unwrap();
        assert_eq!(cfg.weekly_issue_days, MAX_ISSUE_WINDOW_DAYS);
        assert_eq!(cfg.monthly_issue_days, 1);
        assert_eq!(cfg.issue_title_limit, 1);
    }

    #[test]
    fn threshold_env_parse() {
        assert_eq!(parse_threshold_env(Some(" 0.4 ".into())), Some(0.4));
        assert_eq!(parse_threshold_env(Some("7".into())), Some(1.0));
        assert_eq!(parse_threshold_env(Some("nope".into())), None);
        assert_eq!(parse_threshold_env(None), None);
    }

    #[serial_test::serial]
    #[test]
    fn load_uses_env_path_and_threshold_override() {
        let tmp = tempfile::tempdir().unwrap();
        let p = tmp.path().join("report.toml");
        fs::write(&p, "trend_keyword_limit = 2\n").unwrap();

        env::set_var(ENV_REPORT_CONFIG_PATH, p.display().to_string());
        env::set_var(ENV_CLUSTER_THRESHOLD, "0.5");
        let cfg = ReportConfig::load(None).unwrap();
        env::remove_var(ENV_REPORT_CONFIG_PATH);
        env::remove_var(ENV_CLUSTER_THRESHOLD);

        assert_eq!(cfg.trend_keyword_limit, 2);
        assert_eq!(cfg.cluster_threshold, 0.5);
    }

    #[serial_test::serial]
    #[test]
    fn explicit_missing_path_is_an_error() {
        env::remove_var(ENV_REPORT_CONFIG_PATH);
        let err = ReportConfig::load(Some(Path::new("/no/such/report.toml"))).unwrap_err();
        assert!(format!("{err:#}").contains("/no/such/report.toml"));
    }
}
