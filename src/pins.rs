//! # Spike ("pin") detection
//!
//! A day is pinned when its count clearly exceeds the keyword's recent
//! baseline: `baseline > 0 && count >= max(min_count, baseline * multiplier)`,
//! where the baseline is the mean of up to `lookback` earlier entries of the
//! keyword's own daily series (see [`RollingWindow`]).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::rolling::RollingWindow;

pub const PIN_MIN_COUNT: usize = 3;
pub const PIN_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy)]
pub struct PinParams {
    pub min_count: usize,
    pub multiplier: f64,
    pub lookback: usize,
}

impl Default for PinParams {
    fn default() -> Self {
        Self {
            min_count: PIN_MIN_COUNT,
            multiplier: PIN_MULTIPLIER,
            lookback: crate::rolling::DEFAULT_LOOKBACK_DAYS,
        }
    }
}

/// Per-keyword count for one day (sparse: days without matches are absent).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DailyRow {
    pub keyword: String,
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PinRow {
    pub keyword: String,
    pub date: NaiveDate,
    pub count: usize,
    pub baseline: f64,
    pub ratio: f64,
}

/// Round half away from zero to one decimal.
pub fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Detect pins in one keyword's series. `series` need not be sorted.
pub fn detect_pins(keyword: &str, series: &[(NaiveDate, usize)], params: PinParams) -> Vec<PinRow> {
    let mut sorted = series.to_vec();
    sorted.sort_by_key(|(d, _)| *d);

    let mut window = RollingWindow::with_capacity(params.lookback);
    let mut pins = Vec::new();
    for (date, count) in sorted {
        let baseline = window.mean();
        let floor = (params.min_count as f64).max(baseline * params.multiplier);
        if baseline > 0.0 && count as f64 >= floor {
            pins.push(PinRow {
                keyword: keyword.to_string(),
                date,
                count,
                baseline: round1(baseline),
                ratio: round1(count as f64 / baseline),
            });
        }
        window.push(count);
    }
    pins
}

/// Detect pins across all keywords in `daily`, keywords in first-seen order.
pub fn build_pins(daily: &[DailyRow], params: PinParams) -> Vec<PinRow> {
    let mut order: Vec<&str> = Vec::new();
    for row in daily {
        if !order.contains(&row.keyword.as_str()) {
            order.push(&row.keyword);
        }
    }
    order
        .into_iter()
        .flat_map(|kw| {
            let series: Vec<(NaiveDate, usize)> = daily
                .iter()
                .filter(|r| r.keyword == kw)
                .map(|r| (r.date, r.count))
                .collect();
            detect_pins(kw, &series, params)
        })
        .collect()
}
