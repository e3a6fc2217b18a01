//! # Rolling Window
//! Trailing window over the last N daily counts (default 7).
//!
//! Keeps a queue plus a running sum so the mean is O(1). The mean is read
//! *before* today's value is pushed, which makes every baseline causal:
//! it only ever depends on earlier days.

use std::collections::VecDeque;

pub const DEFAULT_LOOKBACK_DAYS: usize = 7;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    buf: VecDeque<usize>,
    sum: usize,
    capacity: usize,
}

impl RollingWindow {
    /// Create a window holding at most `capacity` values (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            buf: VecDeque::with_capacity(capacity + 1),
            sum: 0,
            capacity,
        }
    }

    /// Convenience constructor for the 7-day lookback.
    pub fn new_7d() -> Self {
        Self::with_capacity(DEFAULT_LOOKBACK_DAYS)
    }

    /// Mean of the values currently held; 0.0 when empty.
    pub fn mean(&self) -> f64 {
        if self.buf.is_empty() {
            0.0
        } else {
            self.sum as f64 / self.buf.len() as f64
        }
    }

    /// Push a value, evicting the oldest one once over capacity.
    pub fn push(&mut self, value: usize) {
        self.buf.push_back(value);
        self.sum += value;
        if self.buf.len() > self.capacity {
            if let Some(old) = self.buf.pop_front() {
                self.sum -= old;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
