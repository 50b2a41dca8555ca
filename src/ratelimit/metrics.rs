//! Counter events emitted when a rule throttles a request
use std::sync::{Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;

/// Metric name prefix for throttle events
pub const THROTTLED_PREFIX: &str = "throttled.";

/// Receiver of named counter increments (statsd-style)
pub trait MetricsSink: Send + Sync {
    fn incr(&self, metric: &str);
}

/// Writes counter events to the log
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMetrics;

impl MetricsSink for LogMetrics {
    fn incr(&self, metric: &str) {
        log::info!("metric incr: {}", metric);
    }
}

/// Discards counter events
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl MetricsSink for NoopMetrics {
    fn incr(&self, _metric: &str) {}
}

/// Keeps counts in memory; handy for tests and local inspection
#[derive(Debug, Default)]
pub struct MemoryMetrics {
    counts: Mutex<FxHashMap<String, u64>>,
}

impl MemoryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, metric: &str) -> u64 {
        self.counts().get(metric).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts().values().sum()
    }

    // A panicking writer leaves the map consistent, so poisoning is ignored.
    fn counts(&self) -> MutexGuard<'_, FxHashMap<String, u64>> {
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MetricsSink for MemoryMetrics {
    fn incr(&self, metric: &str) {
        *self.counts().entry(metric.to_string()).or_insert(0) += 1;
    }
}

/// `throttled.<rule>`
pub fn throttled_metric(rule: &str) -> String {
    format!("{}{}", THROTTLED_PREFIX, rule)
}
