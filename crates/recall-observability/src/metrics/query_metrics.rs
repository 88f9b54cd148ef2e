//! Query throughput, cache effectiveness, failures, and latency.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

#[derive(Debug, Default)]
pub struct QueryMetrics {
    queries: AtomicU64,
    cache_hits: AtomicU64,
    failures: AtomicU64,
    total_latency_ms: AtomicU64,
    max_latency_ms: AtomicU64,
    failures_by_code: Mutex<BTreeMap<String, u64>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryMetricsSnapshot {
    pub queries: u64,
    pub cache_hits: u64,
    pub failures: u64,
    /// cache_hits / successful queries.
    pub cache_hit_rate: f64,
    pub avg_latency_ms: f64,
    pub max_latency_ms: u64,
    pub failures_by_code: BTreeMap<String, u64>,
}

impl QueryMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_success(&self, cache_hit: bool, latency_ms: u64) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        if cache_hit {
            self.cache_hits.fetch_add(1, Ordering::Relaxed);
        }
        self.total_latency_ms.fetch_add(latency_ms, Ordering::Relaxed);
        self.max_latency_ms.fetch_max(latency_ms, Ordering::Relaxed);
    }

    pub fn record_failure(&self, code: &str) {
        self.queries.fetch_add(1, Ordering::Relaxed);
        self.failures.fetch_add(1, Ordering::Relaxed);
        let mut by_code = self
            .failures_by_code
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *by_code.entry(code.to_string()).or_default() += 1;
    }

    pub fn snapshot(&self) -> QueryMetricsSnapshot {
        let queries = self.queries.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let succeeded = queries.saturating_sub(failures);
        let ratio = |n: u64, d: u64| if d == 0 { 0.0 } else { n as f64 / d as f64 };
        QueryMetricsSnapshot {
            queries,
            cache_hits,
            failures,
            cache_hit_rate: ratio(cache_hits, succeeded),
            avg_latency_ms: ratio(self.total_latency_ms.load(Ordering::Relaxed), succeeded),
            max_latency_ms: self.max_latency_ms.load(Ordering::Relaxed),
            failures_by_code: self
                .failures_by_code
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone(),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.queries,
            &self.cache_hits,
            &self.failures,
            &self.total_latency_ms,
            &self.max_latency_ms,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.failures_by_code
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
