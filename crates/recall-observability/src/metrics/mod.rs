//! Central metrics registry.
//!
//! [`MetricsCollector`] owns the cache and query collectors and produces a
//! serializable [`MetricsSnapshot`].

pub mod cache_metrics;
pub mod query_metrics;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use recall_core::errors::RecallResult;

pub use cache_metrics::{CacheMetrics, LayerCounters};
pub use query_metrics::{QueryMetrics, QueryMetricsSnapshot};

#[derive(Debug, Default)]
pub struct MetricsCollector {
    /// Shared so the tiered cache can hold it as its observer.
    pub cache: Arc<CacheMetrics>,
    pub query: QueryMetrics,
}

/// Point-in-time view of every collector.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub captured_at: DateTime<Utc>,
    pub cache: Vec<LayerCounters>,
    pub query: QueryMetricsSnapshot,
}

impl MetricsSnapshot {
    pub fn to_json(&self) -> RecallResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            captured_at: Utc::now(),
            cache: self.cache.snapshot(),
            query: self.query.snapshot(),
        }
    }

    /// Reset all counters (useful for tests or periodic rotation).
    pub fn reset(&self) {
        self.cache.reset();
        self.query.reset();
    }
}
