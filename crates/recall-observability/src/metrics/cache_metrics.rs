//! Per-layer cache hit/miss counters fed by the tiered cache.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use recall_core::errors::RecallResult;
use recall_core::models::{CacheLayer, CacheStatistics};
use recall_core::traits::ICacheObserver;

#[derive(Debug, Default)]
struct Counter {
    hits: AtomicU64,
    misses: AtomicU64,
}

/// Counters of one layer at snapshot time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerCounters {
    pub layer: CacheLayer,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
}

/// Lock-free observer counting every cache access.
#[derive(Debug, Default)]
pub struct CacheMetrics {
    layers: [Counter; 4],
}

impl CacheMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    fn counter(&self, layer: CacheLayer) -> &Counter {
        &self.layers[usize::from(layer.index() - 1)]
    }

    pub fn counters(&self, layer: CacheLayer) -> LayerCounters {
        let c = self.counter(layer);
        let hits = c.hits.load(Ordering::Relaxed);
        let misses = c.misses.load(Ordering::Relaxed);
        LayerCounters {
            layer,
            hits,
            misses,
            hit_rate: CacheStatistics::compute_hit_rate(hits, misses),
        }
    }

    pub fn snapshot(&self) -> Vec<LayerCounters> {
        CacheLayer::ALL.into_iter().map(|l| self.counters(l)).collect()
    }

    pub fn reset(&self) {
        for c in &self.layers {
            c.hits.store(0, Ordering::Relaxed);
            c.misses.store(0, Ordering::Relaxed);
        }
    }
}

impl ICacheObserver for CacheMetrics {
    fn record(&self, layer: CacheLayer, hit: bool) -> RecallResult<()> {
        let c = self.counter(layer);
        if hit {
            c.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            c.misses.fetch_add(1, Ordering::Relaxed);
        }
        Ok(())
    }
}
