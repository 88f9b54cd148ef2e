//! # recall-observability
//!
//! Structured logging setup and in-process metrics.
//!
//! ```text
//! tracing_setup   init_tracing (RECALL_LOG, JSON output)
//! metrics
//! ├── CacheMetrics   per-layer hit/miss counters, an ICacheObserver
//! └── QueryMetrics   queries, cache hits, failures by code, latency
//! ```

pub mod metrics;
pub mod tracing_setup;

pub use metrics::{CacheMetrics, MetricsCollector, MetricsSnapshot, QueryMetrics};
pub use tracing_setup::{init_tracing, init_tracing_with_config, init_tracing_with_filter};
