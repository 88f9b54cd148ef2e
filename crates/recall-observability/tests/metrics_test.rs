use std::sync::Arc;
use std::thread;

use recall_core::models::CacheLayer;
use recall_core::traits::ICacheObserver;
use recall_observability::{init_tracing_with_filter, MetricsCollector, QueryMetrics};

#[test]
fn query_metrics_aggregate() {
    let m = QueryMetrics::new();
    m.record_success(false, 30);
    m.record_success(true, 2);
    m.record_success(true, 4);
    m.record_failure("VALIDATION_ERROR");
    m.record_failure("VALIDATION_ERROR");
    m.record_failure("INDEX_UNAVAILABLE");

    let s = m.snapshot();
    assert_eq!(s.queries, 6);
    assert_eq!(s.failures, 3);
    assert_eq!(s.cache_hits, 2);
    assert!((s.cache_hit_rate - 2.0 / 3.0).abs() < 1e-9);
    assert!((s.avg_latency_ms - 12.0).abs() < 1e-9);
    assert_eq!(s.max_latency_ms, 30);
    assert_eq!(s.failures_by_code["VALIDATION_ERROR"], 2);
    assert_eq!(s.failures_by_code["INDEX_UNAVAILABLE"], 1);

    m.reset();
    assert_eq!(m.snapshot(), Default::default());
}

#[test]
fn cache_metrics_are_thread_safe() {
    let collector = Arc::new(MetricsCollector::new());
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let c = Arc::clone(&collector);
            thread::spawn(move || {
                for _ in 0..100 {
                    c.cache.record(CacheLayer::DerivedAnswer, i % 2 == 0).unwrap();
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let counters = collector.cache.counters(CacheLayer::DerivedAnswer);
    assert_eq!(counters.hits, 400);
    assert_eq!(counters.misses, 400);
}

#[test]
fn snapshot_serializes_to_camel_case_json() {
    init_tracing_with_filter("warn");
    let collector = MetricsCollector::new();
    collector.query.record_success(true, 1);
    let json: serde_json::Value =
        serde_json::from_str(&collector.snapshot().to_json().unwrap()).unwrap();
    assert_eq!(json["query"]["cacheHits"], 1);
    assert_eq!(json["cache"].as_array().unwrap().len(), 4);
    assert!(json["capturedAt"].is_string());
}
