//! RecallRuntime assembly, ingestion, JSON contract, and persistence.

use recall_core::config::RecallConfig;
use recall_core::errors::RecallError;
use recall_core::models::{Bucket, CacheLayer, Document, PartitionState, QueryRequest};
use recall_runtime::{RecallRuntime, RuntimeOptions};
use test_fixtures::knowledge_base;

fn small_config() -> RecallConfig {
    RecallConfig::from_toml(
        r#"
        [index]
        dimensions = 128
        partitions = ["support", "engineering"]

        [query]
        backend = "hybrid"
        "#,
    )
    .unwrap()
}

fn seeded_runtime(config: RecallConfig) -> RecallRuntime {
    let runtime = RecallRuntime::from_config(config).unwrap();
    for item in knowledge_base() {
        runtime
            .ingest(&item.role, &item.knowledge_base, item.document, None)
            .unwrap();
    }
    runtime
}

#[test]
fn configured_partitions_are_loaded_on_start() {
    let runtime = RecallRuntime::from_config(small_config()).unwrap();
    let stats = runtime.get_all_partition_statistics().unwrap();
    assert_eq!(stats.len(), 2);
    assert!(stats.iter().all(|s| s.state == PartitionState::Loaded));
    assert!(stats.iter().all(|s| s.dimensions == 128));
}

#[test]
fn ingest_then_query_through_json() {
    let runtime = seeded_runtime(small_config());
    let body = r#"{
        "queryText": "How do I reset my password?",
        "limit": 3,
        "filters": {"role": "support"},
        "sortOrder": "RELEVANCE"
    }"#;
    let response: serde_json::Value =
        serde_json::from_str(&runtime.handle_query_json(body)).unwrap();
    assert_eq!(response["success"], true);
    assert!(response["error"].is_null());
    let docs = response["data"]["documents"].as_array().unwrap();
    assert!(!docs.is_empty() && docs.len() <= 3);
    assert_eq!(docs[0]["id"], "acct-001");
    assert!(response["data"]["totalHits"].as_u64().unwrap() >= 1);
}

#[test]
fn malformed_json_and_invalid_requests_fail_cleanly() {
    let runtime = seeded_runtime(small_config());
    let bad_json: serde_json::Value =
        serde_json::from_str(&runtime.handle_query_json("{not json")).unwrap();
    assert_eq!(bad_json["success"], false);
    assert!(bad_json["error"]
        .as_str()
        .unwrap()
        .starts_with("SERIALIZATION_ERROR"));

    let negative: serde_json::Value = serde_json::from_str(
        &runtime.handle_query_json(r#"{"queryText": "x", "limit": -1}"#),
    )
    .unwrap();
    assert_eq!(negative["success"], false);
    assert!(negative["error"]
        .as_str()
        .unwrap()
        .starts_with("VALIDATION_ERROR"));

    let metrics = runtime.metrics_snapshot();
    assert_eq!(metrics.query.failures, 2);
}

#[test]
fn repeated_query_hits_cache_and_ingest_invalidates() {
    let runtime = seeded_runtime(small_config());
    let request = QueryRequest::new("invoice").with_filter("role", "support");
    runtime.process(&request).unwrap();
    runtime.process(&request).unwrap();
    let l4 = runtime
        .get_cache_statistics()
        .layer(CacheLayer::RetrievalResult)
        .cloned()
        .unwrap();
    assert_eq!(l4.hits, 1);
    assert_eq!(runtime.metrics_snapshot().query.cache_hits, 1);

    runtime
        .ingest(
            "support",
            "kb-billing",
            Document::new("bill-004", "Invoice address", "Change the invoice address."),
            None,
        )
        .unwrap();
    let after = runtime.process(&request).unwrap();
    assert!(after.documents.iter().any(|d| d.id == "bill-004"));
}

#[test]
fn ingest_into_unknown_or_unloaded_partition_fails() {
    let runtime = RecallRuntime::from_config(small_config()).unwrap();
    let doc = Document::new("x", "t", "c");
    assert!(matches!(
        runtime.ingest("legal", "kb", doc.clone(), None),
        Err(RecallError::NotFound { .. })
    ));
    runtime.unload_partition("support").unwrap();
    assert!(matches!(
        runtime.ingest("support", "kb", doc, None),
        Err(RecallError::NotLoaded { .. })
    ));
}

#[test]
fn batch_with_mismatched_embeddings_applies_nothing() {
    let runtime = RecallRuntime::from_config(small_config()).unwrap();
    let docs = vec![Document::new("a", "A", "a"), Document::new("b", "B", "b")];
    let err = runtime
        .ingest_batch("support", "kb", docs, Some(vec![vec![0.5; 128]]))
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(
        runtime.get_partition_statistics("support").unwrap().document_count,
        0
    );
}

#[test]
fn snapshots_survive_a_restart() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = small_config();
    config.index.snapshot_dir = Some(dir.path().display().to_string());

    {
        let runtime = seeded_runtime(config.clone());
        assert_eq!(runtime.save_all().unwrap(), 2);
    }

    let restarted = RecallRuntime::from_config(config).unwrap();
    assert_eq!(
        restarted
            .get_partition_statistics("support")
            .unwrap()
            .document_count,
        6
    );
    let result = restarted
        .process(&QueryRequest::new("snapshot file").with_filter("role", "engineering"))
        .unwrap();
    assert_eq!(result.documents[0].id, "eng-002");
}

#[test]
fn variant_assignment_is_sticky() {
    let runtime = RecallRuntime::from_config(small_config()).unwrap();
    let variants = vec![Bucket::new("control", 0.5), Bucket::new("treatment", 0.5)];
    let first = runtime.assign_variant("ranker-v2", "user-42", &variants).unwrap();
    let again = runtime
        .assign_variant("ranker-v2", "user-42", &[Bucket::new("other", 1.0)])
        .unwrap();
    assert_eq!(first, again);
    assert_eq!(runtime.get_assignment("ranker-v2", "user-42"), Some(first));
    assert!(runtime.get_assignment("ranker-v2", "user-7").is_none());
    assert!(runtime
        .assign_variant("ranker-v2", "user-7", &[])
        .unwrap_err()
        .is_validation());
}

#[test]
fn embedder_dimension_mismatch_is_config_error() {
    let opts = RuntimeOptions {
        config: Some(small_config()),
        embedder: Some(std::sync::Arc::new(
            recall_query::HashingEmbedder::new(64).unwrap(),
        )),
        ..Default::default()
    };
    assert!(matches!(
        RecallRuntime::new(opts),
        Err(RecallError::ConfigError(_))
    ));
}

#[test]
fn invalid_toml_is_config_error() {
    let opts = RuntimeOptions {
        config_toml: Some("[cache.fast_answer]\ncapacity = 0\n".into()),
        ..Default::default()
    };
    assert!(matches!(
        RecallRuntime::new(opts),
        Err(RecallError::ConfigError(_))
    ));
}
