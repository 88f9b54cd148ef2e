use recall_core::errors::*;
use recall_core::models::CacheLayer;

#[test]
fn not_loaded_carries_partition_id() {
    let err = RecallError::NotLoaded {
        partition_id: "student".into(),
    };
    assert!(err.to_string().contains("student"));
    assert_eq!(err.code(), "NOT_LOADED");
}

#[test]
fn validation_error_is_flagged() {
    let err = RecallError::ValidationError("limit must be non-negative".into());
    assert!(err.is_validation());
    assert!(!RecallError::IndexUnavailable {
        reason: "down".into()
    }
    .is_validation());
}

#[test]
fn persistence_error_converts_to_recall_error() {
    let err: RecallError = PersistenceError::Corrupt {
        path: "/tmp/a.rvi".into(),
        details: "checksum mismatch".into(),
    }
    .into();
    assert!(matches!(err, RecallError::PersistenceError(_)));
    assert_eq!(err.code(), "IO_ERROR");
    assert!(err.to_string().contains("checksum mismatch"));
}

#[test]
fn cache_error_converts_to_recall_error() {
    let err: RecallError = CacheError::ObserverFailed {
        layer: "fast_answer".into(),
        reason: "collector gone".into(),
    }
    .into();
    assert!(matches!(err, RecallError::CacheError(_)));
}

#[test]
fn invalid_layer_index_is_cache_error() {
    let err = CacheLayer::from_index(7).unwrap_err();
    assert!(matches!(
        err,
        RecallError::CacheError(CacheError::InvalidLayer { index: 7 })
    ));
    assert_eq!(CacheLayer::from_index(4).unwrap(), CacheLayer::RetrievalResult);
}
