/// Cache subsystem errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("cache observer failed for layer {layer}: {reason}")]
    ObserverFailed { layer: String, reason: String },

    #[error("unknown cache layer {index} (expected 1-4)")]
    InvalidLayer { index: u8 },
}
