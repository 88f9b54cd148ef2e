/// Snapshot persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O failure on {path}: {reason}")]
    Io { path: String, reason: String },

    #[error("corrupt snapshot {path}: {details}")]
    Corrupt { path: String, details: String },

    #[error("unsupported snapshot version {version} in {path}")]
    UnsupportedVersion { path: String, version: u16 },
}
