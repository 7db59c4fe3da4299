//! Error types for storage operations.

/// Result type alias for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur reading or writing durable state.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Filesystem error.
    #[error("storage I/O error for key '{key}': {source}")]
    Io {
        key: String,
        source: std::io::Error,
    },

    /// Value could not be serialized.
    #[error("failed to serialize value for key '{key}': {source}")]
    Serialize {
        key: String,
        source: serde_json::Error,
    },

    /// Key cannot be mapped to a storage slot.
    #[error("invalid storage key '{0}'")]
    InvalidKey(String),
}
