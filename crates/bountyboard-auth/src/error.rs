//! Error types for the token store.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Errors that can occur while reading or writing the session.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// Durable storage failed.
    #[error("session storage error: {0}")]
    Storage(#[from] bountyboard_storage::StorageError),

    /// Operation needs an existing session.
    #[error("no active session")]
    NoSession,
}
