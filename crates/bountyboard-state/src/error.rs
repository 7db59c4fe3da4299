//! Error types for state operations.

/// Result type for state operations.
pub type Result<T> = std::result::Result<T, StateError>;

/// Rejected state changes. Storage problems are logged, not reported here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    /// Winner positions start at 1.
    #[error("invalid winner position {0} (positions start at 1)")]
    InvalidPosition(u32),

    /// Prize amounts must be finite and non-negative.
    #[error("invalid prize amount {0}")]
    InvalidAmount(f64),
}
