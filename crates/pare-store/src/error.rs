//! Storage error type

use thiserror::Error;

/// Storage error type shared by all store traits.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Entity does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A write conflicted with existing state.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Store credentials are missing or rejected.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Transient connectivity trouble; retry is the caller's decision.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    /// The row failed shape validation.
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for storage operations
pub type StoreResult<T> = Result<T, StoreError>;
