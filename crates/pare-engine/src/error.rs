//! Error types for the lifecycle engine

use crate::transition::TransitionError;
use pare_policy::PolicyViolation;
use pare_store::StoreError;
use thiserror::Error;

/// Engine error type.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input; the caller must fix and retry.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The state machine refused the transition.
    #[error("{0}")]
    Transition(#[from] TransitionError),

    /// Unknown entity; no retry.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Lock or production guard tripped; never downgraded to a warning.
    #[error("Policy violation: {0}")]
    Policy(#[from] PolicyViolation),

    /// Store trouble; retry is the caller's decision.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
