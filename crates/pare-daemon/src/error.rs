//! Daemon and API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use pare_engine::EngineError;
use pare_policy::PolicyViolation;
use pare_store::StoreError;
use thiserror::Error;

/// Daemon lifecycle error type
#[derive(Debug, Error)]
pub enum DaemonError {
    /// Configuration loading failed
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Server error
    #[error("Server error: {0}")]
    Server(String),
}

/// Result type for daemon operations
pub type DaemonResult<T> = Result<T, DaemonError>;

/// API error type mapped onto HTTP status codes:
/// 400 malformed input / illegal transition, 401 missing store
/// credentials, 403 policy-lock rejection, 404 missing entity,
/// 500 unexpected failure.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(msg) => ApiError::NotFound(msg),
            StoreError::Unauthorized(msg) => ApiError::Unauthorized(msg),
            StoreError::InvalidData(msg) => ApiError::BadRequest(msg),
            StoreError::Conflict(msg) | StoreError::Unavailable(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<PolicyViolation> for ApiError {
    fn from(e: PolicyViolation) -> Self {
        ApiError::Forbidden(e.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Validation(msg) => ApiError::BadRequest(msg),
            EngineError::Transition(e) => ApiError::BadRequest(e.to_string()),
            EngineError::NotFound(msg) => ApiError::NotFound(msg),
            EngineError::Policy(violation) => violation.into(),
            EngineError::Store(e) => e.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pare_types::RecommendationStatus;

    #[test]
    fn test_engine_error_mapping() {
        let e: ApiError = EngineError::Validation("bad days".to_string()).into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);

        let e: ApiError = EngineError::NotFound("rec".to_string()).into();
        assert_eq!(e.status(), StatusCode::NOT_FOUND);

        let e: ApiError = EngineError::Policy(PolicyViolation::Locked {
            resource_id: "i-1".to_string(),
        })
        .into();
        assert_eq!(e.status(), StatusCode::FORBIDDEN);

        let e: ApiError = EngineError::Transition(pare_engine::TransitionError::Illegal {
            from: RecommendationStatus::Pending,
            event: pare_engine::TransitionEvent::Execute,
        })
        .into();
        assert_eq!(e.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_store_error_mapping() {
        let e: ApiError = StoreError::Unauthorized("no credentials".to_string()).into();
        assert_eq!(e.status(), StatusCode::UNAUTHORIZED);

        let e: ApiError = StoreError::Unavailable("connection reset".to_string()).into();
        assert_eq!(e.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
