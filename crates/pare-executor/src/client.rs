//! Control-plane client seam
//!
//! The real implementation talks to the cloud provider and is owned
//! elsewhere; this crate only defines the contract and a stub backend for
//! development and tests.

use async_trait::async_trait;
use pare_types::{ResourceAction, ResourceType};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// One mutation request against a cloud resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyRequest {
    pub resource_type: ResourceType,
    pub action: ResourceAction,
    pub resource_id: String,
    /// Scenario-shaped payload forwarded to the provider call.
    pub details: serde_json::Value,
}

/// Provider-reported result of one mutation.
///
/// `success = false` means the provider definitively refused or failed
/// the mutation; that is not a transport error and is not retried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub success: bool,
    pub message: String,
    pub previous_state: serde_json::Value,
    pub new_state: serde_json::Value,
}

/// Transport-level control-plane failure; retryable.
#[derive(Debug, Clone, Error)]
pub enum ControlPlaneError {
    #[error("control plane unreachable: {0}")]
    Unreachable(String),

    #[error("control plane throttled the request: {0}")]
    Throttled(String),
}

/// External collaborator that actually stops/deletes/resizes resources.
#[async_trait]
pub trait ControlPlaneClient: Send + Sync {
    async fn apply(&self, request: &ApplyRequest) -> Result<ApplyOutcome, ControlPlaneError>;
}

/// Stub control plane for development and tests.
///
/// Succeeds by default; can be configured to report definitive failure,
/// to be unreachable, or to respond slowly (for timeout tests).
#[derive(Debug, Default)]
pub struct StubControlPlane {
    fail_message: Option<String>,
    unreachable: bool,
    delay: Option<Duration>,
}

impl StubControlPlane {
    /// A stub that applies every action successfully.
    pub fn succeeding() -> Self {
        Self::default()
    }

    /// A stub whose provider definitively fails every action.
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            fail_message: Some(message.into()),
            ..Self::default()
        }
    }

    /// A stub that never answers the transport.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Delay every response; combine with a short executor timeout to
    /// exercise the timeout path.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl ControlPlaneClient for StubControlPlane {
    async fn apply(&self, request: &ApplyRequest) -> Result<ApplyOutcome, ControlPlaneError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        if self.unreachable {
            return Err(ControlPlaneError::Unreachable(
                "stub transport down".to_string(),
            ));
        }

        let previous_state = serde_json::json!({
            "resource_id": request.resource_id,
            "state": "in-service",
        });

        if let Some(message) = &self.fail_message {
            return Ok(ApplyOutcome {
                success: false,
                message: message.clone(),
                previous_state: previous_state.clone(),
                new_state: previous_state,
            });
        }

        let new_state = serde_json::json!({
            "resource_id": request.resource_id,
            "state": applied_state(request.action),
        });

        Ok(ApplyOutcome {
            success: true,
            message: format!("{} applied to {}", request.action, request.resource_id),
            previous_state,
            new_state,
        })
    }
}

fn applied_state(action: ResourceAction) -> &'static str {
    match action {
        ResourceAction::StopInstance => "stopped",
        ResourceAction::ResizeInstance => "resized",
        ResourceAction::DeleteVolume
        | ResourceAction::DeleteSnapshot
        | ResourceAction::DeleteCluster => "deleted",
    }
}
