//! Action executor
//!
//! Snapshot, mutate, snapshot, audit. The audit append happens on every
//! path; an audit-store failure is logged and does not change the
//! execution outcome.

use crate::client::{ApplyOutcome, ApplyRequest, ControlPlaneClient};
use chrono::Utc;
use pare_store::AuditLogStore;
use pare_types::{
    AuditEntryId, AuditLogEntry, DetectionId, ExecutionOutcome, RecommendationId, ResourceAction,
    ResourceType,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Executor tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Per-attempt timeout for the control-plane call, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Transport attempts per execute call (definitive provider failures
    /// are not retried).
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed backoff between transport attempts, in milliseconds.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

/// Everything the executor needs to act on one recommendation.
#[derive(Debug, Clone)]
pub struct ExecutionRequest {
    pub recommendation_id: RecommendationId,
    pub detection_id: DetectionId,
    pub scenario_id: String,
    pub action: ResourceAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,
    pub details: serde_json::Value,
    pub executed_by: String,
}

/// Performs one side-effecting operation and reports a structured
/// outcome plus an audit record. Never throws past its boundary.
pub struct ActionExecutor {
    client: Arc<dyn ControlPlaneClient>,
    audit: Arc<dyn AuditLogStore>,
    config: ExecutorConfig,
}

impl ActionExecutor {
    pub fn new(
        client: Arc<dyn ControlPlaneClient>,
        audit: Arc<dyn AuditLogStore>,
        config: ExecutorConfig,
    ) -> Self {
        Self {
            client,
            audit,
            config,
        }
    }

    /// Execute one action. Exactly one audit entry is appended whether
    /// the mutation succeeded or failed; `success = false` in the
    /// returned outcome is a normal, expected result.
    pub async fn execute(&self, request: &ExecutionRequest) -> ExecutionOutcome {
        let started = Instant::now();
        let apply_request = ApplyRequest {
            resource_type: request.resource_type,
            action: request.action,
            resource_id: request.resource_id.clone(),
            details: request.details.clone(),
        };

        let applied = self.apply_with_retry(&apply_request).await;
        let duration_ms = started.elapsed().as_millis() as u64;
        let executed_at = Utc::now();

        let outcome = match applied {
            Ok(applied) => ExecutionOutcome {
                success: applied.success,
                message: applied.message,
                previous_state: applied.previous_state,
                new_state: applied.new_state,
                executed_at,
                duration_ms,
            },
            Err(message) => ExecutionOutcome {
                success: false,
                message,
                previous_state: serde_json::Value::Null,
                new_state: serde_json::Value::Null,
                executed_at,
                duration_ms,
            },
        };

        if outcome.success {
            tracing::info!(
                recommendation_id = %request.recommendation_id,
                resource_id = %request.resource_id,
                action = %request.action,
                duration_ms,
                "executed action"
            );
        } else {
            tracing::warn!(
                recommendation_id = %request.recommendation_id,
                resource_id = %request.resource_id,
                action = %request.action,
                message = %outcome.message,
                "action execution failed"
            );
        }

        self.append_audit(request, &outcome).await;
        outcome
    }

    /// Run the control-plane call under the per-attempt timeout, retrying
    /// transport failures with fixed backoff. A definitive provider
    /// outcome (success or failure) stops the loop.
    async fn apply_with_retry(&self, request: &ApplyRequest) -> Result<ApplyOutcome, String> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let backoff = Duration::from_millis(self.config.retry_backoff_ms);
        let attempts = self.config.max_attempts.max(1);
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            match tokio::time::timeout(timeout, self.client.apply(request)).await {
                Ok(Ok(outcome)) => return Ok(outcome),
                Ok(Err(e)) => {
                    last_error = e.to_string();
                }
                Err(_) => {
                    last_error = format!("control-plane call timed out after {:?}", timeout);
                }
            }

            if attempt < attempts {
                tracing::debug!(
                    resource_id = %request.resource_id,
                    attempt,
                    error = %last_error,
                    "retrying control-plane call"
                );
                tokio::time::sleep(backoff).await;
            }
        }

        Err(format!(
            "{} (after {} attempts)",
            last_error, attempts
        ))
    }

    async fn append_audit(&self, request: &ExecutionRequest, outcome: &ExecutionOutcome) {
        let entry = AuditLogEntry {
            id: AuditEntryId::generate(),
            action: request.action,
            resource_type: request.resource_type,
            resource_id: request.resource_id.clone(),
            resource_name: request.resource_name.clone(),
            scenario_id: request.scenario_id.clone(),
            detection_id: request.detection_id.clone(),
            recommendation_id: request.recommendation_id.clone(),
            success: outcome.success,
            message: outcome.message.clone(),
            previous_state: outcome.previous_state.clone(),
            new_state: outcome.new_state.clone(),
            executed_at: outcome.executed_at,
            duration_ms: outcome.duration_ms,
            executed_by: request.executed_by.clone(),
        };

        if let Err(e) = self.audit.append(entry).await {
            // The outcome has already been decided; losing the audit row
            // is an operational incident, not an execution failure.
            tracing::error!(
                recommendation_id = %request.recommendation_id,
                error = %e,
                "failed to append audit log entry"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StubControlPlane;
    use pare_store::{AuditFilter, InMemoryStore};

    fn executor_with(
        client: StubControlPlane,
        config: ExecutorConfig,
    ) -> (ActionExecutor, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        let executor = ActionExecutor::new(Arc::new(client), store.clone(), config);
        (executor, store)
    }

    fn request() -> ExecutionRequest {
        ExecutionRequest {
            recommendation_id: RecommendationId::generate(),
            detection_id: DetectionId::generate(),
            scenario_id: "idle_rds".to_string(),
            action: ResourceAction::StopInstance,
            resource_type: ResourceType::RdsInstances,
            resource_id: "db-0a1b".to_string(),
            resource_name: "orders-replica".to_string(),
            details: serde_json::json!({ "instance_class": "db.r5.large" }),
            executed_by: "operator:kim".to_string(),
        }
    }

    #[tokio::test]
    async fn test_success_produces_one_audit_entry() {
        let (executor, store) =
            executor_with(StubControlPlane::succeeding(), ExecutorConfig::default());
        let request = request();

        let outcome = executor.execute(&request).await;
        assert!(outcome.success);
        assert_eq!(outcome.new_state["state"], "stopped");

        let entries = store.list_entries(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].success);
        assert_eq!(entries[0].recommendation_id, request.recommendation_id);
    }

    #[tokio::test]
    async fn test_provider_failure_still_audited() {
        let (executor, store) = executor_with(
            StubControlPlane::failing("termination protection enabled"),
            ExecutorConfig::default(),
        );

        let outcome = executor.execute(&request()).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("termination protection"));

        let entries = store.list_entries(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].success);
    }

    #[tokio::test]
    async fn test_unreachable_transport_exhausts_attempts() {
        let config = ExecutorConfig {
            timeout_secs: 5,
            max_attempts: 2,
            retry_backoff_ms: 1,
        };
        let (executor, store) = executor_with(StubControlPlane::unreachable(), config);

        let outcome = executor.execute(&request()).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("after 2 attempts"));

        // Retries stay inside one execute call and one audit entry.
        let entries = store.list_entries(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_timeout_path() {
        let config = ExecutorConfig {
            timeout_secs: 1,
            max_attempts: 1,
            retry_backoff_ms: 1,
        };
        let slow = StubControlPlane::succeeding().with_delay(Duration::from_secs(5));
        let (executor, store) = executor_with(slow, config);

        let outcome = executor.execute(&request()).await;
        assert!(!outcome.success);
        assert!(outcome.message.contains("timed out"));
        assert_eq!(
            store
                .list_entries(&AuditFilter::default())
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_two_executions_two_audit_entries() {
        let (executor, store) =
            executor_with(StubControlPlane::succeeding(), ExecutorConfig::default());
        let request = request();

        executor.execute(&request).await;
        executor.execute(&request).await;

        let entries = store.list_entries(&AuditFilter::default()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_ne!(entries[0].id, entries[1].id);
    }
}
