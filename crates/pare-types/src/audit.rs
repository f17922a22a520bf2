//! Audit trail types
//!
//! Every execution attempt produces exactly one [`AuditLogEntry`],
//! successful or not. Entries are append-only: nothing in normal
//! operation updates or deletes them.

use crate::detection::{ResourceAction, ResourceType};
use crate::ids::{AuditEntryId, DetectionId, RecommendationId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured outcome of one executor call.
///
/// `success = false` is a normal, expected result; callers never treat it
/// as a crash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionOutcome {
    pub success: bool,
    pub message: String,
    pub previous_state: serde_json::Value,
    pub new_state: serde_json::Value,
    pub executed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

/// Append-only record of one execution attempt against a resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogEntry {
    pub id: AuditEntryId,

    pub action: ResourceAction,
    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,

    pub scenario_id: String,
    pub detection_id: DetectionId,
    pub recommendation_id: RecommendationId,

    pub success: bool,
    pub message: String,

    /// Resource state snapshots around the mutation, provider-shaped.
    pub previous_state: serde_json::Value,
    pub new_state: serde_json::Value,

    pub executed_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub executed_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_serializes_with_snapshots() {
        let outcome = ExecutionOutcome {
            success: true,
            message: "stopped".to_string(),
            previous_state: serde_json::json!({ "state": "available" }),
            new_state: serde_json::json!({ "state": "stopped" }),
            executed_at: Utc::now(),
            duration_ms: 1280,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["previous_state"]["state"], "available");
        assert_eq!(json["new_state"]["state"], "stopped");
    }
}
