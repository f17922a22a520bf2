//! Typed per-item outcomes for batch policy operations
//!
//! Bulk updates and preset application fold into one report value with
//! explicit counts; success/failure accounting is structural, not
//! incidental to error handling.

use crate::lock::PolicyViolation;
use pare_types::OptimizationPolicy;
use serde::{Deserialize, Serialize};

/// Outcome for one resource in a batch policy operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ResourcePolicyOutcome {
    /// The policy was written.
    Applied {
        previous: OptimizationPolicy,
        new: OptimizationPolicy,
    },

    /// The validator refused the change; nothing was written.
    Skipped { violation: PolicyViolation },

    /// The write itself failed (missing resource, store trouble).
    Failed { reason: String },
}

/// One item of a bulk report: which resource, what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyItemOutcome {
    pub resource_id: String,
    #[serde(flatten)]
    pub outcome: ResourcePolicyOutcome,
}

/// Aggregated result of a bulk policy update or preset application.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkPolicyReport {
    pub success_count: usize,
    pub fail_count: usize,
    pub skipped_count: usize,
    pub items: Vec<PolicyItemOutcome>,
}

impl BulkPolicyReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one item outcome, keeping the counters in sync.
    pub fn push(&mut self, resource_id: impl Into<String>, outcome: ResourcePolicyOutcome) {
        match &outcome {
            ResourcePolicyOutcome::Applied { .. } => self.success_count += 1,
            ResourcePolicyOutcome::Skipped { .. } => self.skipped_count += 1,
            ResourcePolicyOutcome::Failed { .. } => self.fail_count += 1,
        }
        self.items.push(PolicyItemOutcome {
            resource_id: resource_id.into(),
            outcome,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_counts_track_items() {
        let mut report = BulkPolicyReport::new();
        report.push(
            "a",
            ResourcePolicyOutcome::Applied {
                previous: OptimizationPolicy::RecommendOnly,
                new: OptimizationPolicy::AutoSafe,
            },
        );
        report.push(
            "b",
            ResourcePolicyOutcome::Skipped {
                violation: PolicyViolation::Locked {
                    resource_id: "b".to_string(),
                },
            },
        );
        report.push(
            "c",
            ResourcePolicyOutcome::Failed {
                reason: "not found".to_string(),
            },
        );

        assert_eq!(report.success_count, 1);
        assert_eq!(report.skipped_count, 1);
        assert_eq!(report.fail_count, 1);
        assert_eq!(report.items.len(), 3);
    }

    #[test]
    fn test_item_outcome_wire_shape() {
        let item = PolicyItemOutcome {
            resource_id: "db-1".to_string(),
            outcome: ResourcePolicyOutcome::Skipped {
                violation: PolicyViolation::ProductionAutoSafe {
                    resource_id: "db-1".to_string(),
                },
            },
        };
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["resource_id"], "db-1");
        assert_eq!(json["outcome"], "skipped");
    }
}
