//! Recommendations - the persistent, actionable work items
//!
//! A recommendation is derived from a detection and carries its own
//! approval state. Once in a terminal status the row is frozen except for
//! informational fields (`user_notes`).

use crate::audit::ExecutionOutcome;
use crate::detection::{Env, ResourceAction, ResourceType};
use crate::ids::{DetectionId, RecommendationId};
use crate::scenario::ScenarioDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Financial significance of a recommendation, derived from its
/// estimated monthly savings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ImpactLevel {
    /// Classify monthly savings into an impact level.
    ///
    /// Boundaries are inclusive: exactly $500 is critical, exactly $200 is
    /// high, exactly $50 is medium.
    pub fn from_savings(potential_savings: f64) -> Self {
        if potential_savings >= 500.0 {
            ImpactLevel::Critical
        } else if potential_savings >= 200.0 {
            ImpactLevel::High
        } else if potential_savings >= 50.0 {
            ImpactLevel::Medium
        } else {
            ImpactLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImpactLevel::Low => "low",
            ImpactLevel::Medium => "medium",
            ImpactLevel::High => "high",
            ImpactLevel::Critical => "critical",
        }
    }
}

impl fmt::Display for ImpactLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operational danger of acting on a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Assess risk from environment and resource type.
    ///
    /// Production is always high risk. Database and cache resources are
    /// medium in staging and low elsewhere; remaining staging resources
    /// are medium; everything else is low.
    pub fn assess(resource_type: ResourceType, env: Env) -> Self {
        if env == Env::Production {
            RiskLevel::High
        } else if resource_type.is_data_store() {
            if env == Env::Staging {
                RiskLevel::Medium
            } else {
                RiskLevel::Low
            }
        } else if env == Env::Staging {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle status of a recommendation.
///
/// Legal transitions live in `pare-engine`'s transition table; this enum
/// only knows which statuses are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationStatus {
    Pending,
    Approved,
    Rejected,
    Snoozed,
    Scheduled,
    Executed,
    Expired,
}

impl RecommendationStatus {
    /// Terminal statuses freeze the row (informational fields excepted).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RecommendationStatus::Rejected
                | RecommendationStatus::Executed
                | RecommendationStatus::Expired
        )
    }

    pub fn is_non_terminal(&self) -> bool {
        !self.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RecommendationStatus::Pending => "pending",
            RecommendationStatus::Approved => "approved",
            RecommendationStatus::Rejected => "rejected",
            RecommendationStatus::Snoozed => "snoozed",
            RecommendationStatus::Scheduled => "scheduled",
            RecommendationStatus::Executed => "executed",
            RecommendationStatus::Expired => "expired",
        }
    }

    /// Parse a wire-format status name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RecommendationStatus::Pending),
            "approved" => Some(RecommendationStatus::Approved),
            "rejected" => Some(RecommendationStatus::Rejected),
            "snoozed" => Some(RecommendationStatus::Snoozed),
            "scheduled" => Some(RecommendationStatus::Scheduled),
            "executed" => Some(RecommendationStatus::Executed),
            "expired" => Some(RecommendationStatus::Expired),
            _ => None,
        }
    }

    /// All statuses, in lifecycle order.
    pub fn all() -> [RecommendationStatus; 7] {
        [
            RecommendationStatus::Pending,
            RecommendationStatus::Approved,
            RecommendationStatus::Snoozed,
            RecommendationStatus::Scheduled,
            RecommendationStatus::Executed,
            RecommendationStatus::Rejected,
            RecommendationStatus::Expired,
        ]
    }
}

impl fmt::Display for RecommendationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted, operator- or scheduler-actionable cost-optimization
/// recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: RecommendationId,
    pub detection_id: DetectionId,

    /// Scenario payload; also provides scenario id and name.
    pub scenario: ScenarioDetails,

    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,

    pub account_id: String,
    pub region: String,
    pub env: Env,

    pub action: ResourceAction,

    pub title: String,
    pub description: String,

    /// Opaque, best-effort side channel; never gates a transition.
    pub explanation: Option<String>,

    pub impact_level: ImpactLevel,
    pub confidence: u8,
    pub risk_level: RiskLevel,

    pub current_monthly_cost: f64,
    pub potential_savings: f64,

    pub status: RecommendationStatus,
    pub snoozed_until: Option<DateTime<Utc>>,
    pub scheduled_for: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub user_notes: Option<String>,

    pub executed_at: Option<DateTime<Utc>>,
    pub execution_result: Option<ExecutionOutcome>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub actioned_by: Option<String>,
}

impl Recommendation {
    /// Whether this row still counts against the one-active-per-detection
    /// invariant.
    pub fn is_active(&self) -> bool {
        self.status.is_non_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_impact_boundaries() {
        assert_eq!(ImpactLevel::from_savings(500.0), ImpactLevel::Critical);
        assert_eq!(ImpactLevel::from_savings(499.99), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_savings(200.0), ImpactLevel::High);
        assert_eq!(ImpactLevel::from_savings(199.99), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_savings(50.0), ImpactLevel::Medium);
        assert_eq!(ImpactLevel::from_savings(49.99), ImpactLevel::Low);
    }

    #[test]
    fn test_production_is_always_high_risk() {
        for resource_type in [
            ResourceType::RdsInstances,
            ResourceType::Ec2Instances,
            ResourceType::EbsVolumes,
            ResourceType::ElasticacheClusters,
            ResourceType::EbsSnapshots,
        ] {
            assert_eq!(
                RiskLevel::assess(resource_type, Env::Production),
                RiskLevel::High
            );
        }
    }

    #[test]
    fn test_staging_risk() {
        assert_eq!(
            RiskLevel::assess(ResourceType::RdsInstances, Env::Staging),
            RiskLevel::Medium
        );
        assert_eq!(
            RiskLevel::assess(ResourceType::Ec2Instances, Env::Staging),
            RiskLevel::Medium
        );
    }

    #[test]
    fn test_development_risk_is_low() {
        assert_eq!(
            RiskLevel::assess(ResourceType::RdsInstances, Env::Development),
            RiskLevel::Low
        );
        assert_eq!(
            RiskLevel::assess(ResourceType::EbsVolumes, Env::Development),
            RiskLevel::Low
        );
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(RecommendationStatus::Rejected.is_terminal());
        assert!(RecommendationStatus::Executed.is_terminal());
        assert!(RecommendationStatus::Expired.is_terminal());
        assert!(RecommendationStatus::Pending.is_non_terminal());
        assert!(RecommendationStatus::Approved.is_non_terminal());
        assert!(RecommendationStatus::Snoozed.is_non_terminal());
        assert!(RecommendationStatus::Scheduled.is_non_terminal());
    }

    #[test]
    fn test_status_parse_roundtrip() {
        for status in RecommendationStatus::all() {
            assert_eq!(RecommendationStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RecommendationStatus::parse("archived"), None);
    }
}
