//! Scenario payloads - one strongly-typed variant per waste scenario
//!
//! The scanner emits scenario-shaped measurement payloads. They are
//! modelled as a tagged union so the text boundary (titles, descriptions)
//! matches exhaustively instead of string-switching over an opaque map.
//! An unknown scenario tag fails deserialization at the boundary.

use serde::{Deserialize, Serialize};

/// Measurement payload for a detection, tagged by scenario id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum ScenarioDetails {
    /// RDS instance with negligible connection activity.
    IdleRds {
        avg_connections_7d: f64,
        cpu_avg_7d: f64,
        instance_class: String,
    },

    /// EC2 instance provisioned well above its observed load.
    OversizedEc2 {
        instance_type: String,
        recommended_type: String,
        cpu_p95_14d: f64,
    },

    /// EBS volume not attached to any instance.
    UnattachedEbs {
        volume_type: String,
        size_gb: u64,
        days_unattached: u32,
    },

    /// ElastiCache cluster serving almost no traffic.
    IdleElasticache {
        engine: String,
        node_type: String,
        avg_cache_hits_7d: f64,
    },

    /// EBS snapshots past their useful retention window.
    StaleSnapshots {
        size_gb: u64,
        age_days: u32,
        source_volume_id: String,
    },
}

impl ScenarioDetails {
    /// Stable scenario identifier, matching the serde tag.
    pub fn scenario_id(&self) -> &'static str {
        match self {
            ScenarioDetails::IdleRds { .. } => "idle_rds",
            ScenarioDetails::OversizedEc2 { .. } => "oversized_ec2",
            ScenarioDetails::UnattachedEbs { .. } => "unattached_ebs",
            ScenarioDetails::IdleElasticache { .. } => "idle_elasticache",
            ScenarioDetails::StaleSnapshots { .. } => "stale_snapshots",
        }
    }

    /// Human-readable scenario name.
    pub fn scenario_name(&self) -> &'static str {
        match self {
            ScenarioDetails::IdleRds { .. } => "Idle RDS instance",
            ScenarioDetails::OversizedEc2 { .. } => "Oversized EC2 instance",
            ScenarioDetails::UnattachedEbs { .. } => "Unattached EBS volume",
            ScenarioDetails::IdleElasticache { .. } => "Idle ElastiCache cluster",
            ScenarioDetails::StaleSnapshots { .. } => "Stale EBS snapshots",
        }
    }

    /// Deterministic recommendation title. Substitutes only measured
    /// fields; no invented free text.
    pub fn title(&self, resource_name: &str) -> String {
        match self {
            ScenarioDetails::IdleRds { .. } => {
                format!("Stop idle RDS instance {}", resource_name)
            }
            ScenarioDetails::OversizedEc2 {
                recommended_type, ..
            } => {
                format!("Resize {} to {}", resource_name, recommended_type)
            }
            ScenarioDetails::UnattachedEbs { .. } => {
                format!("Delete unattached volume {}", resource_name)
            }
            ScenarioDetails::IdleElasticache { .. } => {
                format!("Delete idle cache cluster {}", resource_name)
            }
            ScenarioDetails::StaleSnapshots { .. } => {
                format!("Delete stale snapshots of {}", resource_name)
            }
        }
    }

    /// Deterministic recommendation description built from the measured
    /// payload plus the detection's cost figures.
    pub fn description(
        &self,
        resource_name: &str,
        monthly_cost: f64,
        potential_savings: f64,
    ) -> String {
        match self {
            ScenarioDetails::IdleRds {
                avg_connections_7d,
                cpu_avg_7d,
                instance_class,
            } => format!(
                "RDS instance {} ({}) averaged {:.1} connections and {:.1}% CPU \
                 over the last 7 days while costing ${:.2}/month. Stopping it \
                 saves an estimated ${:.2}/month.",
                resource_name,
                instance_class,
                avg_connections_7d,
                cpu_avg_7d,
                monthly_cost,
                potential_savings
            ),
            ScenarioDetails::OversizedEc2 {
                instance_type,
                recommended_type,
                cpu_p95_14d,
            } => format!(
                "EC2 instance {} ({}) peaked at {:.1}% CPU (p95, 14 days). \
                 Resizing to {} saves an estimated ${:.2}/month of its \
                 ${:.2}/month cost.",
                resource_name,
                instance_type,
                cpu_p95_14d,
                recommended_type,
                potential_savings,
                monthly_cost
            ),
            ScenarioDetails::UnattachedEbs {
                volume_type,
                size_gb,
                days_unattached,
            } => format!(
                "EBS volume {} ({}, {} GB) has been unattached for {} days at \
                 ${:.2}/month. Deleting it saves ${:.2}/month.",
                resource_name, volume_type, size_gb, days_unattached, monthly_cost,
                potential_savings
            ),
            ScenarioDetails::IdleElasticache {
                engine,
                node_type,
                avg_cache_hits_7d,
            } => format!(
                "ElastiCache cluster {} ({} on {}) averaged {:.1} cache hits \
                 over the last 7 days while costing ${:.2}/month. Deleting it \
                 saves ${:.2}/month.",
                resource_name, engine, node_type, avg_cache_hits_7d, monthly_cost,
                potential_savings
            ),
            ScenarioDetails::StaleSnapshots {
                size_gb,
                age_days,
                source_volume_id,
            } => format!(
                "Snapshots of {} (source volume {}, {} GB) are {} days old at \
                 ${:.2}/month. Deleting them saves ${:.2}/month.",
                resource_name, source_volume_id, size_gb, age_days, monthly_cost,
                potential_savings
            ),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::detection::{Detection, Env, ResourceAction, ResourceType, ACTIONABLE_MODE};
    use crate::ids::DetectionId;

    /// Shared fixture for tests across the crate.
    pub(crate) fn sample_detection() -> Detection {
        Detection {
            id: DetectionId::generate(),
            details: ScenarioDetails::IdleRds {
                avg_connections_7d: 0.3,
                cpu_avg_7d: 1.8,
                instance_class: "db.r5.large".to_string(),
            },
            resource_type: ResourceType::RdsInstances,
            resource_id: "db-0a1b2c3d".to_string(),
            resource_name: "orders-replica".to_string(),
            account_id: "123456789012".to_string(),
            region: "us-east-1".to_string(),
            env: Env::Production,
            action: ResourceAction::StopInstance,
            monthly_cost: 410.0,
            potential_savings: 300.0,
            confidence: 92,
            mode: ACTIONABLE_MODE,
        }
    }

    #[test]
    fn test_scenario_tag_roundtrip() {
        let details = ScenarioDetails::UnattachedEbs {
            volume_type: "gp3".to_string(),
            size_gb: 500,
            days_unattached: 42,
        };
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["scenario"], "unattached_ebs");

        let back: ScenarioDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_unknown_scenario_rejected() {
        let raw = serde_json::json!({ "scenario": "mystery_waste", "size_gb": 3 });
        assert!(serde_json::from_value::<ScenarioDetails>(raw).is_err());
    }

    #[test]
    fn test_title_substitutes_measured_fields() {
        let details = ScenarioDetails::OversizedEc2 {
            instance_type: "m5.4xlarge".to_string(),
            recommended_type: "m5.xlarge".to_string(),
            cpu_p95_14d: 11.2,
        };
        assert_eq!(details.title("api-worker"), "Resize api-worker to m5.xlarge");
    }

    #[test]
    fn test_description_is_deterministic() {
        let detection = sample_detection();
        let a = detection
            .details
            .description(&detection.resource_name, 410.0, 300.0);
        let b = detection
            .details
            .description(&detection.resource_name, 410.0, 300.0);
        assert_eq!(a, b);
        assert!(a.contains("orders-replica"));
        assert!(a.contains("$300.00"));
    }

    #[test]
    fn test_scenario_id_matches_serde_tag() {
        let details = sample_detection().details;
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["scenario"], details.scenario_id());
    }
}
