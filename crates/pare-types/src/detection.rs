//! Detections - raw waste signals emitted by the scanner
//!
//! A detection is ephemeral: it is produced by an external scan, consumed
//! by the recommendation creator, and never persisted by this subsystem.

use crate::ids::DetectionId;
use crate::scenario::ScenarioDetails;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scanner mode whose detections are eligible for recommendation creation.
///
/// Lower modes are observe/advise passes; only mode-3 output is concrete
/// enough to act on.
pub const ACTIONABLE_MODE: u8 = 3;

/// Deployment environment of a cloud resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Env {
    Production,
    Staging,
    Development,
}

impl Env {
    pub fn as_str(&self) -> &'static str {
        match self {
            Env::Production => "production",
            Env::Staging => "staging",
            Env::Development => "development",
        }
    }
}

impl fmt::Display for Env {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resource inventory categories the scanner covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceType {
    RdsInstances,
    Ec2Instances,
    EbsVolumes,
    ElasticacheClusters,
    EbsSnapshots,
}

impl ResourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::RdsInstances => "rds_instances",
            ResourceType::Ec2Instances => "ec2_instances",
            ResourceType::EbsVolumes => "ebs_volumes",
            ResourceType::ElasticacheClusters => "elasticache_clusters",
            ResourceType::EbsSnapshots => "ebs_snapshots",
        }
    }

    /// Database and cache resource types carry their own risk weighting.
    pub fn is_data_store(&self) -> bool {
        matches!(
            self,
            ResourceType::RdsInstances | ResourceType::ElasticacheClusters
        )
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Control-plane action a recommendation proposes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceAction {
    StopInstance,
    ResizeInstance,
    DeleteVolume,
    DeleteSnapshot,
    DeleteCluster,
}

impl ResourceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceAction::StopInstance => "stop_instance",
            ResourceAction::ResizeInstance => "resize_instance",
            ResourceAction::DeleteVolume => "delete_volume",
            ResourceAction::DeleteSnapshot => "delete_snapshot",
            ResourceAction::DeleteCluster => "delete_cluster",
        }
    }
}

impl fmt::Display for ResourceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw waste signal produced by scanning a cloud resource against a
/// scenario's threshold rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Detection {
    pub id: DetectionId,

    /// Scenario-shaped measurement payload; also carries the scenario id.
    pub details: ScenarioDetails,

    pub resource_type: ResourceType,
    pub resource_id: String,
    pub resource_name: String,

    pub account_id: String,
    pub region: String,
    pub env: Env,

    /// Proposed remediation.
    pub action: ResourceAction,

    pub monthly_cost: f64,
    pub potential_savings: f64,

    /// Scanner confidence, 0-100.
    pub confidence: u8,

    /// Scanner pass that produced this signal. Only [`ACTIONABLE_MODE`]
    /// detections may become recommendations.
    pub mode: u8,
}

impl Detection {
    /// Whether this detection is eligible for recommendation creation.
    pub fn is_actionable(&self) -> bool {
        self.mode == ACTIONABLE_MODE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_serde_snake_case() {
        let json = serde_json::to_string(&Env::Production).unwrap();
        assert_eq!(json, "\"production\"");
    }

    #[test]
    fn test_resource_type_data_store() {
        assert!(ResourceType::RdsInstances.is_data_store());
        assert!(ResourceType::ElasticacheClusters.is_data_store());
        assert!(!ResourceType::Ec2Instances.is_data_store());
        assert!(!ResourceType::EbsVolumes.is_data_store());
    }

    #[test]
    fn test_resource_type_wire_name() {
        let json = serde_json::to_string(&ResourceType::RdsInstances).unwrap();
        assert_eq!(json, "\"rds_instances\"");
    }

    #[test]
    fn test_actionable_mode() {
        let mut detection = crate::scenario::tests::sample_detection();
        assert!(detection.is_actionable());
        detection.mode = 1;
        assert!(!detection.is_actionable());
    }
}
