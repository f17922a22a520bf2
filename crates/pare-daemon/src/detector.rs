//! Fixture detector for development
//!
//! The production detector lives with the scanning service; the daemon
//! only needs something that satisfies the `Detector` seam so the full
//! pipeline can be driven locally. Detection ids are minted once per
//! process so repeated scans dedup the way a real scanner's stable ids
//! would.

use async_trait::async_trait;
use pare_engine::{Detector, DetectorError};
use pare_types::{
    Detection, DetectionId, Env, ResourceAction, ResourceType, ScenarioDetails, ACTIONABLE_MODE,
};

/// Static detection set exercising every scenario.
pub struct FixtureDetector {
    detections: Vec<Detection>,
}

impl Default for FixtureDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl FixtureDetector {
    pub fn new() -> Self {
        let account = "123456789012";
        let detections = vec![
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::IdleRds {
                    avg_connections_7d: 0.4,
                    cpu_avg_7d: 2.1,
                    instance_class: "db.r5.large".to_string(),
                },
                resource_type: ResourceType::RdsInstances,
                resource_id: "db-0f3a9c".to_string(),
                resource_name: "orders-replica".to_string(),
                account_id: account.to_string(),
                region: "us-east-1".to_string(),
                env: Env::Production,
                action: ResourceAction::StopInstance,
                monthly_cost: 540.0,
                potential_savings: 540.0,
                confidence: 91,
                mode: ACTIONABLE_MODE,
            },
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::OversizedEc2 {
                    instance_type: "m5.4xlarge".to_string(),
                    recommended_type: "m5.xlarge".to_string(),
                    cpu_p95_14d: 9.6,
                },
                resource_type: ResourceType::Ec2Instances,
                resource_id: "i-0b7d21".to_string(),
                resource_name: "batch-worker-2".to_string(),
                account_id: account.to_string(),
                region: "us-east-1".to_string(),
                env: Env::Staging,
                action: ResourceAction::ResizeInstance,
                monthly_cost: 560.0,
                potential_savings: 420.0,
                confidence: 84,
                mode: ACTIONABLE_MODE,
            },
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::UnattachedEbs {
                    volume_type: "gp2".to_string(),
                    size_gb: 800,
                    days_unattached: 75,
                },
                resource_type: ResourceType::EbsVolumes,
                resource_id: "vol-0c881e".to_string(),
                resource_name: "jenkins-scratch".to_string(),
                account_id: account.to_string(),
                region: "us-west-2".to_string(),
                env: Env::Development,
                action: ResourceAction::DeleteVolume,
                monthly_cost: 80.0,
                potential_savings: 80.0,
                confidence: 99,
                mode: ACTIONABLE_MODE,
            },
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::IdleElasticache {
                    engine: "redis".to_string(),
                    node_type: "cache.r6g.large".to_string(),
                    avg_cache_hits_7d: 3.2,
                },
                resource_type: ResourceType::ElasticacheClusters,
                resource_id: "cc-1a2b3c".to_string(),
                resource_name: "session-cache-old".to_string(),
                account_id: account.to_string(),
                region: "eu-west-1".to_string(),
                env: Env::Staging,
                action: ResourceAction::DeleteCluster,
                monthly_cost: 190.0,
                potential_savings: 190.0,
                confidence: 88,
                mode: ACTIONABLE_MODE,
            },
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::StaleSnapshots {
                    size_gb: 1200,
                    age_days: 400,
                    source_volume_id: "vol-0aa014".to_string(),
                },
                resource_type: ResourceType::EbsSnapshots,
                resource_id: "snap-07fe44".to_string(),
                resource_name: "pg-backup-2024".to_string(),
                account_id: account.to_string(),
                region: "us-east-1".to_string(),
                env: Env::Development,
                action: ResourceAction::DeleteSnapshot,
                monthly_cost: 60.0,
                potential_savings: 60.0,
                confidence: 97,
                mode: ACTIONABLE_MODE,
            },
            // Advisory pass output; never becomes a recommendation.
            Detection {
                id: DetectionId::generate(),
                details: ScenarioDetails::OversizedEc2 {
                    instance_type: "c5.2xlarge".to_string(),
                    recommended_type: "c5.xlarge".to_string(),
                    cpu_p95_14d: 31.0,
                },
                resource_type: ResourceType::Ec2Instances,
                resource_id: "i-0e99f0".to_string(),
                resource_name: "api-canary".to_string(),
                account_id: account.to_string(),
                region: "us-east-1".to_string(),
                env: Env::Production,
                action: ResourceAction::ResizeInstance,
                monthly_cost: 250.0,
                potential_savings: 125.0,
                confidence: 45,
                mode: 2,
            },
        ];

        Self { detections }
    }
}

#[async_trait]
impl Detector for FixtureDetector {
    async fn detect_all(&self) -> Result<Vec<Detection>, DetectorError> {
        Ok(self.detections.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixture_ids_stable_across_scans() {
        let detector = FixtureDetector::new();
        let first = detector.detect_all().await.unwrap();
        let second = detector.detect_all().await.unwrap();
        assert_eq!(first[0].id, second[0].id);
    }

    #[tokio::test]
    async fn test_fixture_includes_non_actionable_mode() {
        let detector = FixtureDetector::new();
        let detections = detector.detect_all().await.unwrap();
        assert!(detections.iter().any(|d| !d.is_actionable()));
        assert!(detections.iter().filter(|d| d.is_actionable()).count() >= 5);
    }
}
