//! Summary and audit-stat aggregation

use crate::error::Result;
use chrono::{DateTime, Utc};
use pare_store::{AuditLogStore, RecommendationFilter, RecommendationStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Aggregate view of the recommendation backlog.
///
/// Counts cover every row; the savings breakdowns only count
/// non-terminal rows — executed and rejected work no longer represents
/// addressable waste.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryReport {
    pub total: usize,
    pub by_status: BTreeMap<String, usize>,
    pub active_count: usize,
    pub active_potential_savings: f64,
    pub savings_by_resource_type: BTreeMap<String, f64>,
    pub savings_by_scenario: BTreeMap<String, f64>,
}

/// Build the backlog summary.
pub async fn summarize(store: &dyn RecommendationStore) -> Result<SummaryReport> {
    let recs = store.list(&RecommendationFilter::all()).await?;

    let mut report = SummaryReport {
        total: recs.len(),
        ..SummaryReport::default()
    };

    for rec in &recs {
        *report
            .by_status
            .entry(rec.status.as_str().to_string())
            .or_insert(0) += 1;

        if rec.status.is_non_terminal() {
            report.active_count += 1;
            report.active_potential_savings += rec.potential_savings;
            *report
                .savings_by_resource_type
                .entry(rec.resource_type.as_str().to_string())
                .or_insert(0.0) += rec.potential_savings;
            *report
                .savings_by_scenario
                .entry(rec.scenario.scenario_id().to_string())
                .or_insert(0.0) += rec.potential_savings;
        }
    }

    Ok(report)
}

/// One day's worth of execution activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditStatBucket {
    /// UTC day, `YYYY-MM-DD`.
    pub date: String,
    pub attempts: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Sum of potential_savings of the recommendations executed
    /// successfully that day.
    pub savings_realized: f64,
}

/// Bucket audit entries since `since` by UTC day, oldest bucket first.
///
/// Realized savings come from each entry's recommendation row, so the
/// figure reflects the estimate in force when the action ran.
pub async fn audit_stats(
    audit: &dyn AuditLogStore,
    recs: &dyn RecommendationStore,
    since: DateTime<Utc>,
) -> Result<Vec<AuditStatBucket>> {
    let entries = audit.list_since(since).await?;

    let mut buckets: BTreeMap<String, AuditStatBucket> = BTreeMap::new();
    for entry in entries {
        let date = entry.executed_at.format("%Y-%m-%d").to_string();
        let bucket = buckets.entry(date.clone()).or_insert_with(|| AuditStatBucket {
            date,
            ..AuditStatBucket::default()
        });

        bucket.attempts += 1;
        if entry.success {
            bucket.succeeded += 1;
            if let Some(rec) = recs.get(&entry.recommendation_id).await? {
                bucket.savings_realized += rec.potential_savings;
            }
        } else {
            bucket.failed += 1;
        }
    }

    Ok(buckets.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creator::RecommendationCreator;
    use chrono::Duration;
    use pare_store::InMemoryStore;
    use pare_types::{
        AuditEntryId, AuditLogEntry, Detection, DetectionId, Env, RecommendationStatus,
        ResourceAction, ResourceType, ScenarioDetails,
    };
    use std::sync::Arc;

    fn detection(savings: f64, resource_type: ResourceType) -> Detection {
        let details = match resource_type {
            ResourceType::EbsVolumes => ScenarioDetails::UnattachedEbs {
                volume_type: "gp3".to_string(),
                size_gb: 100,
                days_unattached: 20,
            },
            _ => ScenarioDetails::IdleRds {
                avg_connections_7d: 0.1,
                cpu_avg_7d: 2.0,
                instance_class: "db.t3.medium".to_string(),
            },
        };
        Detection {
            id: DetectionId::generate(),
            details,
            resource_type,
            resource_id: "r-1".to_string(),
            resource_name: "thing".to_string(),
            account_id: "123456789012".to_string(),
            region: "us-east-1".to_string(),
            env: Env::Development,
            action: ResourceAction::DeleteVolume,
            monthly_cost: savings * 1.2,
            potential_savings: savings,
            confidence: 80,
            mode: 3,
        }
    }

    #[tokio::test]
    async fn test_summary_counts_and_breakdowns() {
        let store = Arc::new(InMemoryStore::new());
        let creator = RecommendationCreator::new(store.clone());

        let a = creator
            .create_one(detection(120.0, ResourceType::RdsInstances), "scanner")
            .await
            .unwrap()
            .unwrap();
        creator
            .create_one(detection(60.0, ResourceType::EbsVolumes), "scanner")
            .await
            .unwrap()
            .unwrap();

        // Reject one; it should leave the breakdowns but stay counted.
        let mut rejected = store.get(&a.id).await.unwrap().unwrap();
        rejected.status = RecommendationStatus::Rejected;
        store.update(rejected).await.unwrap();

        let report = summarize(store.as_ref()).await.unwrap();
        assert_eq!(report.total, 2);
        assert_eq!(report.by_status["rejected"], 1);
        assert_eq!(report.by_status["pending"], 1);
        assert_eq!(report.active_count, 1);
        assert!((report.active_potential_savings - 60.0).abs() < f64::EPSILON);
        assert!(!report.savings_by_resource_type.contains_key("rds_instances"));
        assert!((report.savings_by_resource_type["ebs_volumes"] - 60.0).abs() < f64::EPSILON);
        assert!((report.savings_by_scenario["unattached_ebs"] - 60.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_audit_stats_buckets_by_day() {
        let store = Arc::new(InMemoryStore::new());
        let creator = RecommendationCreator::new(store.clone());
        let rec = creator
            .create_one(detection(150.0, ResourceType::RdsInstances), "scanner")
            .await
            .unwrap()
            .unwrap();

        let now = Utc::now();
        let entry = |success: bool, at: DateTime<Utc>| AuditLogEntry {
            id: AuditEntryId::generate(),
            action: rec.action,
            resource_type: rec.resource_type,
            resource_id: rec.resource_id.clone(),
            resource_name: rec.resource_name.clone(),
            scenario_id: rec.scenario.scenario_id().to_string(),
            detection_id: rec.detection_id.clone(),
            recommendation_id: rec.id.clone(),
            success,
            message: "t".to_string(),
            previous_state: serde_json::json!({}),
            new_state: serde_json::json!({}),
            executed_at: at,
            duration_ms: 3,
            executed_by: "t".to_string(),
        };

        store.append(entry(true, now)).await.unwrap();
        store.append(entry(false, now)).await.unwrap();
        store
            .append(entry(true, now - Duration::days(1)))
            .await
            .unwrap();

        let stats = audit_stats(
            store.as_ref(),
            store.as_ref(),
            now - Duration::days(7),
        )
        .await
        .unwrap();

        assert_eq!(stats.len(), 2);
        // Oldest bucket first.
        assert_eq!(stats[0].attempts, 1);
        assert_eq!(stats[1].attempts, 2);
        assert_eq!(stats[1].succeeded, 1);
        assert_eq!(stats[1].failed, 1);
        assert!((stats[1].savings_realized - 150.0).abs() < f64::EPSILON);
    }
}
