//! In-memory storage implementation

use crate::error::{StoreError, StoreResult};
use crate::traits::*;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pare_types::{
    AuditLogEntry, DetectionId, OptimizationPolicy, PolicyResource, Recommendation,
    RecommendationId, RecommendationStatus,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory storage for development and testing.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    recommendations: Arc<RwLock<HashMap<RecommendationId, Recommendation>>>,
    resources: Arc<RwLock<HashMap<String, PolicyResource>>>,
    audit_log: Arc<RwLock<Vec<AuditLogEntry>>>,
}

impl InMemoryStore {
    /// Create a new in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_active(map: &HashMap<RecommendationId, Recommendation>, detection_id: &DetectionId) -> bool {
    map.values()
        .any(|r| &r.detection_id == detection_id && r.status.is_non_terminal())
}

#[async_trait]
impl RecommendationStore for InMemoryStore {
    async fn get(&self, id: &RecommendationId) -> StoreResult<Option<Recommendation>> {
        let recs = self.recommendations.read().await;
        Ok(recs.get(id).cloned())
    }

    async fn list(&self, filter: &RecommendationFilter) -> StoreResult<Vec<Recommendation>> {
        let recs = self.recommendations.read().await;
        let mut matched: Vec<Recommendation> =
            recs.values().filter(|r| filter.matches(r)).cloned().collect();
        matched.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let offset = filter.offset.min(matched.len());
        let mut page = matched.split_off(offset);
        if let Some(limit) = filter.limit {
            page.truncate(limit);
        }
        Ok(page)
    }

    async fn insert(&self, rec: Recommendation) -> StoreResult<()> {
        let mut recs = self.recommendations.write().await;
        if recs.contains_key(&rec.id) {
            return Err(StoreError::Conflict(format!(
                "recommendation {} already exists",
                rec.id
            )));
        }
        recs.insert(rec.id.clone(), rec);
        Ok(())
    }

    async fn insert_if_absent(&self, rec: Recommendation) -> StoreResult<bool> {
        // Check and insert under one write lock.
        let mut recs = self.recommendations.write().await;
        if has_active(&recs, &rec.detection_id) {
            return Ok(false);
        }
        recs.insert(rec.id.clone(), rec);
        Ok(true)
    }

    async fn insert_batch_if_absent(
        &self,
        batch: Vec<Recommendation>,
    ) -> StoreResult<BatchInsertReport> {
        let mut recs = self.recommendations.write().await;
        let mut report = BatchInsertReport::default();
        let mut seen: HashSet<DetectionId> = HashSet::new();

        for rec in batch {
            if has_active(&recs, &rec.detection_id) || !seen.insert(rec.detection_id.clone()) {
                report.skipped_duplicates += 1;
                continue;
            }
            report.inserted.push(rec.id.clone());
            recs.insert(rec.id.clone(), rec);
        }

        tracing::debug!(
            inserted = report.inserted.len(),
            skipped = report.skipped_duplicates,
            "batch insert finished"
        );
        Ok(report)
    }

    async fn update(&self, rec: Recommendation) -> StoreResult<()> {
        let mut recs = self.recommendations.write().await;
        if !recs.contains_key(&rec.id) {
            return Err(StoreError::NotFound(format!("recommendation {}", rec.id)));
        }
        recs.insert(rec.id.clone(), rec);
        Ok(())
    }

    async fn delete(&self, id: &RecommendationId) -> StoreResult<bool> {
        let mut recs = self.recommendations.write().await;
        Ok(recs.remove(id).is_some())
    }

    async fn has_active_for_detection(&self, detection_id: &DetectionId) -> StoreResult<bool> {
        let recs = self.recommendations.read().await;
        Ok(has_active(&recs, detection_id))
    }

    async fn list_expired_snoozes(&self, now: DateTime<Utc>) -> StoreResult<Vec<Recommendation>> {
        let recs = self.recommendations.read().await;
        Ok(recs
            .values()
            .filter(|r| {
                r.status == RecommendationStatus::Snoozed
                    && r.snoozed_until.map(|until| until < now).unwrap_or(false)
            })
            .cloned()
            .collect())
    }

    async fn list_due_scheduled(&self, now: DateTime<Utc>) -> StoreResult<Vec<Recommendation>> {
        let recs = self.recommendations.read().await;
        let mut due: Vec<Recommendation> = recs
            .values()
            .filter(|r| {
                r.status == RecommendationStatus::Scheduled
                    && r.scheduled_for.map(|at| at < now).unwrap_or(false)
            })
            .cloned()
            .collect();
        // Oldest first keeps the audit log's temporal ordering stable.
        due.sort_by(|a, b| a.scheduled_for.cmp(&b.scheduled_for));
        Ok(due)
    }

    async fn claim_due(
        &self,
        id: &RecommendationId,
        now: DateTime<Utc>,
        actor: &str,
    ) -> StoreResult<bool> {
        let mut recs = self.recommendations.write().await;
        let Some(rec) = recs.get_mut(id) else {
            return Ok(false);
        };
        let still_due = rec.status == RecommendationStatus::Scheduled
            && rec.scheduled_for.map(|at| at < now).unwrap_or(false);
        if !still_due {
            return Ok(false);
        }
        rec.status = RecommendationStatus::Approved;
        rec.actioned_by = Some(actor.to_string());
        rec.updated_at = now;
        Ok(true)
    }
}

#[async_trait]
impl PolicyResourceStore for InMemoryStore {
    async fn get_resource(&self, id: &str) -> StoreResult<Option<PolicyResource>> {
        let resources = self.resources.read().await;
        Ok(resources.get(id).cloned())
    }

    async fn list_resources(&self) -> StoreResult<Vec<PolicyResource>> {
        let resources = self.resources.read().await;
        let mut all: Vec<PolicyResource> = resources.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn upsert_resource(&self, resource: PolicyResource) -> StoreResult<()> {
        let mut resources = self.resources.write().await;
        resources.insert(resource.id.clone(), resource);
        Ok(())
    }

    async fn set_policy(
        &self,
        id: &str,
        policy: OptimizationPolicy,
    ) -> StoreResult<OptimizationPolicy> {
        let mut resources = self.resources.write().await;
        let resource = resources
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("resource {}", id)))?;
        let previous = resource.optimization_policy;
        resource.optimization_policy = policy;
        Ok(previous)
    }
}

#[async_trait]
impl AuditLogStore for InMemoryStore {
    async fn append(&self, entry: AuditLogEntry) -> StoreResult<()> {
        let mut log = self.audit_log.write().await;
        log.push(entry);
        Ok(())
    }

    async fn list_entries(&self, filter: &AuditFilter) -> StoreResult<Vec<AuditLogEntry>> {
        let log = self.audit_log.read().await;
        let mut matched: Vec<AuditLogEntry> =
            log.iter().filter(|e| filter.matches(e)).cloned().collect();
        if let Some(limit) = filter.limit {
            let start = matched.len().saturating_sub(limit);
            matched = matched.split_off(start);
        }
        Ok(matched)
    }

    async fn list_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<AuditLogEntry>> {
        let log = self.audit_log.read().await;
        Ok(log
            .iter()
            .filter(|e| e.executed_at >= since)
            .cloned()
            .collect())
    }
}
