//! Storage trait definitions

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pare_types::{
    AuditLogEntry, DetectionId, ImpactLevel, OptimizationPolicy, PolicyResource, Recommendation,
    RecommendationId, RecommendationStatus, ResourceType,
};
use serde::{Deserialize, Serialize};

/// Filter for listing recommendations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationFilter {
    /// Match any of these statuses; `None` matches all.
    pub statuses: Option<Vec<RecommendationStatus>>,
    pub scenario_id: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub impact_level: Option<ImpactLevel>,
    pub limit: Option<usize>,
    pub offset: usize,
}

impl RecommendationFilter {
    /// Filter matching every row.
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter matching a single status.
    pub fn with_status(status: RecommendationStatus) -> Self {
        Self {
            statuses: Some(vec![status]),
            ..Self::default()
        }
    }

    pub fn matches(&self, rec: &Recommendation) -> bool {
        if let Some(statuses) = &self.statuses {
            if !statuses.contains(&rec.status) {
                return false;
            }
        }
        if let Some(scenario_id) = &self.scenario_id {
            if rec.scenario.scenario_id() != scenario_id {
                return false;
            }
        }
        if let Some(resource_type) = self.resource_type {
            if rec.resource_type != resource_type {
                return false;
            }
        }
        if let Some(impact) = self.impact_level {
            if rec.impact_level != impact {
                return false;
            }
        }
        true
    }
}

/// Result of an atomic batch insert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchInsertReport {
    pub inserted: Vec<RecommendationId>,
    pub skipped_duplicates: usize,
}

/// Storage for recommendations.
#[async_trait]
pub trait RecommendationStore: Send + Sync {
    /// Get a recommendation by ID.
    async fn get(&self, id: &RecommendationId) -> StoreResult<Option<Recommendation>>;

    /// List recommendations matching a filter, newest first.
    async fn list(&self, filter: &RecommendationFilter) -> StoreResult<Vec<Recommendation>>;

    /// Insert a new recommendation; conflicts on a duplicate ID.
    async fn insert(&self, rec: Recommendation) -> StoreResult<()>;

    /// Insert unless a non-terminal recommendation already exists for the
    /// same detection id. Returns whether the row was inserted. Atomic:
    /// the existence check and the insert happen under one store lock.
    async fn insert_if_absent(&self, rec: Recommendation) -> StoreResult<bool>;

    /// Batch variant of [`insert_if_absent`]: the whole batch is checked
    /// and written atomically — a failure writes nothing.
    ///
    /// [`insert_if_absent`]: RecommendationStore::insert_if_absent
    async fn insert_batch_if_absent(
        &self,
        recs: Vec<Recommendation>,
    ) -> StoreResult<BatchInsertReport>;

    /// Replace an existing recommendation; `NotFound` if absent.
    async fn update(&self, rec: Recommendation) -> StoreResult<()>;

    /// Delete a recommendation by ID.
    async fn delete(&self, id: &RecommendationId) -> StoreResult<bool>;

    /// Whether a non-terminal recommendation exists for this detection.
    async fn has_active_for_detection(&self, detection_id: &DetectionId) -> StoreResult<bool>;

    /// Snoozed rows whose snoozed_until is strictly before `now`.
    async fn list_expired_snoozes(&self, now: DateTime<Utc>) -> StoreResult<Vec<Recommendation>>;

    /// Scheduled rows whose scheduled_for is strictly before `now`.
    async fn list_due_scheduled(&self, now: DateTime<Utc>) -> StoreResult<Vec<Recommendation>>;

    /// Claim a due scheduled row for execution: atomically move it to
    /// `approved` if (and only if) it is still scheduled and still due.
    /// Returns false when another sweep instance won the claim or the row
    /// is no longer due.
    async fn claim_due(
        &self,
        id: &RecommendationId,
        now: DateTime<Utc>,
        actor: &str,
    ) -> StoreResult<bool>;
}

/// Storage for the policy view of cloud resources.
#[async_trait]
pub trait PolicyResourceStore: Send + Sync {
    /// Get a resource by provider id.
    async fn get_resource(&self, id: &str) -> StoreResult<Option<PolicyResource>>;

    /// List all resources.
    async fn list_resources(&self) -> StoreResult<Vec<PolicyResource>>;

    /// Create or replace a resource view.
    async fn upsert_resource(&self, resource: PolicyResource) -> StoreResult<()>;

    /// Write a new optimization policy; returns the previous value.
    /// Callers run the lock validator first — this is the write, not the
    /// gate.
    async fn set_policy(
        &self,
        id: &str,
        policy: OptimizationPolicy,
    ) -> StoreResult<OptimizationPolicy>;
}

/// Filter for reading the audit log.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilter {
    pub resource_id: Option<String>,
    pub recommendation_id: Option<RecommendationId>,
    pub success: Option<bool>,
    pub limit: Option<usize>,
}

impl AuditFilter {
    pub fn matches(&self, entry: &AuditLogEntry) -> bool {
        if let Some(resource_id) = &self.resource_id {
            if &entry.resource_id != resource_id {
                return false;
            }
        }
        if let Some(rec_id) = &self.recommendation_id {
            if &entry.recommendation_id != rec_id {
                return false;
            }
        }
        if let Some(success) = self.success {
            if entry.success != success {
                return false;
            }
        }
        true
    }
}

/// Append-only storage for audit log entries.
///
/// There is deliberately no update or delete.
#[async_trait]
pub trait AuditLogStore: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: AuditLogEntry) -> StoreResult<()>;

    /// Read entries matching a filter, oldest first.
    async fn list_entries(&self, filter: &AuditFilter) -> StoreResult<Vec<AuditLogEntry>>;

    /// Read entries executed at or after `since`, oldest first.
    async fn list_since(&self, since: DateTime<Utc>) -> StoreResult<Vec<AuditLogEntry>>;
}
