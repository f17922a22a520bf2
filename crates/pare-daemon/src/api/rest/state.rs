//! Application state for API handlers

use crate::scheduler::SweepScheduler;
use pare_engine::{Detector, LifecycleService, PolicyAdmin, RecommendationCreator};
use pare_store::{AuditLogStore, PolicyResourceStore, RecommendationStore};
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Recommendation rows
    pub recommendations: Arc<dyn RecommendationStore>,

    /// Policy view of cloud resources
    pub resources: Arc<dyn PolicyResourceStore>,

    /// Append-only audit trail
    pub audit: Arc<dyn AuditLogStore>,

    /// Lifecycle transitions
    pub lifecycle: Arc<LifecycleService>,

    /// Detection → recommendation creation
    pub creator: Arc<RecommendationCreator>,

    /// Policy mutations (single/bulk/preset)
    pub policy_admin: Arc<PolicyAdmin>,

    /// Waste scanner collaborator
    pub detector: Arc<dyn Detector>,

    /// Sweep scheduler handle
    pub scheduler: Arc<SweepScheduler>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}
