//! Lifecycle service - the gated transitions
//!
//! Every status change loads the row, consults the transition table, and
//! writes back through the store. Execution goes through the
//! `ActionExecutor`; its `success = false` outcomes are normal results,
//! not errors.

use crate::error::{EngineError, Result};
use crate::transition::{self, TransitionEvent};
use chrono::{DateTime, Duration, Utc};
use pare_executor::{ActionExecutor, ExecutionRequest};
use pare_store::{RecommendationFilter, RecommendationStore};
use pare_types::{
    ExecutionOutcome, Recommendation, RecommendationId, RecommendationStatus,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Actor recorded on sweep-driven transitions.
pub const SCHEDULER_ACTOR: &str = "scheduler";

/// Snooze window bounds, inclusive, in days.
const SNOOZE_MIN_DAYS: i64 = 1;
const SNOOZE_MAX_DAYS: i64 = 30;

/// Fields the `update()` escape hatch may touch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateRequest {
    pub user_notes: Option<String>,
    /// Administrative status override; still validated against the
    /// transition table, and `executed` is never reachable this way.
    pub status: Option<RecommendationStatus>,
}

/// Outcome of one item in an execute-all run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteItemOutcome {
    pub recommendation_id: RecommendationId,
    pub success: bool,
    pub message: String,
}

/// Aggregated result of an execute-all run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteAllReport {
    pub executed: usize,
    pub failed: usize,
    pub items: Vec<ExecuteItemOutcome>,
}

/// Drives recommendations through their legal transitions.
pub struct LifecycleService {
    store: Arc<dyn RecommendationStore>,
    executor: Arc<ActionExecutor>,
}

impl LifecycleService {
    pub fn new(store: Arc<dyn RecommendationStore>, executor: Arc<ActionExecutor>) -> Self {
        Self { store, executor }
    }

    /// pending|snoozed → approved.
    pub async fn approve(&self, id: &RecommendationId, actor: &str) -> Result<Recommendation> {
        let mut rec = self.load(id).await?;
        self.transition(&mut rec, TransitionEvent::Approve, actor)?;
        rec.snoozed_until = None;
        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// any non-terminal → rejected.
    pub async fn reject(
        &self,
        id: &RecommendationId,
        reason: Option<String>,
        actor: &str,
    ) -> Result<Recommendation> {
        let mut rec = self.load(id).await?;
        self.transition(&mut rec, TransitionEvent::Reject, actor)?;
        rec.rejection_reason = reason;
        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// pending → snoozed for `days` (integer, 1-30 inclusive). Invalid
    /// days are rejected before any write.
    pub async fn snooze(
        &self,
        id: &RecommendationId,
        days: i64,
        actor: &str,
    ) -> Result<Recommendation> {
        if !(SNOOZE_MIN_DAYS..=SNOOZE_MAX_DAYS).contains(&days) {
            return Err(EngineError::Validation(format!(
                "snooze days must be between {} and {}, got {}",
                SNOOZE_MIN_DAYS, SNOOZE_MAX_DAYS, days
            )));
        }

        let mut rec = self.load(id).await?;
        self.transition(&mut rec, TransitionEvent::Snooze, actor)?;
        rec.snoozed_until = Some(Utc::now() + Duration::days(days));
        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// pending|approved → scheduled for a future instant.
    pub async fn schedule(
        &self,
        id: &RecommendationId,
        when: DateTime<Utc>,
        actor: &str,
    ) -> Result<Recommendation> {
        if when <= Utc::now() {
            return Err(EngineError::Validation(format!(
                "scheduled_for {} is not in the future",
                when
            )));
        }

        let mut rec = self.load(id).await?;
        self.transition(&mut rec, TransitionEvent::Schedule, actor)?;
        rec.scheduled_for = Some(when);
        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// snoozed → pending, sweep-driven.
    pub async fn unsnooze(&self, id: &RecommendationId) -> Result<Recommendation> {
        let mut rec = self.load(id).await?;
        self.transition(&mut rec, TransitionEvent::Unsnooze, SCHEDULER_ACTOR)?;
        rec.snoozed_until = None;
        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// approved|scheduled → executed (on executor success).
    ///
    /// Any other starting status is rejected before the executor runs:
    /// no side effects, no audit entry. On executor failure the row
    /// returns to `approved` and the outcome is recorded on it for
    /// diagnosis.
    pub async fn execute(
        &self,
        id: &RecommendationId,
        actor: &str,
    ) -> Result<(Recommendation, ExecutionOutcome)> {
        let mut rec = self.load(id).await?;

        // Legality check up front; the executor must not run (and must
        // not audit) an illegal request.
        transition::apply(rec.status, TransitionEvent::Execute)?;

        let request = ExecutionRequest {
            recommendation_id: rec.id.clone(),
            detection_id: rec.detection_id.clone(),
            scenario_id: rec.scenario.scenario_id().to_string(),
            action: rec.action,
            resource_type: rec.resource_type,
            resource_id: rec.resource_id.clone(),
            resource_name: rec.resource_name.clone(),
            details: serde_json::to_value(&rec.scenario)
                .map_err(|e| EngineError::Validation(e.to_string()))?,
            executed_by: actor.to_string(),
        };

        let outcome = self.executor.execute(&request).await;

        if outcome.success {
            rec.status = transition::apply(rec.status, TransitionEvent::Execute)?;
            rec.executed_at = Some(outcome.executed_at);
        } else {
            // Pre-execute state, normalized: a failed scheduled item
            // lands on approved so the sweep does not re-fire it.
            rec.status = RecommendationStatus::Approved;
        }
        rec.execution_result = Some(outcome.clone());
        rec.actioned_by = Some(actor.to_string());
        rec.updated_at = Utc::now();
        self.store.update(rec.clone()).await?;

        Ok((rec, outcome))
    }

    /// The escape hatch: free-text notes and administrative status
    /// overrides. Notes are always writable, terminal rows included; a
    /// status value must have a legal path in the transition table.
    pub async fn update(
        &self,
        id: &RecommendationId,
        request: UpdateRequest,
        actor: &str,
    ) -> Result<Recommendation> {
        let mut rec = self.load(id).await?;

        if let Some(status) = request.status {
            if status != rec.status {
                let event = transition::override_event(rec.status, status)?;
                tracing::warn!(
                    recommendation_id = %rec.id,
                    from = %rec.status,
                    to = %status,
                    actor,
                    "status override via update"
                );
                self.transition(&mut rec, event, actor)?;
                rec.snoozed_until = None;
            }
        }

        if let Some(notes) = request.user_notes {
            rec.user_notes = Some(notes);
            rec.updated_at = Utc::now();
        }

        self.store.update(rec.clone()).await?;
        Ok(rec)
    }

    /// Execute every approved recommendation, strictly sequentially,
    /// oldest first. One failing item never aborts the rest.
    pub async fn execute_all(&self, actor: &str) -> Result<ExecuteAllReport> {
        let mut approved = self
            .store
            .list(&RecommendationFilter::with_status(RecommendationStatus::Approved))
            .await?;
        approved.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut report = ExecuteAllReport::default();
        for rec in approved {
            match self.execute(&rec.id, actor).await {
                Ok((_, outcome)) => {
                    if outcome.success {
                        report.executed += 1;
                    } else {
                        report.failed += 1;
                    }
                    report.items.push(ExecuteItemOutcome {
                        recommendation_id: rec.id,
                        success: outcome.success,
                        message: outcome.message,
                    });
                }
                Err(e) => {
                    report.failed += 1;
                    report.items.push(ExecuteItemOutcome {
                        recommendation_id: rec.id,
                        success: false,
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    async fn load(&self, id: &RecommendationId) -> Result<Recommendation> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("recommendation {}", id)))
    }

    /// Apply one event through the table and stamp the bookkeeping
    /// fields.
    fn transition(
        &self,
        rec: &mut Recommendation,
        event: TransitionEvent,
        actor: &str,
    ) -> Result<()> {
        let to = transition::apply(rec.status, event)?;
        tracing::debug!(
            recommendation_id = %rec.id,
            from = %rec.status,
            to = %to,
            event = %event,
            actor,
            "recommendation transition"
        );
        rec.status = to;
        rec.actioned_by = Some(actor.to_string());
        rec.updated_at = Utc::now();
        Ok(())
    }
}
