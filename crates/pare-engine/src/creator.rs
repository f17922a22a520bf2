//! Recommendation creator
//!
//! Converts detections into pending recommendations. Only mode-3
//! (actionable) detections qualify; dedup against existing non-terminal
//! rows happens atomically inside the store.

use crate::error::{EngineError, Result};
use chrono::Utc;
use pare_store::RecommendationStore;
use pare_types::{
    Detection, ImpactLevel, Recommendation, RecommendationId, RecommendationStatus, RiskLevel,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a creation run did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreationReport {
    pub created: Vec<RecommendationId>,
    /// Detections with an existing non-terminal recommendation.
    pub skipped_duplicates: usize,
    /// Detections filtered out for not being mode-3.
    pub skipped_mode: usize,
}

/// Builds recommendations from detections.
pub struct RecommendationCreator {
    store: Arc<dyn RecommendationStore>,
}

impl RecommendationCreator {
    pub fn new(store: Arc<dyn RecommendationStore>) -> Self {
        Self { store }
    }

    /// Create recommendations for a batch of detections.
    ///
    /// Non-actionable detections are filtered, survivors are built and
    /// handed to the store's atomic batch insert: the whole batch is
    /// written or nothing is, and duplicates are skipped under the same
    /// lock that inserts the rest.
    pub async fn create_batch(
        &self,
        detections: Vec<Detection>,
        created_by: &str,
    ) -> Result<CreationReport> {
        let total = detections.len();
        let actionable: Vec<Detection> =
            detections.into_iter().filter(|d| d.is_actionable()).collect();
        let skipped_mode = total - actionable.len();

        // Build every row before touching the store so a bad detection
        // aborts the batch with nothing written.
        let mut rows = Vec::with_capacity(actionable.len());
        for detection in &actionable {
            rows.push(build_recommendation(detection, created_by)?);
        }

        let inserted = self.store.insert_batch_if_absent(rows).await?;

        tracing::info!(
            created = inserted.inserted.len(),
            skipped_duplicates = inserted.skipped_duplicates,
            skipped_mode,
            "created recommendations from detections"
        );

        Ok(CreationReport {
            created: inserted.inserted,
            skipped_duplicates: inserted.skipped_duplicates,
            skipped_mode,
        })
    }

    /// Create a recommendation from a single detection. Returns `None`
    /// when an active recommendation already covers the detection.
    ///
    /// A non-actionable detection is an explicit validation error here:
    /// unlike a scan batch, a caller submitting one detection should hear
    /// why nothing was created.
    pub async fn create_one(
        &self,
        detection: Detection,
        created_by: &str,
    ) -> Result<Option<Recommendation>> {
        if !detection.is_actionable() {
            return Err(EngineError::Validation(format!(
                "detection mode {} is not actionable",
                detection.mode
            )));
        }

        let rec = build_recommendation(&detection, created_by)?;
        if self.store.insert_if_absent(rec.clone()).await? {
            Ok(Some(rec))
        } else {
            Ok(None)
        }
    }
}

/// Derive a pending recommendation from one detection.
fn build_recommendation(detection: &Detection, created_by: &str) -> Result<Recommendation> {
    if detection.confidence > 100 {
        return Err(EngineError::Validation(format!(
            "confidence {} out of range 0-100",
            detection.confidence
        )));
    }
    if detection.potential_savings < 0.0 || !detection.potential_savings.is_finite() {
        return Err(EngineError::Validation(format!(
            "potential savings {} must be a non-negative number",
            detection.potential_savings
        )));
    }

    let now = Utc::now();
    Ok(Recommendation {
        id: RecommendationId::generate(),
        detection_id: detection.id.clone(),
        scenario: detection.details.clone(),
        resource_type: detection.resource_type,
        resource_id: detection.resource_id.clone(),
        resource_name: detection.resource_name.clone(),
        account_id: detection.account_id.clone(),
        region: detection.region.clone(),
        env: detection.env,
        action: detection.action,
        title: detection.details.title(&detection.resource_name),
        description: detection.details.description(
            &detection.resource_name,
            detection.monthly_cost,
            detection.potential_savings,
        ),
        explanation: None,
        impact_level: ImpactLevel::from_savings(detection.potential_savings),
        confidence: detection.confidence,
        risk_level: RiskLevel::assess(detection.resource_type, detection.env),
        current_monthly_cost: detection.monthly_cost,
        potential_savings: detection.potential_savings,
        status: RecommendationStatus::Pending,
        snoozed_until: None,
        scheduled_for: None,
        rejection_reason: None,
        user_notes: None,
        executed_at: None,
        execution_result: None,
        created_at: now,
        updated_at: now,
        created_by: created_by.to_string(),
        actioned_by: None,
    })
}
