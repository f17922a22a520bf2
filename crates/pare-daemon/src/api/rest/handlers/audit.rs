//! Audit log handlers

use super::recommendations::parse_recommendation_id;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Query, State},
    Json,
};
use chrono::{Duration, Utc};
use pare_engine::{audit_stats as compute_audit_stats, AuditStatBucket};
use pare_store::AuditFilter;
use pare_types::AuditLogEntry;
use serde::Deserialize;

/// Audit list query
#[derive(Debug, Default, Deserialize)]
pub struct AuditQuery {
    pub resource_id: Option<String>,
    pub recommendation_id: Option<String>,
    pub success: Option<bool>,
    pub limit: Option<usize>,
}

/// List audit log entries, oldest first
pub async fn list_audit(
    State(state): State<AppState>,
    Query(query): Query<AuditQuery>,
) -> ApiResult<Json<Vec<AuditLogEntry>>> {
    let recommendation_id = match query.recommendation_id.as_deref() {
        Some(raw) => Some(parse_recommendation_id(raw)?),
        None => None,
    };

    let filter = AuditFilter {
        resource_id: query.resource_id,
        recommendation_id,
        success: query.success,
        limit: query.limit,
    };

    let entries = state.audit.list_entries(&filter).await?;
    Ok(Json(entries))
}

/// Stats query
#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Look-back window in days; defaults to 30.
    #[serde(default = "default_days")]
    pub days: i64,
}

fn default_days() -> i64 {
    30
}

/// Time-bucketed execution counters
pub async fn audit_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<Vec<AuditStatBucket>>> {
    let since = Utc::now() - Duration::days(query.days.max(0));
    let buckets = compute_audit_stats(
        state.audit.as_ref(),
        state.recommendations.as_ref(),
        since,
    )
    .await?;
    Ok(Json(buckets))
}
