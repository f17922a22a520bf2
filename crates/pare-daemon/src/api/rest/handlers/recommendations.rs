//! Recommendation handlers

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use pare_engine::{summarize, ExecuteAllReport, SummaryReport, UpdateRequest};
use pare_store::RecommendationFilter;
use pare_types::{
    Detection, ExecutionOutcome, ImpactLevel, Recommendation, RecommendationId,
    RecommendationStatus, ResourceType,
};
use serde::{Deserialize, Serialize};

/// Default actor recorded when a request does not name one.
const DEFAULT_ACTOR: &str = "operator";

/// List query parameters
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    /// Single status or comma-separated set, e.g. `pending,snoozed`.
    pub status: Option<String>,
    pub scenario: Option<String>,
    pub resource_type: Option<ResourceType>,
    pub impact: Option<ImpactLevel>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl ListQuery {
    fn into_filter(self) -> ApiResult<RecommendationFilter> {
        let statuses = match self.status.as_deref() {
            None | Some("") => None,
            Some(raw) => {
                let mut parsed = Vec::new();
                for part in raw.split(',') {
                    let part = part.trim();
                    let status = RecommendationStatus::parse(part).ok_or_else(|| {
                        ApiError::BadRequest(format!("unknown status '{}'", part))
                    })?;
                    parsed.push(status);
                }
                Some(parsed)
            }
        };

        Ok(RecommendationFilter {
            statuses,
            scenario_id: self.scenario,
            resource_type: self.resource_type,
            impact_level: self.impact,
            limit: self.limit,
            offset: self.offset.unwrap_or(0),
        })
    }
}

/// List recommendations
pub async fn list_recommendations(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<Json<Vec<Recommendation>>> {
    let filter = query.into_filter()?;
    let recs = state.recommendations.list(&filter).await?;
    Ok(Json(recs))
}

/// Get a specific recommendation
pub async fn get_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let rec = state
        .recommendations
        .get(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("recommendation {} not found", id)))?;
    Ok(Json(rec))
}

/// Create recommendation request: one detection, optional creator tag.
#[derive(Debug, Deserialize)]
pub struct CreateRecommendationRequest {
    pub detection: Detection,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Create recommendation response
#[derive(Debug, Serialize)]
pub struct CreateRecommendationResponse {
    pub created: bool,
    pub recommendation: Option<Recommendation>,
}

/// Create a recommendation from a single detection.
///
/// `created = false` means an active recommendation already covers the
/// detection (dedup), which is not an error.
pub async fn create_recommendation(
    State(state): State<AppState>,
    Json(request): Json<CreateRecommendationRequest>,
) -> ApiResult<Json<CreateRecommendationResponse>> {
    let created_by = request.created_by.as_deref().unwrap_or(DEFAULT_ACTOR);
    let created = state
        .creator
        .create_one(request.detection, created_by)
        .await?;

    Ok(Json(CreateRecommendationResponse {
        created: created.is_some(),
        recommendation: created,
    }))
}

/// Update (escape hatch): user notes and validated status overrides.
pub async fn update_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<UpdateRequest>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let rec = state.lifecycle.update(&id, request, DEFAULT_ACTOR).await?;
    Ok(Json(rec))
}

/// Delete recommendation response
#[derive(Debug, Serialize)]
pub struct DeleteRecommendationResponse {
    pub deleted: bool,
}

/// Delete a recommendation
pub async fn delete_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteRecommendationResponse>> {
    let id = parse_recommendation_id(&id)?;
    let deleted = state.recommendations.delete(&id).await?;
    if deleted {
        tracing::info!(recommendation_id = %id, "deleted recommendation");
    }
    Ok(Json(DeleteRecommendationResponse { deleted }))
}

/// Optional actor attribution for transition requests.
#[derive(Debug, Default, Deserialize)]
pub struct ActionRequest {
    #[serde(default)]
    pub actor: Option<String>,
}

impl ActionRequest {
    fn actor(&self) -> &str {
        self.actor.as_deref().unwrap_or(DEFAULT_ACTOR)
    }
}

/// Approve a recommendation
pub async fn approve_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ActionRequest>>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let rec = state.lifecycle.approve(&id, request.actor()).await?;
    Ok(Json(rec))
}

/// Reject request
#[derive(Debug, Default, Deserialize)]
pub struct RejectRequest {
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Reject a recommendation
pub async fn reject_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<RejectRequest>>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let actor = request.actor.as_deref().unwrap_or(DEFAULT_ACTOR).to_string();
    let rec = state.lifecycle.reject(&id, request.reason, &actor).await?;
    Ok(Json(rec))
}

/// Snooze request
#[derive(Debug, Deserialize)]
pub struct SnoozeRequest {
    pub days: i64,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Snooze a recommendation for 1-30 days
pub async fn snooze_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SnoozeRequest>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let actor = request.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
    let rec = state.lifecycle.snooze(&id, request.days, actor).await?;
    Ok(Json(rec))
}

/// Schedule request
#[derive(Debug, Deserialize)]
pub struct ScheduleRequest {
    pub scheduled_for: DateTime<Utc>,
    #[serde(default)]
    pub actor: Option<String>,
}

/// Schedule a recommendation for automatic execution
pub async fn schedule_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ScheduleRequest>,
) -> ApiResult<Json<Recommendation>> {
    let id = parse_recommendation_id(&id)?;
    let actor = request.actor.as_deref().unwrap_or(DEFAULT_ACTOR);
    let rec = state
        .lifecycle
        .schedule(&id, request.scheduled_for, actor)
        .await?;
    Ok(Json(rec))
}

/// Execute response: the updated row plus the executor outcome.
#[derive(Debug, Serialize)]
pub struct ExecuteResponse {
    pub recommendation: Recommendation,
    pub outcome: ExecutionOutcome,
}

/// Execute an approved or scheduled recommendation now.
pub async fn execute_recommendation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<ActionRequest>>,
) -> ApiResult<Json<ExecuteResponse>> {
    let id = parse_recommendation_id(&id)?;
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let (recommendation, outcome) = state.lifecycle.execute(&id, request.actor()).await?;
    Ok(Json(ExecuteResponse {
        recommendation,
        outcome,
    }))
}

/// Execute every approved recommendation, sequentially.
pub async fn execute_all(
    State(state): State<AppState>,
    body: Option<Json<ActionRequest>>,
) -> ApiResult<Json<ExecuteAllReport>> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let report = state.lifecycle.execute_all(request.actor()).await?;
    Ok(Json(report))
}

/// Backlog summary: counts per status, savings breakdowns.
pub async fn recommendation_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<SummaryReport>> {
    let report = summarize(state.recommendations.as_ref()).await?;
    Ok(Json(report))
}

/// Helper to parse a recommendation ID from its string form (UUID-based,
/// optional `rec:` prefix).
pub(super) fn parse_recommendation_id(id: &str) -> ApiResult<RecommendationId> {
    let uuid_str = id.strip_prefix("rec:").unwrap_or(id);
    let uuid = uuid::Uuid::parse_str(uuid_str)
        .map_err(|_| ApiError::BadRequest(format!("Invalid recommendation ID: {}", id)))?;
    Ok(RecommendationId::from_uuid(uuid))
}
