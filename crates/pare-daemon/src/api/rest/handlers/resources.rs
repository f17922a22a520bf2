//! Resource policy handlers
//!
//! Every mutation path here goes through the policy lock validator via
//! `PolicyAdmin`; a validator refusal on the single PATCH surfaces as
//! 403, bulk paths record refusals as skipped items.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Path, State},
    Json,
};
use pare_engine::PolicyChange;
use pare_policy::{BulkPolicyReport, PolicyPreset};
use pare_types::{OptimizationPolicy, PolicyResource};
use serde::Deserialize;

/// List the policy view of all resources
pub async fn list_resources(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<PolicyResource>>> {
    let resources = state.resources.list_resources().await?;
    Ok(Json(resources))
}

/// Get one resource's policy view
pub async fn get_resource(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PolicyResource>> {
    let resource = state
        .resources
        .get_resource(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("resource {} not found", id)))?;
    Ok(Json(resource))
}

/// Policy patch request
#[derive(Debug, Deserialize)]
pub struct PatchPolicyRequest {
    pub optimization_policy: OptimizationPolicy,
}

/// Change one resource's optimization policy
pub async fn patch_policy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<PatchPolicyRequest>,
) -> ApiResult<Json<PolicyChange>> {
    let change = state
        .policy_admin
        .set_policy(&id, request.optimization_policy)
        .await?;
    Ok(Json(change))
}

/// Bulk policy update request
#[derive(Debug, Deserialize)]
pub struct BulkPolicyRequest {
    pub resource_ids: Vec<String>,
    pub optimization_policy: OptimizationPolicy,
}

/// Apply one policy across a resource set
pub async fn bulk_update_policy(
    State(state): State<AppState>,
    Json(request): Json<BulkPolicyRequest>,
) -> ApiResult<Json<BulkPolicyReport>> {
    if request.resource_ids.is_empty() {
        return Err(ApiError::BadRequest(
            "resource_ids must not be empty".to_string(),
        ));
    }
    let report = state
        .policy_admin
        .bulk_update(&request.resource_ids, request.optimization_policy)
        .await?;
    Ok(Json(report))
}

/// Preset application request
#[derive(Debug, Deserialize)]
pub struct PresetRequest {
    pub preset: PolicyPreset,
}

/// Apply a policy preset across the whole inventory
pub async fn apply_preset(
    State(state): State<AppState>,
    Json(request): Json<PresetRequest>,
) -> ApiResult<Json<BulkPolicyReport>> {
    let report = state.policy_admin.apply_preset(request.preset).await?;
    Ok(Json(report))
}
