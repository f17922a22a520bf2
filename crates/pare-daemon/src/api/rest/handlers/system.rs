//! Health, status and sweep handlers

use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use crate::scheduler::SweepReport;
use axum::{extract::State, Json};
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Daemon status response
#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub version: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub uptime_secs: i64,
}

/// Daemon status
pub async fn daemon_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let uptime_secs = (chrono::Utc::now() - state.started_at).num_seconds();
    Json(StatusResponse {
        version: state.version.clone(),
        started_at: state.started_at,
        uptime_secs,
    })
}

/// Run a drift tick now and report what it did.
pub async fn run_sweep(State(state): State<AppState>) -> ApiResult<Json<SweepReport>> {
    let report = state.scheduler.sweep().await;
    Ok(Json(report))
}
