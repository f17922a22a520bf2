//! Detection scan handler

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{extract::State, Json};
use pare_engine::CreationReport;
use serde::Serialize;

/// Scan response: how many signals came back and what became of them.
#[derive(Debug, Serialize)]
pub struct ScanResponse {
    pub detected: usize,
    #[serde(flatten)]
    pub report: CreationReport,
}

/// Run the detector and feed its output to the recommendation creator.
pub async fn run_scan(State(state): State<AppState>) -> ApiResult<Json<ScanResponse>> {
    let detections = state
        .detector
        .detect_all()
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    let detected = detections.len();

    let report = state.creator.create_batch(detections, "scanner").await?;

    Ok(Json(ScanResponse { detected, report }))
}
