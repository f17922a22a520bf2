//! API Router configuration

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the main API router
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health and status
        .route("/health", get(handlers::health_check))
        .route("/status", get(handlers::daemon_status))
        // Recommendations
        .route("/recommendations", get(handlers::list_recommendations))
        .route("/recommendations", post(handlers::create_recommendation))
        .route(
            "/recommendations/summary",
            get(handlers::recommendation_summary),
        )
        .route("/recommendations/execute-all", post(handlers::execute_all))
        .route("/recommendations/:id", get(handlers::get_recommendation))
        .route(
            "/recommendations/:id",
            patch(handlers::update_recommendation),
        )
        .route(
            "/recommendations/:id",
            delete(handlers::delete_recommendation),
        )
        .route(
            "/recommendations/:id/approve",
            post(handlers::approve_recommendation),
        )
        .route(
            "/recommendations/:id/reject",
            post(handlers::reject_recommendation),
        )
        .route(
            "/recommendations/:id/snooze",
            post(handlers::snooze_recommendation),
        )
        .route(
            "/recommendations/:id/schedule",
            post(handlers::schedule_recommendation),
        )
        .route(
            "/recommendations/:id/execute",
            post(handlers::execute_recommendation),
        )
        // Detections
        .route("/detections/scan", post(handlers::run_scan))
        // Resources and policies
        .route("/resources", get(handlers::list_resources))
        .route("/resources/:id", get(handlers::get_resource))
        .route("/resources/:id/policy", patch(handlers::patch_policy))
        .route("/resources/policy/bulk", post(handlers::bulk_update_policy))
        .route("/resources/policy/preset", post(handlers::apply_preset))
        // Audit trail
        .route("/audit", get(handlers::list_audit))
        .route("/audit/stats", get(handlers::audit_stats))
        // Drift tick on demand
        .route("/sweep", post(handlers::run_sweep));

    // Build router with middleware
    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
