//! REST API handlers

mod audit;
mod detections;
mod recommendations;
mod resources;
mod system;

pub use audit::{audit_stats, list_audit};
pub use detections::run_scan;
pub use recommendations::{
    approve_recommendation, create_recommendation, delete_recommendation, execute_all,
    execute_recommendation, get_recommendation, list_recommendations, recommendation_summary,
    reject_recommendation, schedule_recommendation, snooze_recommendation,
    update_recommendation,
};
pub use resources::{apply_preset, bulk_update_policy, get_resource, list_resources, patch_policy};
pub use system::{daemon_status, health_check, run_sweep};
