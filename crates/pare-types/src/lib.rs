//! Pare Types - Core types for the cost-optimization recommendation engine
//!
//! Pare turns raw waste detections into gated, auditable, state-tracked
//! recommendations against cloud resources. This crate holds the domain
//! vocabulary shared by every other crate in the workspace.
//!
//! ## Architectural Boundaries
//!
//! - **pare-engine** owns: recommendation creation, the status transition
//!   table, lifecycle operations
//! - **pare-executor** owns: side-effecting action execution and the audit
//!   trail it produces
//! - **pare-policy** owns: the optimization-policy lock gate
//!
//! ## Key Concepts
//!
//! - **Detection**: a raw waste signal emitted by the scanner
//! - **Recommendation**: a persisted, operator- or scheduler-actionable
//!   record derived from a detection, carrying its own approval state
//! - **PolicyResource**: the policy view of a cloud resource, mutated only
//!   through the lock validator
//! - **AuditLogEntry**: append-only record of every execution attempt

#![deny(unsafe_code)]
#![cfg_attr(feature = "strict-docs", warn(missing_docs))]
#![cfg_attr(not(feature = "strict-docs"), allow(missing_docs))]

pub mod audit;
pub mod detection;
pub mod ids;
pub mod policy;
pub mod recommendation;
pub mod scenario;

// Re-export main types
pub use audit::{AuditLogEntry, ExecutionOutcome};
pub use detection::{Detection, Env, ResourceAction, ResourceType, ACTIONABLE_MODE};
pub use ids::{AuditEntryId, DetectionId, RecommendationId};
pub use policy::{OptimizationPolicy, PolicyResource};
pub use recommendation::{ImpactLevel, Recommendation, RecommendationStatus, RiskLevel};
pub use scenario::ScenarioDetails;
