//! # Pare Engine
//!
//! The recommendation lifecycle engine: turns raw waste detections into
//! gated, auditable, state-tracked work items and drives them through a
//! centrally validated state machine.
//!
//! ## Key Components
//!
//! - [`RecommendationCreator`]: detections → pending recommendations,
//!   deduplicated against existing non-terminal rows
//! - [`transition`]: the single transition table; every caller rejects
//!   illegal transitions uniformly
//! - [`LifecycleService`]: approve / reject / snooze / schedule /
//!   execute / update, plus the sequential execute-all batch
//! - [`PolicyAdmin`]: single, bulk and preset policy mutations, all
//!   through the lock validator
//! - [`summary`]: status counts, savings breakdowns, audit stat buckets
//!
//! Execution side effects live in `pare-executor`; this crate decides
//! *whether* an action may run and records what happened to the row.

#![deny(unsafe_code)]

pub mod creator;
pub mod detector;
pub mod error;
pub mod lifecycle;
pub mod policy_admin;
pub mod summary;
pub mod transition;

pub use creator::{CreationReport, RecommendationCreator};
pub use detector::{Detector, DetectorError};
pub use error::{EngineError, Result};
pub use lifecycle::{
    ExecuteAllReport, ExecuteItemOutcome, LifecycleService, UpdateRequest, SCHEDULER_ACTOR,
};
pub use policy_admin::{PolicyAdmin, PolicyChange};
pub use summary::{audit_stats, summarize, AuditStatBucket, SummaryReport};
pub use transition::{override_event, TransitionError, TransitionEvent};
