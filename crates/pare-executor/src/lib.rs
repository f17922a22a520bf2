//! Pare Executor - side-effecting action execution with an audit trail
//!
//! The [`ActionExecutor`] performs exactly one operation against a cloud
//! resource through the external [`ControlPlaneClient`] collaborator and
//! reports a structured [`ExecutionOutcome`](pare_types::ExecutionOutcome).
//! Its contract:
//!
//! - every execute call appends exactly one audit log entry, success or
//!   failure;
//! - failures are never swallowed silently and never propagated as errors
//!   past the boundary — `success = false` is a normal result;
//! - the control-plane call runs under a per-call timeout with bounded
//!   retry; retries stay inside one execute call and one audit entry.

#![deny(unsafe_code)]

pub mod client;
pub mod executor;

pub use client::{ApplyOutcome, ApplyRequest, ControlPlaneClient, ControlPlaneError, StubControlPlane};
pub use executor::{ActionExecutor, ExecutionRequest, ExecutorConfig};
