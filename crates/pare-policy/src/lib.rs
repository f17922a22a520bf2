//! # Pare Policy System
//!
//! The sole gate for every optimization-policy mutation path: the
//! single-resource PATCH, bulk updates, and preset application all run
//! [`validate_policy_update`] before writing. Client-side option
//! disabling is a convenience only; the mutation path re-runs the same
//! check.
//!
//! ## Rules
//!
//! 1. A locked resource never changes policy, regardless of the requested
//!    value.
//! 2. A production resource is never set to `auto_safe`, independent of
//!    the lock flag. This is an explicit second guard, not a consequence
//!    of the lock.
//!
//! A [`PolicyViolation`] is never downgraded to a warning.

#![deny(unsafe_code)]

pub mod lock;
pub mod outcome;
pub mod preset;

pub use lock::{validate_policy_update, PolicyViolation};
pub use outcome::{BulkPolicyReport, PolicyItemOutcome, ResourcePolicyOutcome};
pub use preset::PolicyPreset;
