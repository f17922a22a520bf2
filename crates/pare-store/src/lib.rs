//! Pare Store - storage seams for the recommendation engine
//!
//! Trait definitions for the three persistence concerns (recommendations,
//! policy resources, the audit log) plus an in-memory backend for
//! development and tests. A relational backend implements the same
//! traits; callers receive explicit `Arc<dyn …Store>` handles from server
//! bootstrap — there is no hidden global client.
//!
//! Two primitives here are load-bearing for correctness:
//!
//! - [`RecommendationStore::insert_if_absent`] /
//!   [`RecommendationStore::insert_batch_if_absent`] close the
//!   check-then-insert dedup race: at most one non-terminal
//!   recommendation per detection id, enforced atomically.
//! - [`RecommendationStore::claim_due`] is a compare-and-swap claim so
//!   concurrent sweep instances cannot double-execute a due item.

#![deny(unsafe_code)]

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::InMemoryStore;
pub use traits::{
    AuditFilter, AuditLogStore, BatchInsertReport, PolicyResourceStore, RecommendationFilter,
    RecommendationStore,
};
