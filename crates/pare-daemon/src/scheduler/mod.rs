//! Scheduler sweep ("drift tick")

mod sweep;

pub use sweep::{SweepReport, SweepScheduler};
