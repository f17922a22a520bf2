//! The recommendation transition table
//!
//! One table decides every status change (state × event → state′ or
//! reject); callers never hand-roll legality checks. Executor success is
//! the only producer of `executed`, so the administrative override path
//! deliberately has no event reaching it.

use pare_types::RecommendationStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Events that drive the recommendation state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionEvent {
    Approve,
    Reject,
    Snooze,
    Schedule,
    /// Sweep-driven: snooze window elapsed.
    Unsnooze,
    Execute,
    /// Administrative: the window for acting has passed.
    Expire,
}

impl TransitionEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransitionEvent::Approve => "approve",
            TransitionEvent::Reject => "reject",
            TransitionEvent::Snooze => "snooze",
            TransitionEvent::Schedule => "schedule",
            TransitionEvent::Unsnooze => "unsnooze",
            TransitionEvent::Execute => "execute",
            TransitionEvent::Expire => "expire",
        }
    }
}

impl fmt::Display for TransitionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The event is not legal from this status.
    #[error("cannot {event} a {from} recommendation")]
    Illegal {
        from: RecommendationStatus,
        event: TransitionEvent,
    },

    /// No event maps the current status to the requested one.
    #[error("no transition from {from} to {to}")]
    NoPath {
        from: RecommendationStatus,
        to: RecommendationStatus,
    },
}

/// Apply an event to a status. The whole legal state machine is this one
/// match.
pub fn apply(
    from: RecommendationStatus,
    event: TransitionEvent,
) -> Result<RecommendationStatus, TransitionError> {
    use RecommendationStatus::*;
    use TransitionEvent::*;

    let to = match (from, event) {
        (Pending | Snoozed, Approve) => Approved,
        (Pending, Snooze) => Snoozed,
        (Pending | Approved, Schedule) => Scheduled,
        (Snoozed, Unsnooze) => Pending,
        (Approved | Scheduled, Execute) => Executed,
        (from, Reject) if from.is_non_terminal() => Rejected,
        (from, Expire) if from.is_non_terminal() => Expired,
        (from, event) => return Err(TransitionError::Illegal { from, event }),
    };
    Ok(to)
}

/// Find the event that would carry `from` to `to`, for the `update()`
/// status-override escape hatch. `Execute` is excluded (`executed` is
/// only reachable through the executor/audit path), and so is `Snooze`
/// (a snooze needs a day window; use the snooze operation).
pub fn override_event(
    from: RecommendationStatus,
    to: RecommendationStatus,
) -> Result<TransitionEvent, TransitionError> {
    const OVERRIDABLE: [TransitionEvent; 5] = [
        TransitionEvent::Approve,
        TransitionEvent::Reject,
        TransitionEvent::Schedule,
        TransitionEvent::Unsnooze,
        TransitionEvent::Expire,
    ];

    OVERRIDABLE
        .into_iter()
        .find(|event| apply(from, *event) == Ok(to))
        .ok_or(TransitionError::NoPath { from, to })
}
