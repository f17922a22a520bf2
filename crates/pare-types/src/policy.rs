//! Optimization policy view of a cloud resource
//!
//! Owned by the resource inventory, not by this subsystem; mutated only
//! through the policy lock validator's gate in `pare-policy`.

use crate::detection::{Env, ResourceType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-resource optimization policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationPolicy {
    /// Actions may execute without human approval (subject to the lock
    /// and production guards).
    AutoSafe,

    /// Recommendations are surfaced but every action needs approval.
    RecommendOnly,

    /// The resource is excluded from optimization entirely.
    Ignore,
}

impl OptimizationPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationPolicy::AutoSafe => "auto_safe",
            OptimizationPolicy::RecommendOnly => "recommend_only",
            OptimizationPolicy::Ignore => "ignore",
        }
    }
}

impl fmt::Display for OptimizationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Read/write view of a cloud resource's policy fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyResource {
    /// Provider-shaped identifier.
    pub id: String,
    pub resource_type: ResourceType,
    pub env: Env,
    pub optimization_policy: OptimizationPolicy,
    pub optimization_policy_locked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_wire_names() {
        assert_eq!(
            serde_json::to_string(&OptimizationPolicy::AutoSafe).unwrap(),
            "\"auto_safe\""
        );
        assert_eq!(
            serde_json::to_string(&OptimizationPolicy::RecommendOnly).unwrap(),
            "\"recommend_only\""
        );
    }
}
