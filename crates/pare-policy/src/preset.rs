//! Policy presets
//!
//! One-click bundles that pick a target policy per resource. Application
//! still runs every resource through [`crate::validate_policy_update`];
//! a preset never bypasses the gate.

use pare_types::{Env, OptimizationPolicy, PolicyResource};
use serde::{Deserialize, Serialize};

/// Named policy bundle applied across a resource set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyPreset {
    /// Everything becomes recommend-only.
    Conservative,

    /// Auto-safe outside production, recommend-only in production.
    Balanced,

    /// Auto-safe wherever the validator allows it.
    Aggressive,
}

impl PolicyPreset {
    /// The policy this preset wants for a given resource.
    ///
    /// `Balanced` avoids proposing auto_safe for production so preset
    /// application reports those as applied rather than skipped;
    /// `Aggressive` proposes it everywhere and lets the validator skip
    /// production resources.
    pub fn target_policy(&self, resource: &PolicyResource) -> OptimizationPolicy {
        match self {
            PolicyPreset::Conservative => OptimizationPolicy::RecommendOnly,
            PolicyPreset::Balanced => {
                if resource.env == Env::Production {
                    OptimizationPolicy::RecommendOnly
                } else {
                    OptimizationPolicy::AutoSafe
                }
            }
            PolicyPreset::Aggressive => OptimizationPolicy::AutoSafe,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyPreset::Conservative => "conservative",
            PolicyPreset::Balanced => "balanced",
            PolicyPreset::Aggressive => "aggressive",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pare_types::ResourceType;

    fn resource(env: Env) -> PolicyResource {
        PolicyResource {
            id: "vol-1".to_string(),
            resource_type: ResourceType::EbsVolumes,
            env,
            optimization_policy: OptimizationPolicy::RecommendOnly,
            optimization_policy_locked: false,
        }
    }

    #[test]
    fn test_balanced_spares_production() {
        let preset = PolicyPreset::Balanced;
        assert_eq!(
            preset.target_policy(&resource(Env::Production)),
            OptimizationPolicy::RecommendOnly
        );
        assert_eq!(
            preset.target_policy(&resource(Env::Staging)),
            OptimizationPolicy::AutoSafe
        );
    }

    #[test]
    fn test_aggressive_proposes_auto_safe_everywhere() {
        let preset = PolicyPreset::Aggressive;
        assert_eq!(
            preset.target_policy(&resource(Env::Production)),
            OptimizationPolicy::AutoSafe
        );
        assert_eq!(
            preset.target_policy(&resource(Env::Development)),
            OptimizationPolicy::AutoSafe
        );
    }
}
