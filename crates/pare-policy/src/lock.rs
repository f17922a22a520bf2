//! Policy lock validator
//!
//! Pure decision function; no storage access and no side effects beyond a
//! deny log line.

use pare_types::{Env, OptimizationPolicy, PolicyResource};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a policy update was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PolicyViolation {
    /// The resource's optimization policy is locked.
    #[error("optimization policy for {resource_id} is locked")]
    Locked { resource_id: String },

    /// Production resources may never be set to auto_safe.
    #[error("production resource {resource_id} may not be set to auto_safe")]
    ProductionAutoSafe { resource_id: String },
}

/// Decide whether `new_policy` may be written to `resource`.
///
/// The lock flag is checked first and wins over everything; the
/// production/auto_safe guard applies even to unlocked resources.
pub fn validate_policy_update(
    resource: &PolicyResource,
    new_policy: OptimizationPolicy,
) -> Result<(), PolicyViolation> {
    if resource.optimization_policy_locked {
        tracing::debug!(resource_id = %resource.id, "policy update denied: locked");
        return Err(PolicyViolation::Locked {
            resource_id: resource.id.clone(),
        });
    }

    if resource.env == Env::Production && new_policy == OptimizationPolicy::AutoSafe {
        tracing::debug!(
            resource_id = %resource.id,
            "policy update denied: auto_safe on production"
        );
        return Err(PolicyViolation::ProductionAutoSafe {
            resource_id: resource.id.clone(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pare_types::ResourceType;

    fn resource(env: Env, locked: bool) -> PolicyResource {
        PolicyResource {
            id: "i-0abc".to_string(),
            resource_type: ResourceType::Ec2Instances,
            env,
            optimization_policy: OptimizationPolicy::RecommendOnly,
            optimization_policy_locked: locked,
        }
    }

    #[test]
    fn test_locked_resource_rejects_every_policy() {
        let locked = resource(Env::Development, true);
        for policy in [
            OptimizationPolicy::AutoSafe,
            OptimizationPolicy::RecommendOnly,
            OptimizationPolicy::Ignore,
        ] {
            assert_eq!(
                validate_policy_update(&locked, policy),
                Err(PolicyViolation::Locked {
                    resource_id: "i-0abc".to_string()
                })
            );
        }
    }

    #[test]
    fn test_production_auto_safe_rejected_even_when_unlocked() {
        let prod = resource(Env::Production, false);
        assert_eq!(
            validate_policy_update(&prod, OptimizationPolicy::AutoSafe),
            Err(PolicyViolation::ProductionAutoSafe {
                resource_id: "i-0abc".to_string()
            })
        );
    }

    #[test]
    fn test_production_accepts_non_auto_safe() {
        let prod = resource(Env::Production, false);
        assert!(validate_policy_update(&prod, OptimizationPolicy::RecommendOnly).is_ok());
        assert!(validate_policy_update(&prod, OptimizationPolicy::Ignore).is_ok());
    }

    #[test]
    fn test_unlocked_non_production_accepts_everything() {
        for env in [Env::Staging, Env::Development] {
            let res = resource(env, false);
            for policy in [
                OptimizationPolicy::AutoSafe,
                OptimizationPolicy::RecommendOnly,
                OptimizationPolicy::Ignore,
            ] {
                assert!(validate_policy_update(&res, policy).is_ok());
            }
        }
    }

    #[test]
    fn test_lock_wins_over_production_guard() {
        // Both rules would fire; the lock is reported.
        let locked_prod = resource(Env::Production, true);
        assert!(matches!(
            validate_policy_update(&locked_prod, OptimizationPolicy::AutoSafe),
            Err(PolicyViolation::Locked { .. })
        ));
    }
}
