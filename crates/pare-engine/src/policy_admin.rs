//! Policy administration
//!
//! Single, bulk and preset policy mutations. Every write path re-runs
//! the lock validator immediately before writing; there is no way around
//! the gate from here.

use crate::error::{EngineError, Result};
use pare_policy::{
    validate_policy_update, BulkPolicyReport, PolicyPreset, ResourcePolicyOutcome,
};
use pare_store::PolicyResourceStore;
use pare_types::{OptimizationPolicy, PolicyResource};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of a single-resource policy change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyChange {
    pub resource_id: String,
    pub previous: OptimizationPolicy,
    pub new: OptimizationPolicy,
}

/// Applies policy mutations through the validator.
pub struct PolicyAdmin {
    store: Arc<dyn PolicyResourceStore>,
}

impl PolicyAdmin {
    pub fn new(store: Arc<dyn PolicyResourceStore>) -> Self {
        Self { store }
    }

    /// Change one resource's policy. A validator refusal is an error
    /// here (the single PATCH maps it to 403); bulk paths record it as a
    /// skipped item instead.
    pub async fn set_policy(
        &self,
        resource_id: &str,
        new_policy: OptimizationPolicy,
    ) -> Result<PolicyChange> {
        let resource = self.load(resource_id).await?;
        validate_policy_update(&resource, new_policy)?;

        let previous = self.store.set_policy(resource_id, new_policy).await?;
        tracing::info!(
            resource_id,
            previous = %previous,
            new = %new_policy,
            "optimization policy changed"
        );
        Ok(PolicyChange {
            resource_id: resource_id.to_string(),
            previous,
            new: new_policy,
        })
    }

    /// Apply one policy across a resource set. Per-item isolation:
    /// validator refusals are skips, missing resources and store trouble
    /// are failures, and neither stops the rest.
    pub async fn bulk_update(
        &self,
        resource_ids: &[String],
        new_policy: OptimizationPolicy,
    ) -> Result<BulkPolicyReport> {
        let mut report = BulkPolicyReport::new();
        for resource_id in resource_ids {
            let outcome = self.apply_one(resource_id, new_policy).await;
            report.push(resource_id.clone(), outcome);
        }
        tracing::info!(
            applied = report.success_count,
            skipped = report.skipped_count,
            failed = report.fail_count,
            policy = %new_policy,
            "bulk policy update finished"
        );
        Ok(report)
    }

    /// Apply a preset across the whole inventory. The preset picks a
    /// target policy per resource; the validator still decides.
    pub async fn apply_preset(&self, preset: PolicyPreset) -> Result<BulkPolicyReport> {
        let resources = self.store.list_resources().await?;
        let mut report = BulkPolicyReport::new();
        for resource in resources {
            let target = preset.target_policy(&resource);
            let outcome = self.apply_one(&resource.id, target).await;
            report.push(resource.id, outcome);
        }
        tracing::info!(
            preset = preset.as_str(),
            applied = report.success_count,
            skipped = report.skipped_count,
            failed = report.fail_count,
            "preset application finished"
        );
        Ok(report)
    }

    async fn apply_one(
        &self,
        resource_id: &str,
        new_policy: OptimizationPolicy,
    ) -> ResourcePolicyOutcome {
        let resource = match self.store.get_resource(resource_id).await {
            Ok(Some(resource)) => resource,
            Ok(None) => {
                return ResourcePolicyOutcome::Failed {
                    reason: format!("resource {} not found", resource_id),
                }
            }
            Err(e) => {
                return ResourcePolicyOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(violation) = validate_policy_update(&resource, new_policy) {
            return ResourcePolicyOutcome::Skipped { violation };
        }

        match self.store.set_policy(resource_id, new_policy).await {
            Ok(previous) => ResourcePolicyOutcome::Applied {
                previous,
                new: new_policy,
            },
            Err(e) => ResourcePolicyOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    async fn load(&self, resource_id: &str) -> Result<PolicyResource> {
        self.store
            .get_resource(resource_id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("resource {}", resource_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pare_store::InMemoryStore;
    use pare_types::{Env, ResourceType};

    fn resource(id: &str, env: Env, locked: bool) -> PolicyResource {
        PolicyResource {
            id: id.to_string(),
            resource_type: ResourceType::Ec2Instances,
            env,
            optimization_policy: OptimizationPolicy::RecommendOnly,
            optimization_policy_locked: locked,
        }
    }

    async fn admin_with(resources: Vec<PolicyResource>) -> (PolicyAdmin, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        for r in resources {
            store.upsert_resource(r).await.unwrap();
        }
        (PolicyAdmin::new(store.clone()), store)
    }

    #[tokio::test]
    async fn test_set_policy_reports_previous_and_new() {
        let (admin, _store) = admin_with(vec![resource("i-1", Env::Staging, false)]).await;
        let change = admin
            .set_policy("i-1", OptimizationPolicy::AutoSafe)
            .await
            .unwrap();
        assert_eq!(change.previous, OptimizationPolicy::RecommendOnly);
        assert_eq!(change.new, OptimizationPolicy::AutoSafe);
    }

    #[tokio::test]
    async fn test_set_policy_locked_is_policy_error() {
        let (admin, store) = admin_with(vec![resource("i-1", Env::Staging, true)]).await;
        let result = admin.set_policy("i-1", OptimizationPolicy::Ignore).await;
        assert!(matches!(result, Err(EngineError::Policy(_))));

        // The refusal wrote nothing.
        let unchanged = store.get_resource("i-1").await.unwrap().unwrap();
        assert_eq!(
            unchanged.optimization_policy,
            OptimizationPolicy::RecommendOnly
        );
    }

    #[tokio::test]
    async fn test_set_policy_unknown_resource() {
        let (admin, _store) = admin_with(vec![]).await;
        let result = admin.set_policy("ghost", OptimizationPolicy::Ignore).await;
        assert!(matches!(result, Err(EngineError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_bulk_auto_safe_skips_production() {
        // 10 resources, 3 production: 7 applied, 3 skipped, 0 failed.
        let mut resources = Vec::new();
        for i in 0..7 {
            resources.push(resource(&format!("i-dev-{i}"), Env::Development, false));
        }
        for i in 0..3 {
            resources.push(resource(&format!("i-prod-{i}"), Env::Production, false));
        }
        let ids: Vec<String> = resources.iter().map(|r| r.id.clone()).collect();
        let (admin, _store) = admin_with(resources).await;

        let report = admin
            .bulk_update(&ids, OptimizationPolicy::AutoSafe)
            .await
            .unwrap();
        assert_eq!(report.success_count, 7);
        assert_eq!(report.skipped_count, 3);
        assert_eq!(report.fail_count, 0);
    }

    #[tokio::test]
    async fn test_bulk_missing_resource_is_failure_not_abort() {
        let (admin, _store) = admin_with(vec![resource("i-1", Env::Staging, false)]).await;
        let ids = vec!["i-1".to_string(), "ghost".to_string()];

        let report = admin
            .bulk_update(&ids, OptimizationPolicy::Ignore)
            .await
            .unwrap();
        assert_eq!(report.success_count, 1);
        assert_eq!(report.fail_count, 1);
    }

    #[tokio::test]
    async fn test_balanced_preset() {
        let (admin, store) = admin_with(vec![
            resource("i-prod", Env::Production, false),
            resource("i-dev", Env::Development, false),
            resource("i-locked", Env::Development, true),
        ])
        .await;

        let report = admin.apply_preset(PolicyPreset::Balanced).await.unwrap();
        assert_eq!(report.success_count, 2);
        assert_eq!(report.skipped_count, 1);

        let prod = store.get_resource("i-prod").await.unwrap().unwrap();
        assert_eq!(prod.optimization_policy, OptimizationPolicy::RecommendOnly);
        let dev = store.get_resource("i-dev").await.unwrap().unwrap();
        assert_eq!(dev.optimization_policy, OptimizationPolicy::AutoSafe);
    }
}
