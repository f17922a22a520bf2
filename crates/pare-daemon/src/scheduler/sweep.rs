//! Periodic reconciliation of time-based transitions
//!
//! Two independent passes per tick:
//! 1. unsnooze recommendations whose snooze window elapsed;
//! 2. auto-execute due scheduled recommendations (claim, approve,
//!    execute - strictly sequentially, continuing past per-item
//!    failures).
//!
//! The claim is an atomic store primitive, so concurrent sweep instances
//! never double-execute the same item.

use crate::config::SweepConfig;
use chrono::Utc;
use pare_engine::{LifecycleService, SCHEDULER_ACTOR};
use pare_store::RecommendationStore;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tokio::time::{interval, Duration};

/// What one sweep tick did.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SweepReport {
    pub unsnoozed: usize,
    pub executed: usize,
    pub failed: usize,
}

/// Sweep scheduler state
pub struct SweepScheduler {
    config: SweepConfig,
    store: Arc<dyn RecommendationStore>,
    lifecycle: Arc<LifecycleService>,
    sweep_tx: mpsc::Sender<()>,
    running: Arc<RwLock<bool>>,
}

impl SweepScheduler {
    /// Create a new sweep scheduler
    pub fn new(
        config: SweepConfig,
        store: Arc<dyn RecommendationStore>,
        lifecycle: Arc<LifecycleService>,
    ) -> (Arc<Self>, mpsc::Receiver<()>) {
        let (sweep_tx, sweep_rx) = mpsc::channel(10);

        let scheduler = Arc::new(Self {
            config,
            store,
            lifecycle,
            sweep_tx,
            running: Arc::new(RwLock::new(false)),
        });

        (scheduler, sweep_rx)
    }

    /// Trigger an immediate sweep
    pub async fn trigger_sweep(&self) {
        let _ = self.sweep_tx.send(()).await;
    }

    /// Start the periodic sweep loop
    pub async fn start(self: Arc<Self>, mut sweep_rx: mpsc::Receiver<()>) {
        {
            let mut running = self.running.write().await;
            *running = true;
        }

        tracing::info!(interval_secs = self.config.interval_secs, "sweep scheduler started");

        let mut tick = interval(Duration::from_secs(self.config.interval_secs.max(1)));

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    if self.config.enabled {
                        self.sweep().await;
                    }
                }
                Some(_) = sweep_rx.recv() => {
                    self.sweep().await;
                }
                else => break,
            }

            let running = self.running.read().await;
            if !*running {
                break;
            }
        }

        tracing::info!("sweep scheduler stopped");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }

    /// Run both reconciliation passes once.
    pub async fn sweep(&self) -> SweepReport {
        let now = Utc::now();
        let mut report = SweepReport::default();

        // Pass 1: resolve expired snoozes.
        match self.store.list_expired_snoozes(now).await {
            Ok(expired) => {
                for rec in expired {
                    match self.lifecycle.unsnooze(&rec.id).await {
                        Ok(_) => report.unsnoozed += 1,
                        Err(e) => {
                            tracing::warn!(
                                recommendation_id = %rec.id,
                                error = %e,
                                "failed to unsnooze"
                            );
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "sweep: listing expired snoozes failed");
            }
        }

        // Pass 2: auto-execute due scheduled items, one at a time.
        match self.store.list_due_scheduled(now).await {
            Ok(due) => {
                for rec in due {
                    match self.store.claim_due(&rec.id, now, SCHEDULER_ACTOR).await {
                        Ok(true) => {
                            match self.lifecycle.execute(&rec.id, SCHEDULER_ACTOR).await {
                                Ok((_, outcome)) if outcome.success => report.executed += 1,
                                Ok((_, outcome)) => {
                                    report.failed += 1;
                                    tracing::warn!(
                                        recommendation_id = %rec.id,
                                        message = %outcome.message,
                                        "scheduled execution failed"
                                    );
                                }
                                Err(e) => {
                                    report.failed += 1;
                                    tracing::warn!(
                                        recommendation_id = %rec.id,
                                        error = %e,
                                        "scheduled execution errored"
                                    );
                                }
                            }
                        }
                        // Another sweep instance won the claim, or the
                        // row changed under us; both are fine.
                        Ok(false) => {}
                        Err(e) => {
                            report.failed += 1;
                            tracing::warn!(
                                recommendation_id = %rec.id,
                                error = %e,
                                "claim failed"
                            );
                        }
                    }
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "sweep: listing due scheduled failed");
            }
        }

        if report.unsnoozed > 0 || report.executed > 0 || report.failed > 0 {
            tracing::info!(
                unsnoozed = report.unsnoozed,
                executed = report.executed,
                failed = report.failed,
                "sweep finished"
            );
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;
    use pare_engine::RecommendationCreator;
    use pare_executor::{ActionExecutor, ExecutorConfig, StubControlPlane};
    use pare_store::InMemoryStore;
    use pare_types::{
        Detection, DetectionId, Env, RecommendationId, RecommendationStatus, ResourceAction,
        ResourceType, ScenarioDetails,
    };

    fn detection() -> Detection {
        Detection {
            id: DetectionId::generate(),
            details: ScenarioDetails::UnattachedEbs {
                volume_type: "gp3".to_string(),
                size_gb: 250,
                days_unattached: 60,
            },
            resource_type: ResourceType::EbsVolumes,
            resource_id: "vol-9".to_string(),
            resource_name: "scratch".to_string(),
            account_id: "123456789012".to_string(),
            region: "eu-west-1".to_string(),
            env: Env::Development,
            action: ResourceAction::DeleteVolume,
            monthly_cost: 25.0,
            potential_savings: 22.0,
            confidence: 95,
            mode: 3,
        }
    }

    struct Fixture {
        scheduler: Arc<SweepScheduler>,
        store: Arc<InMemoryStore>,
        creator: RecommendationCreator,
    }

    fn fixture(client: StubControlPlane) -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let executor = Arc::new(ActionExecutor::new(
            Arc::new(client),
            store.clone(),
            ExecutorConfig::default(),
        ));
        let lifecycle = Arc::new(LifecycleService::new(store.clone(), executor));
        let (scheduler, _rx) = SweepScheduler::new(SweepConfig::default(), store.clone(), lifecycle);
        Fixture {
            scheduler,
            store: store.clone(),
            creator: RecommendationCreator::new(store),
        }
    }

    async fn snoozed_until(
        f: &Fixture,
        until: chrono::DateTime<Utc>,
    ) -> RecommendationId {
        let rec = f
            .creator
            .create_one(detection(), "scanner")
            .await
            .unwrap()
            .unwrap();
        let mut row = f.store.get(&rec.id).await.unwrap().unwrap();
        row.status = RecommendationStatus::Snoozed;
        row.snoozed_until = Some(until);
        f.store.update(row).await.unwrap();
        rec.id
    }

    async fn scheduled_for(
        f: &Fixture,
        at: chrono::DateTime<Utc>,
    ) -> RecommendationId {
        let rec = f
            .creator
            .create_one(detection(), "scanner")
            .await
            .unwrap()
            .unwrap();
        let mut row = f.store.get(&rec.id).await.unwrap().unwrap();
        row.status = RecommendationStatus::Scheduled;
        row.scheduled_for = Some(at);
        f.store.update(row).await.unwrap();
        rec.id
    }

    #[tokio::test]
    async fn test_sweep_unsnoozes_expired_only() {
        let f = fixture(StubControlPlane::succeeding());
        let now = Utc::now();
        let expired = snoozed_until(&f, now - ChronoDuration::hours(1)).await;
        let future = snoozed_until(&f, now + ChronoDuration::hours(1)).await;

        let report = f.scheduler.sweep().await;
        assert_eq!(report.unsnoozed, 1);

        let woke = f.store.get(&expired).await.unwrap().unwrap();
        assert_eq!(woke.status, RecommendationStatus::Pending);
        assert!(woke.snoozed_until.is_none());

        let asleep = f.store.get(&future).await.unwrap().unwrap();
        assert_eq!(asleep.status, RecommendationStatus::Snoozed);
    }

    #[tokio::test]
    async fn test_sweep_executes_due_scheduled() {
        let f = fixture(StubControlPlane::succeeding());
        let now = Utc::now();
        let due = scheduled_for(&f, now - ChronoDuration::minutes(10)).await;
        let later = scheduled_for(&f, now + ChronoDuration::minutes(10)).await;

        let report = f.scheduler.sweep().await;
        assert_eq!(report.executed, 1);
        assert_eq!(report.failed, 0);

        let done = f.store.get(&due).await.unwrap().unwrap();
        assert_eq!(done.status, RecommendationStatus::Executed);
        assert!(done.executed_at.is_some());

        let untouched = f.store.get(&later).await.unwrap().unwrap();
        assert_eq!(untouched.status, RecommendationStatus::Scheduled);
    }

    #[tokio::test]
    async fn test_sweep_failure_does_not_abort_remaining() {
        let f = fixture(StubControlPlane::failing("provider refused"));
        let now = Utc::now();
        let first = scheduled_for(&f, now - ChronoDuration::minutes(10)).await;
        let second = scheduled_for(&f, now - ChronoDuration::minutes(5)).await;

        let report = f.scheduler.sweep().await;
        assert_eq!(report.executed, 0);
        assert_eq!(report.failed, 2);

        // Both were claimed and attempted; both parked on approved.
        for id in [first, second] {
            let rec = f.store.get(&id).await.unwrap().unwrap();
            assert_eq!(rec.status, RecommendationStatus::Approved);
            assert!(rec.execution_result.is_some());
        }
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent_when_nothing_due() {
        let f = fixture(StubControlPlane::succeeding());
        let report = f.scheduler.sweep().await;
        assert_eq!(report.unsnoozed, 0);
        assert_eq!(report.executed, 0);
        assert_eq!(report.failed, 0);
    }
}
