//! Server setup and lifecycle management

use crate::api::{create_router, AppState};
use crate::config::DaemonConfig;
use crate::detector::FixtureDetector;
use crate::error::{DaemonError, DaemonResult};
use crate::scheduler::SweepScheduler;
use pare_engine::{LifecycleService, PolicyAdmin, RecommendationCreator};
use pare_executor::{ActionExecutor, ControlPlaneClient, StubControlPlane};
use pare_store::InMemoryStore;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

/// Pare Daemon Server
pub struct Server {
    config: DaemonConfig,
    state: AppState,
    scheduler: Arc<SweepScheduler>,
    sweep_rx: mpsc::Receiver<()>,
}

impl Server {
    /// Create a new server with the given configuration and the stub
    /// control plane (development backend).
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        Self::with_control_plane(config, Arc::new(StubControlPlane::succeeding()))
    }

    /// Create a new server with an explicit control-plane client.
    pub fn with_control_plane(
        config: DaemonConfig,
        control_plane: Arc<dyn ControlPlaneClient>,
    ) -> DaemonResult<Self> {
        // One store instance backs all three seams; handles are explicit
        // and constructed here, never cached globally.
        let store = Arc::new(InMemoryStore::new());

        let executor = Arc::new(ActionExecutor::new(
            control_plane,
            store.clone(),
            config.executor.clone(),
        ));
        let lifecycle = Arc::new(LifecycleService::new(store.clone(), executor));
        let creator = Arc::new(RecommendationCreator::new(store.clone()));
        let policy_admin = Arc::new(PolicyAdmin::new(store.clone()));

        let (scheduler, sweep_rx) =
            SweepScheduler::new(config.sweep.clone(), store.clone(), lifecycle.clone());

        let state = AppState {
            recommendations: store.clone(),
            resources: store.clone(),
            audit: store,
            lifecycle,
            creator,
            policy_admin,
            detector: Arc::new(FixtureDetector::new()),
            scheduler: scheduler.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        };

        Ok(Self {
            config,
            state,
            scheduler,
            sweep_rx,
        })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let app = create_router(self.state);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("pare daemon listening on {}", addr);
        tracing::info!(
            sweep_interval_secs = self.config.sweep.interval_secs,
            "drift tick configured"
        );

        // Start the sweep scheduler in the background
        let scheduler = self.scheduler.clone();
        let sweep_rx = self.sweep_rx;
        tokio::spawn(async move {
            scheduler.start(sweep_rx).await;
        });

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("pare daemon shutting down");

        self.scheduler.stop().await;

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
