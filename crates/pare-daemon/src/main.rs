//! Pare Daemon - cost-optimization recommendation service
//!
//! The daemon provides:
//! - REST API for recommendations, policies and the audit trail
//! - Periodic sweep resolving snoozes and scheduled executions

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod detector;
mod error;
mod scheduler;
mod server;

use config::DaemonConfig;
use error::{DaemonError, DaemonResult};
use server::Server;

/// Pare Daemon CLI
#[derive(Parser)]
#[command(name = "pared")]
#[command(about = "Pare daemon - cost-optimization recommendation service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PARE_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "PARE_LISTEN_ADDR")]
    listen: Option<String>,

    /// Log level
    #[arg(long, env = "PARE_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "PARE_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config =
        DaemonConfig::load(cli.config.as_deref()).map_err(|e| DaemonError::Config(e.to_string()))?;

    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| DaemonError::Config(format!("invalid listen address: {}", e)))?;
    }

    let server = Server::new(config)?;
    server.run().await
}
