//! Detector collaborator seam
//!
//! The waste-detection scan is owned elsewhere; the engine only consumes
//! its output.

use async_trait::async_trait;
use pare_types::Detection;
use thiserror::Error;

/// Detector failure surfaced to the caller of a scan.
#[derive(Debug, Clone, Error)]
pub enum DetectorError {
    #[error("detection scan failed: {0}")]
    ScanFailed(String),
}

/// External collaborator that scans cloud resources for waste.
#[async_trait]
pub trait Detector: Send + Sync {
    async fn detect_all(&self) -> Result<Vec<Detection>, DetectorError>;
}
