//! Probe strategies for latency measurement.
//!
//! Two interchangeable strategies: ICMP echo via the platform ping binary,
//! and TCP connect timing. Both perform exactly one measurement per call and
//! report ordinary network failure as data, not as a panic-worthy condition.

mod ping;
mod tcp;

pub use ping::PingProber;
pub use tcp::TcpProber;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::config::{HostConfig, ProbeMode};

/// Probe error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("probe timed out after {0:?}")]
    Timeout(Duration),
    #[error("unreachable: {0}")]
    Unreachable(String),
    #[error("resolution failed: {0}")]
    Resolution(String),
    #[error("probe failed: {0}")]
    Probe(String),
}

impl ProbeError {
    /// Transient failures become failure samples and the loop continues.
    /// Everything else (resolution failure, unanticipated errors) stops the
    /// host's monitor for good.
    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::Timeout(_) | ProbeError::Unreachable(_))
    }
}

/// A latency measurement capability against one fixed host.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Perform exactly one measurement bounded by `timeout`, returning the
    /// round-trip latency in milliseconds.
    async fn probe(&self, timeout: Duration) -> Result<f64, ProbeError>;
}

/// Build the prober for a target's configured mode.
pub fn prober_for(target: &HostConfig) -> Arc<dyn Prober> {
    match target.mode {
        ProbeMode::Icmp => Arc::new(PingProber::new(&target.name)),
        ProbeMode::Tcp(port) => Arc::new(TcpProber::new(&target.name, port)),
    }
}
