//! TCP connect-timing probe.
//!
//! Resolves the target, opens a stream connection bounded by the probe
//! timeout, and reports the wall-clock time to a successful connect. The
//! connection is dropped immediately after the measurement.

use std::net::SocketAddr;
use std::time::{Duration, Instant};

use tokio::net::{lookup_host, TcpStream};
use tokio::time::timeout;

use super::{ProbeError, Prober};

pub struct TcpProber {
    host: String,
    port: u16,
}

impl TcpProber {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            host: host.to_string(),
            port,
        }
    }

    /// Resolve to whatever address the platform resolver returns first.
    async fn resolve(&self) -> Result<SocketAddr, ProbeError> {
        let mut addrs = lookup_host((self.host.as_str(), self.port))
            .await
            .map_err(|e| ProbeError::Resolution(format!("{}: {}", self.host, e)))?;

        addrs
            .next()
            .ok_or_else(|| ProbeError::Resolution(format!("no addresses for {}", self.host)))
    }
}

#[async_trait::async_trait]
impl Prober for TcpProber {
    async fn probe(&self, limit: Duration) -> Result<f64, ProbeError> {
        let addr = self.resolve().await?;

        let start = Instant::now();
        match timeout(limit, TcpStream::connect(addr)).await {
            Ok(Ok(stream)) => {
                let elapsed = start.elapsed();
                drop(stream);
                Ok(elapsed.as_secs_f64() * 1000.0)
            }
            Ok(Err(e)) => Err(ProbeError::Unreachable(e.to_string())),
            Err(_) => Err(ProbeError::Timeout(limit)),
        }
    }
}
