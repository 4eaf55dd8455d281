//! Per-host monitor loop and shared host state.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::HostConfig;
use crate::history::{History, Sample};
use crate::probe::Prober;

/// One host's mutable state: bounded history plus an optional terminal error.
///
/// Written only by that host's monitor loop; the renderer reads snapshots.
/// Once a terminal error is set the history is frozen for the host's
/// lifetime.
#[derive(Debug)]
pub struct HostState {
    history: History,
    terminal: Option<String>,
}

impl HostState {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: History::new(capacity),
            terminal: None,
        }
    }

    /// Append a sample unless the host has already failed terminally.
    pub fn record(&mut self, sample: Sample) {
        if self.terminal.is_none() {
            self.history.push(sample);
        }
    }

    /// Mark the host permanently failed. The first error wins.
    pub fn set_terminal(&mut self, error: String) {
        if self.terminal.is_none() {
            self.terminal = Some(error);
        }
    }

    pub fn snapshot(&self) -> HostSnapshot {
        HostSnapshot {
            terminal: self.terminal.clone(),
            samples: self.history.snapshot(),
        }
    }
}

/// Point-in-time copy of one host's state, safe to read while the monitor
/// keeps probing.
#[derive(Debug, Clone)]
pub struct HostSnapshot {
    pub terminal: Option<String>,
    pub samples: Vec<Sample>,
}

/// Handle to one host's state. Locking is per host, never global.
pub type StateHandle = Arc<Mutex<HostState>>;

pub fn new_state_handle(capacity: usize) -> StateHandle {
    Arc::new(Mutex::new(HostState::new(capacity)))
}

/// Monitor loop for a single host.
///
/// Observes the cancellation token before every probe, runs one probe with a
/// timeout equal to the interval, records the outcome, then sleeps out the
/// remainder of the interval racing the token. Exits on cancellation, or
/// permanently on resolution failure or any unanticipated probe error.
pub async fn run_monitor(
    target: HostConfig,
    prober: Arc<dyn Prober>,
    state: StateHandle,
    cancel: CancellationToken,
) {
    let interval = target.interval;

    loop {
        if cancel.is_cancelled() {
            tracing::debug!(host = %target.name, "monitor cancelled");
            break;
        }

        let started = tokio::time::Instant::now();
        match prober.probe(interval).await {
            Ok(ms) => {
                tracing::debug!(host = %target.name, latency_ms = ms, "probe ok");
                state.lock().await.record(Sample::Latency(ms));
            }
            Err(e) if e.is_transient() => {
                tracing::debug!(host = %target.name, error = %e, "probe failed");
                state.lock().await.record(Sample::Failed);
            }
            Err(e) => {
                tracing::warn!(host = %target.name, error = %e, "stopping monitor");
                state.lock().await.set_terminal(e.to_string());
                break;
            }
        }

        let remaining = interval.saturating_sub(started.elapsed());
        tokio::select! {
            _ = tokio::time::sleep(remaining) => {}
            _ = cancel.cancelled() => break,
        }
    }
}
