//! Supervisor: spawns one monitor per host, drives the render cycle, and
//! coordinates shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::HostConfig;
use crate::monitor::{new_state_handle, run_monitor, StateHandle};
use crate::probe::{prober_for, Prober};
use crate::render::{format_row, header, Screen};

/// Upper bound for the randomized launch stagger.
const MAX_STAGGER_MS: u64 = 500;

pub struct Supervisor {
    hosts: Vec<MonitoredHost>,
    refresh: Duration,
    cancel: CancellationToken,
}

struct MonitoredHost {
    name: String,
    state: StateHandle,
    handle: JoinHandle<()>,
}

impl Supervisor {
    /// Spawn one monitor loop per target. Launches are staggered by a
    /// bounded random delay so the first probes do not all fire at once.
    pub fn start(
        targets: Vec<HostConfig>,
        refresh: Duration,
        cancel: CancellationToken,
    ) -> Self {
        let mut hosts = Vec::with_capacity(targets.len());

        for target in targets {
            let name = target.name.clone();
            let prober = prober_for(&target);
            let state = new_state_handle(target.capacity);
            let handle = spawn_monitor(target, prober, state.clone(), cancel.clone());
            hosts.push(MonitoredHost {
                name,
                state,
                handle,
            });
        }

        tracing::info!(hosts = hosts.len(), "supervisor started");

        Self {
            hosts,
            refresh,
            cancel,
        }
    }

    /// Drive the render cycle until cancellation, then join every monitor.
    pub async fn run(self) {
        let mut screen = Screen::new();
        let mut ticker = tokio::time::interval(self.refresh);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.render(&mut screen).await {
                        tracing::error!(error = %e, "render failed");
                    }
                }
                _ = self.cancel.cancelled() => break,
            }
        }

        tracing::info!("shutting down, waiting for monitors");
        for host in self.hosts {
            let _ = host.handle.await;
        }
        println!();
    }

    /// Snapshot every host and overwrite the previous frame.
    async fn render(&self, screen: &mut Screen) -> std::io::Result<()> {
        let mut lines = Vec::with_capacity(self.hosts.len() + 1);
        lines.push(header());
        for host in &self.hosts {
            let snapshot = host.state.lock().await.snapshot();
            lines.push(format_row(&host.name, &snapshot));
        }
        screen.draw(&lines)
    }
}

fn spawn_monitor(
    target: HostConfig,
    prober: Arc<dyn Prober>,
    state: StateHandle,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let stagger = Duration::from_millis(rand::random::<u64>() % MAX_STAGGER_MS);
        tokio::select! {
            _ = tokio::time::sleep(stagger) => {}
            _ = cancel.cancelled() => return,
        }
        run_monitor(target, prober, state, cancel).await;
    })
}
