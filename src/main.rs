//! pingpanel - live latency panel for a set of network hosts.
//!
//! Probes each host (ICMP echo or TCP connect) at a fixed interval, keeps a
//! bounded rolling latency history per host, and redraws an aggregate status
//! table in place until interrupted.

mod config;
mod history;
mod monitor;
mod probe;
mod render;
mod stats;
mod supervisor;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::build_targets;
use supervisor::Supervisor;

#[derive(Parser)]
#[command(name = "pingpanel")]
#[command(about = "Live latency panel for a set of network hosts")]
#[command(version)]
struct Args {
    /// Hosts to monitor: HOST for ICMP echo, HOST:PORT for TCP connect
    #[arg(required = true)]
    hosts: Vec<String>,

    /// Probe interval per host, in seconds
    #[arg(short, long, default_value_t = 1.0)]
    interval: f64,

    /// Retained samples per host
    #[arg(short, long, default_value_t = config::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Display refresh interval, in seconds
    #[arg(short, long, default_value_t = 1.0)]
    refresh: f64,

    /// Log level for diagnostics on stderr
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let args = Args::parse();

    // Diagnostics go to stderr so the in-place frames on stdout stay intact.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("pingpanel={}", args.log_level).parse()?),
        )
        .init();

    let interval = config::interval_from_secs(args.interval)?;
    let refresh = config::interval_from_secs(args.refresh)?;
    let targets = build_targets(&args.hosts, interval, args.capacity)?;

    tracing::info!(hosts = targets.len(), ?interval, "starting pingpanel");

    let cancel = CancellationToken::new();
    let supervisor = Supervisor::start(targets, refresh, cancel.clone());

    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, stopping");
                cancel.cancel();
            }
        }
    });

    supervisor.run().await;

    Ok(())
}
