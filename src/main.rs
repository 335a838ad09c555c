//! Kestrel - deterministic host-health monitoring core.
//!
//! # Usage
//!
//! ```bash
//! kestrel --log kestrel.jsonl --threshold 0.9
//! kestrel --fault faults/battery_spike.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: logging level (default: info)

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::info;

use kestrel_core::config::{self, defaults, AppConfig};
use kestrel_core::fault::profile as fault_profile;
use kestrel_core::providers::{BatteryProvider, CpuLoadProvider, MemoryProvider, StorageProvider};
use kestrel_core::{Engine, EventSink, MeasurementWindow, Scheduler, Supervisor};

#[derive(Parser, Debug)]
#[command(name = "kestrel")]
#[command(about = "Deterministic host-health monitoring core")]
#[command(version)]
struct CliArgs {
    /// Load a fault profile JSON and schedule its injections.
    #[arg(long, value_name = "PATH")]
    fault: Option<PathBuf>,

    /// Event log file path. `/dev/null` suppresses file output.
    #[arg(long, value_name = "PATH", default_value = "kestrel.jsonl")]
    log: PathBuf,

    /// Breach threshold in [0,1] for the standard rule set.
    #[arg(long, default_value_t = 0.95)]
    threshold: f64,

    /// Mount point the storage provider inspects.
    #[arg(long, value_name = "PATH", default_value = "/")]
    mount: PathBuf,

    /// Override the default measurement window capacity.
    #[arg(long, default_value_t = 64)]
    window_capacity: usize,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let app_config = AppConfig::new(
        args.fault.clone(),
        args.log,
        args.threshold,
        args.mount,
        args.window_capacity,
    )
    .context("invalid configuration")?;

    let fault_configs = match &app_config.fault_profile {
        Some(path) => fault_profile::load(path)
            .with_context(|| format!("failed to load fault profile {}", path.display()))?,
        None => Vec::new(),
    };

    let mut scheduler = Scheduler::new();
    scheduler.register(Box::new(CpuLoadProvider::new()), Duration::from_millis(defaults::CPU_CADENCE_MS));
    scheduler.register(Box::new(MemoryProvider::new()), Duration::from_millis(defaults::MEMORY_CADENCE_MS));
    scheduler.register(Box::new(BatteryProvider::new()), Duration::from_millis(defaults::BATTERY_CADENCE_MS));
    scheduler.register(
        Box::new(StorageProvider::new(app_config.mount_point.clone())),
        Duration::from_millis(defaults::STORAGE_CADENCE_MS),
    );

    let window = MeasurementWindow::new(app_config.window_capacity)
        .context("invalid window capacity")?;
    let mut engine = Engine::new(window);
    for rule in config::standard_rule_set(app_config.threshold) {
        engine.add_rule(rule);
    }

    let sink = EventSink::new(Some(&app_config.log_path)).context("failed to open event log")?;

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => info!("received SIGINT, initiating shutdown"),
                    _ = terminate.recv() => info!("received SIGTERM, initiating shutdown"),
                }
            }
            Err(err) => {
                tracing::warn!(%err, "failed to install SIGTERM handler, shutting down on SIGINT only");
                tokio::signal::ctrl_c().await.ok();
                info!("received SIGINT, initiating shutdown");
            }
        }
        shutdown_token.cancel();
    });

    info!(threshold = app_config.threshold, log = %app_config.log_path.display(), "kestrel starting");

    let supervisor = Supervisor::new(scheduler, engine, sink, fault_configs);
    supervisor.run(cancel_token).await;

    Ok(())
}
