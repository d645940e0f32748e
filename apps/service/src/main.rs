mod config;
mod feed;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use reachup::HostMonitor;
use tracing::{debug, info, warn};

use config::Config;
use logger::init_tracing;

#[derive(Debug, Parser)]
#[command(version, about = "Reachup host reachability monitoring daemon")]
struct Cli {
    /// Path to the TOML config file (created with defaults if missing)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config =
        Config::from_config(cli.config.as_deref()).context("failed to load configuration")?;
    debug!("{config}");

    let monitor = HostMonitor::builder().changes_only(config.monitor.changes_only).build();

    for entry in &config.hosts {
        if let Err(err) = monitor.register(entry.to_config()).await {
            warn!(host_id = %entry.id, "skipping host: {err}");
        }
    }

    let feed = tokio::spawn(feed::log_status_feed(monitor.subscribe()));
    monitor.start().await;
    info!("reachup service running; press Ctrl+C to stop");

    tokio::signal::ctrl_c().await.context("failed to listen for shutdown signal")?;

    monitor.stop().await;
    feed.abort();
    Ok(())
}
