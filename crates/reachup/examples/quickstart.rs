//! A minimal host monitor example.
//!
//! This example registers two well-known endpoints and prints a line for
//! every completed check until interrupted.

use anyhow::Result;
use reachup::{HostConfig, HostMonitor, Protocol};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let monitor = HostMonitor::new();

    monitor
        .register(HostConfig {
            id: "google-http".to_string(),
            host: "google.com".to_string(),
            port: 80,
            protocol: Protocol::Tcp,
            check_interval_ms: 10_000,
            failure_threshold: 3,
        })
        .await?;

    monitor
        .register(HostConfig {
            id: "google-dns".to_string(),
            host: "8.8.8.8".to_string(),
            port: 53,
            protocol: Protocol::Udp,
            check_interval_ms: 15_000,
            failure_threshold: 3,
        })
        .await?;

    let mut events = monitor.subscribe();
    monitor.start().await;

    println!("Monitoring {} hosts. Press Ctrl+C to exit.", monitor.list().await.len());

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(snapshot) => println!(
                    "{} ({}:{}/{}) is {} after {} consecutive failures",
                    snapshot.config.id,
                    snapshot.config.host,
                    snapshot.config.port,
                    snapshot.config.protocol,
                    snapshot.status,
                    snapshot.consecutive_failures,
                ),
                Err(e) => {
                    eprintln!("event stream ended: {e}");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    monitor.stop().await;
    Ok(())
}
