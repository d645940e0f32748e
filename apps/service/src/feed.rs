use std::collections::HashMap;

use reachup::{HostState, HostStatus};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

/// Forward status snapshots to the log until the bus closes.
///
/// The bus carries one snapshot per completed check; this keeps the last
/// seen state per host so transitions log at info while steady repeats stay
/// at debug.
pub async fn log_status_feed(mut events: broadcast::Receiver<HostStatus>) {
    let mut last_seen: HashMap<String, HostState> = HashMap::new();

    loop {
        match events.recv().await {
            Ok(snapshot) => {
                let id = snapshot.config.id.clone();
                let changed = last_seen.insert(id, snapshot.status) != Some(snapshot.status);
                if changed {
                    info!(
                        host_id = %snapshot.config.id,
                        status = %snapshot.status,
                        failures = snapshot.consecutive_failures,
                        "{}:{}/{} is now {}",
                        snapshot.config.host,
                        snapshot.config.port,
                        snapshot.config.protocol,
                        snapshot.status,
                    );
                } else {
                    debug!(
                        host_id = %snapshot.config.id,
                        status = %snapshot.status,
                        failures = snapshot.consecutive_failures,
                        "checked {}:{}",
                        snapshot.config.host,
                        snapshot.config.port,
                    );
                }
            }
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                warn!(missed, "status feed lagging; dropped snapshots");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
