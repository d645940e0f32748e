//! Broadcast channel carrying one [`HostStatus`] snapshot per completed check.

use tokio::sync::broadcast;
use tracing::debug;

use crate::types::HostStatus;

/// Fan-out for status snapshots. Every subscriber gets its own receiver;
/// slow subscribers lag and drop the oldest snapshots rather than blocking
/// the checks that publish.
#[derive(Debug, Clone)]
pub struct StatusBus {
    tx: broadcast::Sender<HostStatus>,
}

impl StatusBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HostStatus> {
        self.tx.subscribe()
    }

    pub(crate) fn publish(&self, snapshot: HostStatus) {
        debug!(host_id = %snapshot.id(), status = %snapshot.status, "status bus: publishing snapshot");
        // Ignore errors if there are no receivers
        let _ = self.tx.send(snapshot);
    }
}
