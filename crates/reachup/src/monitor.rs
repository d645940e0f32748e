//! Monitor facade wiring the registry, prober, scheduler, and status bus
//! together behind one cloneable handle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info};

use crate::bus::StatusBus;
use crate::error::RegistryError;
use crate::probe::{NetProber, Prober};
use crate::registry::HostRegistry;
use crate::scheduler::Scheduler;
use crate::types::{HostConfig, HostStatus};

/// Shared state behind every [`HostMonitor`] clone.
pub(crate) struct MonitorInner {
    pub(crate) registry: RwLock<HostRegistry>,
    pub(crate) prober: Arc<dyn Prober>,
    pub(crate) bus: StatusBus,
    pub(crate) changes_only: bool,
    scheduler: Scheduler,
    running: AtomicBool,
}

/// Handle to a running host monitor. Cheap to clone; all clones share the
/// same registry, scheduler, and status bus.
///
/// Spawned check loops keep running until [`stop`] is called or their host
/// is deregistered; dropping the last handle does not stop them.
///
/// [`stop`]: HostMonitor::stop
///
/// ```no_run
/// use reachup::{HostConfig, HostMonitor, Protocol};
///
/// # async fn run() -> Result<(), reachup::RegistryError> {
/// let monitor = HostMonitor::new();
/// monitor
///     .register(HostConfig {
///         id: "dns".to_string(),
///         host: "8.8.8.8".to_string(),
///         port: 53,
///         protocol: Protocol::Udp,
///         check_interval_ms: 15_000,
///         failure_threshold: 3,
///     })
///     .await?;
///
/// let mut events = monitor.subscribe();
/// monitor.start().await;
/// while let Ok(snapshot) = events.recv().await {
///     println!("{} is {}", snapshot.config.id, snapshot.status);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct HostMonitor {
    inner: Arc<MonitorInner>,
}

impl HostMonitor {
    /// Monitor with default settings: network prober, a snapshot published
    /// on every completed check.
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::default()
    }

    /// Add a host. If monitoring is running, its check loop starts
    /// immediately; otherwise it starts on the next [`start`].
    ///
    /// [`start`]: HostMonitor::start
    pub async fn register(&self, config: HostConfig) -> Result<(), RegistryError> {
        let id = config.id.clone();
        let every = Duration::from_millis(config.check_interval_ms);
        self.inner.registry.write().await.register(config)?;
        debug!(host_id = %id, "host registered");

        if self.inner.running.load(Ordering::SeqCst) {
            self.inner.scheduler.schedule(self.inner.clone(), id, every).await;
        }
        Ok(())
    }

    /// Remove a host and cancel its check loop. Returns whether the id was
    /// registered. A check already in flight for the host completes without
    /// effect: its result is dropped and no snapshot is published.
    pub async fn deregister(&self, id: &str) -> bool {
        // Remove the entry before cancelling the loop so a check completing
        // in between finds no entry and discards its result.
        let removed = self.inner.registry.write().await.deregister(id).is_some();
        self.inner.scheduler.cancel(id).await;
        if removed {
            debug!(host_id = %id, "host deregistered");
        }
        removed
    }

    /// Start check loops for every registered host, each of which probes
    /// immediately and then on its own interval. Calling this while already
    /// running resets the loops rather than duplicating them.
    pub async fn start(&self) {
        self.inner.scheduler.stop_all().await;
        self.inner.running.store(true, Ordering::SeqCst);

        let hosts = self.inner.registry.read().await.list();
        let count = hosts.len();
        for entry in hosts {
            let every = Duration::from_millis(entry.config.check_interval_ms);
            self.inner.scheduler.schedule(self.inner.clone(), entry.config.id, every).await;
        }
        info!(hosts = count, "monitoring started");
    }

    /// Stop all check loops. Registered hosts keep their last status and
    /// are picked up again by the next [`start`].
    ///
    /// [`start`]: HostMonitor::start
    pub async fn stop(&self) {
        self.inner.running.store(false, Ordering::SeqCst);
        self.inner.scheduler.stop_all().await;
        info!("monitoring stopped");
    }

    /// Snapshot of one host.
    pub async fn get(&self, id: &str) -> Option<HostStatus> {
        self.inner.registry.read().await.get(id)
    }

    /// Snapshots of all registered hosts.
    pub async fn list(&self) -> Vec<HostStatus> {
        self.inner.registry.read().await.list()
    }

    /// Receiver of status snapshots, one per completed check (or one per
    /// status change when the monitor was built with `changes_only`).
    pub fn subscribe(&self) -> broadcast::Receiver<HostStatus> {
        self.inner.bus.subscribe()
    }

    #[cfg(test)]
    pub(crate) fn inner(&self) -> &MonitorInner {
        &self.inner
    }
}

impl Default for HostMonitor {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for [`HostMonitor`].
pub struct MonitorBuilder {
    prober: Option<Arc<dyn Prober>>,
    changes_only: bool,
    event_capacity: usize,
}

impl Default for MonitorBuilder {
    fn default() -> Self {
        Self { prober: None, changes_only: false, event_capacity: 64 }
    }
}

impl MonitorBuilder {
    /// Replace the network prober. Mainly useful for tests.
    pub fn prober(mut self, prober: Arc<dyn Prober>) -> Self {
        self.prober = Some(prober);
        self
    }

    /// Publish a snapshot only when a check flips the host's status,
    /// instead of on every completed check.
    pub fn changes_only(mut self, changes_only: bool) -> Self {
        self.changes_only = changes_only;
        self
    }

    /// Capacity of the status bus before slow subscribers start lagging.
    pub fn event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }

    /// Build the monitor
    pub fn build(self) -> HostMonitor {
        let prober = self.prober.unwrap_or_else(|| Arc::new(NetProber::new()));
        HostMonitor {
            inner: Arc::new(MonitorInner {
                registry: RwLock::new(HostRegistry::new()),
                prober,
                bus: StatusBus::new(self.event_capacity),
                changes_only: self.changes_only,
                scheduler: Scheduler::default(),
                running: AtomicBool::new(false),
            }),
        }
    }
}
