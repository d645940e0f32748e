//! Per-host check loops.
//!
//! Each registered host gets one spawned task that ticks on the host's
//! interval and runs the full check pipeline: snapshot the config, probe,
//! fold the outcome into the registry, publish. Checks for one host never
//! overlap; the loop awaits the check and skips ticks it missed meanwhile.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::monitor::MonitorInner;

/// Owns the per-host check tasks.
#[derive(Debug, Default)]
pub(crate) struct Scheduler {
    tasks: Mutex<HashMap<String, JoinHandle<()>>>,
}

impl Scheduler {
    /// Spawn the check loop for one host. The interval's first tick fires
    /// immediately, so a freshly scheduled host is checked right away.
    /// Replaces (and aborts) any loop already running for this id.
    pub(crate) async fn schedule(&self, inner: Arc<MonitorInner>, id: String, every: Duration) {
        let task_id = id.clone();
        let handle = tokio::spawn(async move {
            let mut timer = interval(every);
            // A check that outlives its interval must not trigger a burst
            // of catch-up ticks once it finishes.
            timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                timer.tick().await;
                run_check(&inner, &task_id).await;
            }
        });

        if let Some(displaced) = self.tasks.lock().await.insert(id, handle) {
            displaced.abort();
        }
    }

    /// Abort the check loop for one host. Unknown ids are a no-op.
    pub(crate) async fn cancel(&self, id: &str) {
        if let Some(handle) = self.tasks.lock().await.remove(id) {
            handle.abort();
        }
    }

    /// Abort every check loop and wait for the tasks to finish.
    pub(crate) async fn stop_all(&self) {
        let handles: Vec<JoinHandle<()>> = self.tasks.lock().await.drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.abort();
        }
        // Aborted tasks resolve with a cancellation error; all we need is
        // that none of them is still running when this returns.
        let _ = join_all(handles).await;
    }
}

/// One complete check for one host.
pub(crate) async fn run_check(inner: &MonitorInner, id: &str) {
    // Clone the config out so no registry lock is held while probing.
    let Some(entry) = inner.registry.read().await.get(id) else {
        return;
    };
    let config = entry.config;

    let outcome = inner.prober.probe(&config.host, config.port, config.protocol).await;
    let now = Utc::now();

    let Some(transition) = inner.registry.write().await.apply_check(id, outcome, now) else {
        debug!(host_id = %id, "check finished after deregistration; dropping result");
        return;
    };

    if transition.status_changed {
        info!(
            host_id = %id,
            status = %transition.snapshot.status,
            failures = transition.snapshot.consecutive_failures,
            "host status changed"
        );
    }

    if inner.changes_only && !transition.status_changed {
        return;
    }
    inner.bus.publish(transition.snapshot);
}
