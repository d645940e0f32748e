//! Reachup - host reachability monitoring engine
//!
//! This library tracks a set of configured network endpoints and reports a
//! debounced up/down status per endpoint. Each host is probed on its own
//! schedule (DNS resolution gate followed by a TCP or UDP reachability check
//! under a fixed timeout), and raw probe outcomes are run through an
//! asymmetric hysteresis state machine: a single successful probe recovers a
//! host instantly, while marking a host down requires a configurable number
//! of consecutive failures.

pub mod bus;
pub mod error;
pub mod monitor;
pub mod probe;
pub mod registry;
pub mod tracker;
pub mod types;

mod scheduler;

// Re-export main types
pub use bus::StatusBus;
pub use error::RegistryError;
pub use monitor::{HostMonitor, MonitorBuilder};
pub use probe::{NetProber, ProbeOutcome, Prober, PROBE_TIMEOUT};
pub use registry::{CheckTransition, HostRegistry};
pub use types::{HostConfig, HostState, HostStatus, Protocol};

/// Check interval applied when a host does not specify one.
pub const DEFAULT_CHECK_INTERVAL_MS: u64 = 30_000;

/// Consecutive failures required to mark a host down when not specified.
pub const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
