//! Core data types for host monitoring.
//!
//! `HostConfig` is what callers register; `HostStatus` is the live snapshot
//! the engine maintains and publishes. Both serialize with the camelCase
//! field names the HTTP surface exposes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Transport protocol used when probing a host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    #[default]
    Tcp,
    Udp,
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::Tcp => write!(f, "tcp"),
            Protocol::Udp => write!(f, "udp"),
        }
    }
}

/// Reachability status of a monitored host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostState {
    Up,
    Down,
}

impl std::fmt::Display for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HostState::Up => write!(f, "up"),
            HostState::Down => write!(f, "down"),
        }
    }
}

/// Configuration for a monitored host. Immutable once registered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostConfig {
    /// Unique key identifying this host in the registry
    pub id: String,

    /// DNS name or literal IP address to probe
    pub host: String,

    /// Target port, 1-65535
    pub port: u16,

    /// Whether to probe with a TCP connect or a UDP exchange
    pub protocol: Protocol,

    /// Time between scheduled checks, in milliseconds
    #[serde(rename = "checkInterval")]
    pub check_interval_ms: u64,

    /// Consecutive failures required before the host is marked down
    pub failure_threshold: u32,
}

impl HostConfig {
    /// Check the invariants the registry relies on.
    pub fn validate(&self) -> Result<(), RegistryError> {
        if self.id.is_empty() {
            return Err(RegistryError::InvalidConfig("id must not be empty".into()));
        }
        if self.host.is_empty() {
            return Err(RegistryError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(RegistryError::InvalidConfig("port must be in range 1-65535".into()));
        }
        if self.check_interval_ms == 0 {
            return Err(RegistryError::InvalidConfig("check interval must be positive".into()));
        }
        if self.failure_threshold == 0 {
            return Err(RegistryError::InvalidConfig("failure threshold must be positive".into()));
        }
        Ok(())
    }
}

/// Live status snapshot for a monitored host.
///
/// Snapshots are cloned out of the registry; holding one never observes
/// later checks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostStatus {
    #[serde(flatten)]
    pub config: HostConfig,

    /// Current debounced state
    pub status: HostState,

    /// Completion time of the most recent check; Unix epoch before the first
    pub last_checked: DateTime<Utc>,

    /// Failures observed since the last successful probe
    pub consecutive_failures: u32,
}

impl HostStatus {
    /// Initial entry for a freshly registered host: down, zero failures,
    /// never checked.
    pub fn new(config: HostConfig) -> Self {
        Self {
            config,
            status: HostState::Down,
            last_checked: DateTime::UNIX_EPOCH,
            consecutive_failures: 0,
        }
    }

    /// Registry key of this host.
    pub fn id(&self) -> &str {
        &self.config.id
    }
}
