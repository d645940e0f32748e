//! Host registry: the single source of truth for which hosts exist.
//!
//! Config and live status share one map entry, so a host can never have a
//! config without a status or the other way around. All reads hand out
//! clones; the only mutation after registration happens in [`apply_check`],
//! the check-completion step.
//!
//! [`apply_check`]: HostRegistry::apply_check

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::RegistryError;
use crate::probe::ProbeOutcome;
use crate::tracker;
use crate::types::{HostConfig, HostStatus};

/// What one completed check did to a host's entry.
#[derive(Debug, Clone)]
pub struct CheckTransition {
    /// The entry after the check was applied
    pub snapshot: HostStatus,
    /// Whether the debounced up/down state flipped on this check
    pub status_changed: bool,
}

/// Map from host id to its combined config + status entry.
#[derive(Debug, Default)]
pub struct HostRegistry {
    hosts: HashMap<String, HostStatus>,
}

impl HostRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a host with a fresh status entry (down, zero failures, never
    /// checked). Rejects invalid configs and ids that are already present.
    pub fn register(&mut self, config: HostConfig) -> Result<(), RegistryError> {
        config.validate()?;
        if self.hosts.contains_key(&config.id) {
            return Err(RegistryError::DuplicateId(config.id));
        }
        self.hosts.insert(config.id.clone(), HostStatus::new(config));
        Ok(())
    }

    /// Remove a host, returning its last entry. `None` means the id was
    /// unknown, which callers treat as a no-op.
    pub fn deregister(&mut self, id: &str) -> Option<HostStatus> {
        self.hosts.remove(id)
    }

    /// Snapshot of one host.
    pub fn get(&self, id: &str) -> Option<HostStatus> {
        self.hosts.get(id).cloned()
    }

    /// Snapshots of every registered host. Order is not significant.
    pub fn list(&self) -> Vec<HostStatus> {
        self.hosts.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }

    /// The check-completion step: fold a probe outcome into the host's
    /// entry. Returns `None` when the host was deregistered while the probe
    /// was in flight; the late completion is discarded and must not
    /// resurrect the entry.
    pub fn apply_check(
        &mut self,
        id: &str,
        outcome: ProbeOutcome,
        now: DateTime<Utc>,
    ) -> Option<CheckTransition> {
        let entry = self.hosts.get_mut(id)?;
        let prior_status = entry.status;
        *entry = tracker::apply(entry, outcome, now);
        Some(CheckTransition {
            status_changed: entry.status != prior_status,
            snapshot: entry.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HostState, Protocol};

    fn config(id: &str) -> HostConfig {
        HostConfig {
            id: id.to_string(),
            host: format!("{id}.example"),
            port: 443,
            protocol: Protocol::Tcp,
            check_interval_ms: 5000,
            failure_threshold: 2,
        }
    }

    #[test]
    fn test_register_creates_initial_entry() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();

        let entry = registry.get("a").unwrap();
        assert_eq!(entry.status, HostState::Down);
        assert_eq!(entry.consecutive_failures, 0);
        assert_eq!(entry.last_checked, DateTime::UNIX_EPOCH);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_rejects_duplicate_id() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();

        let mut second = config("a");
        second.port = 8080;
        let err = registry.register(second).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateId("a".to_string()));

        // The original entry is untouched.
        assert_eq!(registry.get("a").unwrap().config.port, 443);
    }

    #[test]
    fn test_register_rejects_invalid_config() {
        let mut registry = HostRegistry::new();
        let mut bad = config("a");
        bad.port = 0;

        assert!(matches!(registry.register(bad), Err(RegistryError::InvalidConfig(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_deregister_removes_entry() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();

        assert!(registry.deregister("a").is_some());
        assert!(registry.get("a").is_none());
        assert!(registry.deregister("a").is_none(), "second deregister is a no-op");
    }

    #[test]
    fn test_list_returns_all_hosts() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();
        registry.register(config("b")).unwrap();

        let mut ids: Vec<String> = registry.list().into_iter().map(|s| s.config.id).collect();
        ids.sort();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_apply_check_updates_entry_and_reports_transitions() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();

        // Down -> Up is a transition.
        let t = registry.apply_check("a", ProbeOutcome::Reachable, Utc::now()).unwrap();
        assert!(t.status_changed);
        assert_eq!(t.snapshot.status, HostState::Up);

        // First failure under a threshold of 2: no transition yet.
        let t = registry.apply_check("a", ProbeOutcome::Unreachable, Utc::now()).unwrap();
        assert!(!t.status_changed);
        assert_eq!(t.snapshot.status, HostState::Up);
        assert_eq!(t.snapshot.consecutive_failures, 1);

        // Second failure reaches the threshold.
        let t = registry.apply_check("a", ProbeOutcome::Unreachable, Utc::now()).unwrap();
        assert!(t.status_changed);
        assert_eq!(t.snapshot.status, HostState::Down);

        // The stored entry matches the reported snapshot.
        assert_eq!(registry.get("a").unwrap().consecutive_failures, 2);
    }

    #[test]
    fn test_apply_check_after_deregister_is_discarded() {
        let mut registry = HostRegistry::new();
        registry.register(config("a")).unwrap();
        registry.deregister("a");

        let late = registry.apply_check("a", ProbeOutcome::Reachable, Utc::now());
        assert!(late.is_none());
        assert!(registry.get("a").is_none(), "late completion must not resurrect the entry");
    }
}
