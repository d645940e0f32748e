//! Hysteresis state machine for host status.
//!
//! Recovery is instant: one reachable probe clears the failure count and
//! marks the host up. Failure is debounced: a host is only marked down once
//! `failure_threshold` consecutive probes have failed, which suppresses
//! single-probe flapping.

use chrono::{DateTime, Utc};

use crate::probe::ProbeOutcome;
use crate::types::{HostState, HostStatus};

/// Apply one completed probe to a host's entry, producing the next entry.
///
/// Pure function of its inputs; the caller owns when and where the result is
/// stored.
pub fn apply(prior: &HostStatus, outcome: ProbeOutcome, now: DateTime<Utc>) -> HostStatus {
    let mut next = prior.clone();
    next.last_checked = now;

    match outcome {
        ProbeOutcome::Reachable => {
            next.consecutive_failures = 0;
            next.status = HostState::Up;
        }
        ProbeOutcome::Unreachable => {
            next.consecutive_failures = prior.consecutive_failures.saturating_add(1);
            if next.consecutive_failures >= prior.config.failure_threshold {
                next.status = HostState::Down;
            }
            // Below the threshold the prior status is kept.
        }
    }

    next
}
