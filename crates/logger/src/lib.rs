//! Shared tracing setup for the Reachup binaries.

mod tracing;

pub use tracing::init_tracing;
