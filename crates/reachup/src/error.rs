use thiserror::Error;

/// Errors surfaced by registry operations.
///
/// Probe failures never appear here: they are folded into the host's status
/// by the tracker and are not errors from the caller's point of view.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("invalid host config: {0}")]
    InvalidConfig(String),
    #[error("host id already registered: {0}")]
    DuplicateId(String),
}
