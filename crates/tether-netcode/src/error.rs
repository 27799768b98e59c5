//! Error types for tether-netcode

use thiserror::Error;

/// Netcode error type
#[derive(Debug, Error)]
pub enum Error {
    /// A caller-supplied argument was rejected before any state changed
    #[error("Invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// Configuration rejected by the core crate
    #[error(transparent)]
    Core(#[from] tether_core::Error),
}

/// Result type for netcode operations
pub type Result<T> = std::result::Result<T, Error>;
