//! Gateway error types.
//!
//! Only server startup and the serve loop fail into these; per-connection
//! problems are handled where they occur and never escape a session.

use thiserror::Error;

/// Errors that can occur while starting or running the relay server.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Binding the listen address failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The server loop stopped unexpectedly.
    #[error("Internal error: {0}")]
    Internal(String),
}
