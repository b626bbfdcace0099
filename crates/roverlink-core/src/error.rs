//! Error types for Roverlink core.

use crate::id::DeviceId;
use std::path::PathBuf;
use thiserror::Error;

/// Core result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for Roverlink core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON5 parse error: {0}")]
    Json5(String),
}

/// Registry policy violations.
///
/// Every variant is a local, recoverable decision: the offending request is
/// refused, registry state is untouched, and the connection stays open. The
/// display strings double as the `error` reply text sent back to clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("device not found: {0}")]
    DeviceNotFound(DeviceId),

    #[error("device {0} is already controlled by another client")]
    DeviceBusy(DeviceId),

    #[error("device {0} was released recently and is cooling down")]
    DeviceInCooldown(DeviceId),

    #[error("device {0} is not controlled by this client")]
    NotOwner(DeviceId),
}
