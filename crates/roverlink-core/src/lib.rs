//! # roverlink-core
//!
//! Core types, device registry, and configuration for Roverlink.
//!
//! This crate provides the shared state and utilities used across all
//! Roverlink crates:
//!
//! - **Registry**: The single authority over device records, ownership
//!   grants, and release cooldowns
//! - **Links**: Bounded fire-and-forget outbound queues for connections
//! - **Configuration**: Loading, validation, and management of config files
//! - **Utilities**: Path resolution, typed identifiers, and environment
//!   handling

pub mod config;
pub mod env;
pub mod error;
pub mod id;
pub mod link;
pub mod paths;
pub mod registry;

// Re-exports for convenience
pub use config::Config;
pub use error::{ConfigError, Error, RegistryError, Result};
pub use id::{ClientId, DeviceId};
pub use link::{ConnectionHandle, Outbound};
pub use registry::{CooldownPolicy, DeviceInfo, DeviceRegistry};
