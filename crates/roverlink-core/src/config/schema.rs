//! Configuration schema definitions.

use crate::link::DEFAULT_QUEUE_DEPTH;
use crate::registry::CooldownPolicy;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main Roverlink configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Relay server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Release-cooldown guard settings.
    #[serde(default)]
    pub cooldown: CooldownConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Relay server configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address.
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Listen port.
    #[serde(default = "default_port")]
    pub port: u16,

    /// WebSocket path viewer clients connect to.
    #[serde(default = "default_client_path")]
    pub client_path: String,

    /// WebSocket path devices connect to.
    #[serde(default = "default_device_path")]
    pub device_path: String,

    /// Depth of each connection's outbound queue.
    #[serde(default = "default_queue_depth")]
    pub queue_depth: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            client_path: default_client_path(),
            device_path: default_device_path(),
            queue_depth: default_queue_depth(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_client_path() -> String {
    "/ws".to_string()
}

fn default_device_path() -> String {
    "/wsc".to_string()
}

fn default_queue_depth() -> usize {
    DEFAULT_QUEUE_DEPTH
}

/// Release-cooldown configuration section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CooldownConfig {
    /// Window length in milliseconds. Zero disables the guard.
    #[serde(default = "default_cooldown_ms")]
    pub window_ms: u64,

    /// Refuse reassumption of a cooling device.
    #[serde(default = "default_true")]
    pub gate_assume: bool,

    /// Refuse re-registration of a cooling device id.
    #[serde(default = "default_true")]
    pub gate_register: bool,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            window_ms: default_cooldown_ms(),
            gate_assume: true,
            gate_register: true,
        }
    }
}

fn default_cooldown_ms() -> u64 {
    5000
}

impl From<&CooldownConfig> for CooldownPolicy {
    fn from(config: &CooldownConfig) -> Self {
        Self {
            window: Duration::from_millis(config.window_ms),
            gate_assume: config.gate_assume,
            gate_register: config.gate_register,
        }
    }
}

/// Logging configuration section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Emit JSON log lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Directive string understood by tracing filters.
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

fn default_true() -> bool {
    true
}
