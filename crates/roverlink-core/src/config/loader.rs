//! Configuration loading and persistence.

use super::{Config, LogLevel};
use crate::error::ConfigError;
use crate::registry::CooldownPolicy;
use crate::{env, paths};
use std::fs;
use std::path::Path;

impl Config {
    /// Load configuration from the default path.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = paths::config_file()?;
        Self::load(&path)
    }

    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse configuration from a string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        json5::from_str(content).map_err(|e| ConfigError::Json5(e.to_string()))
    }

    /// Save configuration to the default path.
    pub fn save_default(&self) -> Result<(), ConfigError> {
        let path = paths::config_file()?;
        self.save(&path)
    }

    /// Save configuration to a file path.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_json5()?;

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Write atomically
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, &content)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Serialize to JSON5 string.
    pub fn to_json5(&self) -> Result<String, ConfigError> {
        // json5 doesn't have a serializer, so we use serde_json with pretty print
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate the configuration, collecting all errors before returning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        // 1. Bind address and port
        if self.server.bind.is_empty() {
            errors.push("Server bind address must not be empty".to_string());
        }
        if self.server.port == 0 {
            errors.push("Server port cannot be 0".to_string());
        }

        // 2. WebSocket paths must be absolute and distinct, since the path
        //    is what classifies a connection as device or client
        if !self.server.client_path.starts_with('/') {
            errors.push(format!(
                "Client path '{}' must start with '/'",
                self.server.client_path
            ));
        }
        if !self.server.device_path.starts_with('/') {
            errors.push(format!(
                "Device path '{}' must start with '/'",
                self.server.device_path
            ));
        }
        if self.server.client_path == self.server.device_path {
            errors.push(format!(
                "Client and device paths must differ, both are '{}'",
                self.server.client_path
            ));
        }

        // 3. Queue depth bounds
        if self.server.queue_depth == 0 {
            errors.push("Queue depth must be greater than 0".to_string());
        }
        if self.server.queue_depth > 65536 {
            errors.push(format!(
                "Queue depth {} exceeds maximum of 65536",
                self.server.queue_depth
            ));
        }

        // 4. Cooldown window sanity
        if self.cooldown.window_ms > 3_600_000 {
            errors.push(format!(
                "Cooldown window {}ms exceeds maximum of one hour",
                self.cooldown.window_ms
            ));
        }

        // Return collected errors
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors.join("; ")))
        }
    }

    /// Cooldown policy derived from the cooldown section.
    pub fn cooldown_policy(&self) -> CooldownPolicy {
        CooldownPolicy::from(&self.cooldown)
    }

    /// Load configuration from the default path, falling back to defaults if
    /// no file exists.
    ///
    /// When no config file is found, environment variables are inspected so
    /// a bare `ROVERLINK_PORT=8080 roverlink run` works without a file.
    pub fn load_or_default() -> Self {
        match Self::load_default() {
            Ok(config) => config,
            Err(ConfigError::NotFound(_)) => Self::from_env_defaults(),
            Err(_) => Self::default(),
        }
    }

    /// Create a Config from defaults, enhanced by environment variables.
    ///
    /// Honors `ROVERLINK_BIND`, `ROVERLINK_PORT`, and `ROVERLINK_COOLDOWN_MS`.
    pub fn from_env_defaults() -> Self {
        let mut config = Self::default();

        if let Some(bind) = env::get_var(env::vars::ROVERLINK_BIND) {
            config.server.bind = bind;
        }
        if let Some(port) = env::get_u16(env::vars::ROVERLINK_PORT) {
            config.server.port = port;
        }
        if let Some(window_ms) = env::get_u64(env::vars::ROVERLINK_COOLDOWN_MS) {
            config.cooldown.window_ms = window_ms;
        }

        config
    }
}

/// Configuration builder for creating configs programmatically.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new config builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bind address.
    pub fn bind(mut self, bind: impl Into<String>) -> Self {
        self.config.server.bind = bind.into();
        self
    }

    /// Set the listen port.
    pub fn port(mut self, port: u16) -> Self {
        self.config.server.port = port;
        self
    }

    /// Set the client WebSocket path.
    pub fn client_path(mut self, path: impl Into<String>) -> Self {
        self.config.server.client_path = path.into();
        self
    }

    /// Set the device WebSocket path.
    pub fn device_path(mut self, path: impl Into<String>) -> Self {
        self.config.server.device_path = path.into();
        self
    }

    /// Set the outbound queue depth.
    pub fn queue_depth(mut self, depth: usize) -> Self {
        self.config.server.queue_depth = depth;
        self
    }

    /// Set the cooldown window in milliseconds.
    pub fn cooldown_ms(mut self, window_ms: u64) -> Self {
        self.config.cooldown.window_ms = window_ms;
        self
    }

    /// Set whether cooldown gates reassumption.
    pub fn gate_assume(mut self, gate: bool) -> Self {
        self.config.cooldown.gate_assume = gate;
        self
    }

    /// Set whether cooldown gates re-registration.
    pub fn gate_register(mut self, gate: bool) -> Self {
        self.config.cooldown.gate_register = gate;
        self
    }

    /// Set the log level.
    pub fn log_level(mut self, level: LogLevel) -> Self {
        self.config.logging.level = level;
        self
    }

    /// Enable or disable JSON log output.
    pub fn json_logs(mut self, json: bool) -> Self {
        self.config.logging.json = json;
        self
    }

    /// Build the config.
    pub fn build(self) -> Config {
        self.config
    }

    /// Validate and build the config, returning an error if validation fails.
    pub fn build_validated(self) -> Result<Config, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
