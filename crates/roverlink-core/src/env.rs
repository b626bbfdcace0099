//! Environment variable handling.

use std::env;

/// Get an environment variable, returning None if not set or empty.
pub fn get_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

/// Get an environment variable with a default value.
pub fn get_var_or(name: &str, default: &str) -> String {
    get_var(name).unwrap_or_else(|| default.to_string())
}

/// Get an environment variable as a boolean.
pub fn get_bool(name: &str) -> bool {
    get_var(name)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// Get an environment variable as a u16 (e.g., for ports).
pub fn get_u16(name: &str) -> Option<u16> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Get an environment variable as a u64 (e.g., for durations in ms).
pub fn get_u64(name: &str) -> Option<u64> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Get an environment variable as a usize.
pub fn get_usize(name: &str) -> Option<usize> {
    get_var(name).and_then(|v| v.parse().ok())
}

/// Common environment variable names.
pub mod vars {
    /// Roverlink config file override.
    pub const ROVERLINK_CONFIG: &str = "ROVERLINK_CONFIG";

    /// Roverlink log filter.
    pub const ROVERLINK_LOG: &str = "ROVERLINK_LOG";

    /// Bind address override.
    pub const ROVERLINK_BIND: &str = "ROVERLINK_BIND";

    /// Listen port override.
    pub const ROVERLINK_PORT: &str = "ROVERLINK_PORT";

    /// Release cooldown window override, in milliseconds.
    pub const ROVERLINK_COOLDOWN_MS: &str = "ROVERLINK_COOLDOWN_MS";
}
