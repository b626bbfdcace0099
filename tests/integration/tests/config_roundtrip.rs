//! Config save/load round-trip integration tests.
//!
//! These tests verify that configuration can be serialized, written to disk,
//! and loaded back with identical field values, including JSON5 input.

use roverlink_core::config::{Config, LogLevel};
use std::path::Path;
use tempfile::TempDir;

#[test]
fn test_config_save_and_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let config = Config::default();
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.bind, config.server.bind);
    assert_eq!(loaded.server.port, config.server.port);
    assert_eq!(loaded.server.queue_depth, config.server.queue_depth);
    assert_eq!(loaded.cooldown.window_ms, config.cooldown.window_ms);
}

#[test]
fn test_config_modify_and_reload() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let mut config = Config::default();
    config.server.port = 9090;
    config.cooldown.window_ms = 250;
    config.logging.level = LogLevel::Debug;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, 9090);
    assert_eq!(loaded.cooldown.window_ms, 250);
    assert_eq!(loaded.logging.level, LogLevel::Debug);
}

#[test]
fn test_config_load_nonexistent() {
    let result = Config::load(Path::new("/nonexistent/config.json5"));
    assert!(result.is_err());
}

#[test]
fn test_config_parse_invalid() {
    let result = Config::parse("not valid json");
    assert!(result.is_err());
}

#[test]
fn test_config_parse_json5_syntax() {
    // Bare keys, trailing comma, line comment.
    let config = Config::parse(
        r#"{
            // relay settings
            server: { port: 8080, },
            cooldown: { window_ms: 1000 },
        }"#,
    )
    .unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.cooldown.window_ms, 1000);
    // Unspecified sections keep their defaults.
    assert_eq!(config.server.client_path, "/ws");
    assert_eq!(config.server.device_path, "/wsc");
}

#[test]
fn test_saved_config_validates() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    Config::default().save(&path).unwrap();
    let loaded = Config::load(&path).unwrap();
    assert!(loaded.validate().is_ok());
}

#[test]
fn test_save_overwrites_atomically() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.json5");

    let mut config = Config::default();
    config.server.port = 1111;
    config.save(&path).unwrap();
    config.server.port = 2222;
    config.save(&path).unwrap();

    let loaded = Config::load(&path).unwrap();
    assert_eq!(loaded.server.port, 2222);
    // The temp file used for the atomic rename is gone.
    assert!(!dir.path().join("config.tmp").exists());
}
