//! CLI argument routing integration tests.
//!
//! These tests drive the `roverlink` argument grammar through the library
//! surface to verify top-level command routing, help text, and error
//! handling without spawning the compiled binary.

use clap::error::ErrorKind;
use clap::Parser;
use roverlink_cli::{commands, Cli, Commands};

#[test]
fn test_version_routing() {
    let cli = Cli::try_parse_from(["roverlink", "version"]).unwrap();
    assert!(matches!(cli.command, Commands::Version));
}

#[test]
fn test_run_routing_with_overrides() {
    let cli = Cli::try_parse_from([
        "roverlink",
        "--config",
        "/tmp/relay.json5",
        "run",
        "--bind",
        "0.0.0.0",
        "--port",
        "9000",
    ])
    .unwrap();

    assert_eq!(
        cli.config,
        Some(std::path::PathBuf::from("/tmp/relay.json5"))
    );
    match cli.command {
        Commands::Run(args) => {
            assert_eq!(args.bind, Some("0.0.0.0".to_string()));
            assert_eq!(args.port, Some(9000));
        }
        _ => panic!("Expected Run command"),
    }
}

#[test]
fn test_config_subcommand_routing() {
    for (argv, expect_show) in [
        (vec!["roverlink", "config", "show"], true),
        (vec!["roverlink", "config", "validate"], false),
    ] {
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Config(args) => match args.command {
                commands::config::ConfigCommand::Show => assert!(expect_show),
                commands::config::ConfigCommand::Validate => assert!(!expect_show),
                other => panic!("unexpected config command: {}", name_of(&other)),
            },
            _ => panic!("Expected Config command"),
        }
    }
}

fn name_of(command: &commands::config::ConfigCommand) -> &'static str {
    match command {
        commands::config::ConfigCommand::Show => "show",
        commands::config::ConfigCommand::Init { .. } => "init",
        commands::config::ConfigCommand::Path => "path",
        commands::config::ConfigCommand::Validate => "validate",
    }
}

#[test]
fn test_help_lists_commands() {
    let err = Cli::try_parse_from(["roverlink", "--help"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DisplayHelp);

    let help = err.to_string();
    assert!(help.contains("run"), "help should mention 'run': {help}");
    assert!(help.contains("config"), "help should mention 'config': {help}");
    assert!(help.contains("version"), "help should mention 'version': {help}");
}

#[test]
fn test_unknown_command_is_an_error() {
    let err = Cli::try_parse_from(["roverlink", "nonexistent-command"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
}

#[test]
fn test_missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["roverlink"]).is_err());
}

#[test]
fn test_port_must_be_numeric() {
    let err = Cli::try_parse_from(["roverlink", "run", "--port", "video0"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueValidation);
}
