//! Roverlink command-line interface.

pub mod commands;

use clap::{Parser, Subcommand};
use roverlink_core::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Roverlink - rover control relay
#[derive(Parser, Debug)]
#[command(name = "roverlink")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = "ROVERLINK_CONFIG")]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay server
    Run(commands::run::RunArgs),

    /// Configuration management
    Config(commands::config::ConfigArgs),

    /// Show version information
    Version,
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(&cli);

    match cli.command {
        Commands::Run(args) => commands::run::run(args, cli.config).await,
        Commands::Config(args) => commands::config::run(args, cli.config).await,
        Commands::Version => {
            println!("roverlink {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Initialize logging once for the process.
///
/// `RUST_LOG` wins when set. Otherwise the configured level applies, raised
/// to debug/trace by `-v`/`-vv`. A broken config file falls back to the
/// default level here; the command itself will report the real error.
fn init_logging(cli: &Cli) {
    let logging = match &cli.config {
        Some(path) => Config::load(path)
            .map(|config| config.logging)
            .unwrap_or_default(),
        None => Config::load_or_default().logging,
    };

    let default_directive = match cli.verbose {
        0 => format!("roverlink={}", logging.level.as_filter()),
        1 => "roverlink=debug".to_string(),
        _ => "roverlink=trace".to_string(),
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&default_directive));

    let registry = tracing_subscriber::registry().with(filter);
    if logging.json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
