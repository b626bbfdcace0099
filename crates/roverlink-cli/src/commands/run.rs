//! Run command.

use std::path::PathBuf;

use clap::Args;
use roverlink_core::config::Config;
use roverlink_gateway::RelayServer;
use tracing::info;

/// Run command arguments.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Bind address (overrides the config file)
    #[arg(short, long, env = "ROVERLINK_BIND")]
    pub bind: Option<String>,

    /// Port number (overrides the config file)
    #[arg(short, long, env = "ROVERLINK_PORT")]
    pub port: Option<u16>,
}

/// Start the relay server and block until it stops.
pub async fn run(args: RunArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &config_path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            Config::load(path)?
        }
        None => Config::load_or_default(),
    };
    apply_overrides(&mut config, &args);
    config.validate()?;

    let server = RelayServer::new(&config);
    server.run().await?;
    Ok(())
}

fn apply_overrides(config: &mut Config, args: &RunArgs) {
    if let Some(bind) = &args.bind {
        config.server.bind = bind.clone();
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
}
