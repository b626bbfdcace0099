//! Configuration management commands.

use std::path::PathBuf;

use clap::Args;
use roverlink_core::config::Config;
use roverlink_core::paths;

/// Config command arguments.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(clap::Subcommand, Debug)]
pub enum ConfigCommand {
    /// Show the effective configuration
    Show,

    /// Write a configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Show configuration file path
    Path,

    /// Validate the configuration file
    Validate,
}

/// Run the config command.
pub async fn run(args: ConfigArgs, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = match &config_path {
                Some(path) => Config::load(path)?,
                None => Config::load_or_default(),
            };
            println!("{}", config.to_json5()?);
        }

        ConfigCommand::Init { force } => {
            let path = effective_path(&config_path)?;

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists: {}. Use --force to overwrite.",
                    path.display()
                );
            }
            match &config_path {
                Some(custom) => {
                    if let Some(parent) = custom.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
                None => paths::ensure_dirs()?,
            }

            // Fresh defaults, with env overrides applied.
            let config = Config::from_env_defaults();
            config.save(&path)?;

            println!("Created config file: {}", path.display());
        }

        ConfigCommand::Path => {
            let path = effective_path(&config_path)?;
            println!("{}", path.display());
        }

        ConfigCommand::Validate => match Config::load(&effective_path(&config_path)?) {
            Ok(config) => match config.validate() {
                Ok(()) => println!("Configuration is valid"),
                Err(e) => anyhow::bail!("Configuration error: {}", e),
            },
            Err(e) => anyhow::bail!("Failed to load config: {}", e),
        },
    }

    Ok(())
}

fn effective_path(config_path: &Option<PathBuf>) -> anyhow::Result<PathBuf> {
    match config_path {
        Some(path) => Ok(path.clone()),
        None => Ok(paths::config_file()?),
    }
}
