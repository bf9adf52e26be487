//! Config command - manage configuration.

use anyhow::{Result, bail};
use clap::{Args, Subcommand};
use tracing::info;

use wikileaders_store::{Settings, default_config_dir};

use crate::Cli;
use crate::output::JsonFormatter;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration paths.
    Path,

    /// Write a settings file with default values.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli).await,
        ConfigAction::Path => {
            show_paths(cli);
            Ok(())
        }
        ConfigAction::Init { force } => init_config(*force, cli).await,
    }
}

async fn show_config(cli: &Cli) -> Result<()> {
    let settings = cli.load_settings().await?;
    println!("{}", JsonFormatter::new(true).format(&settings)?);
    Ok(())
}

fn show_paths(cli: &Cli) {
    println!("Configuration Paths");
    println!("{}", "─".repeat(40));
    println!();
    println!("Config dir:    {}", default_config_dir().display());
    println!("Settings file: {}", cli.settings_path().display());
}

async fn init_config(force: bool, cli: &Cli) -> Result<()> {
    let path = cli.settings_path();

    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    Settings::default().save(&path).await?;
    info!(path = %path.display(), "Settings initialized");
    println!("Wrote {}", path.display());

    Ok(())
}
