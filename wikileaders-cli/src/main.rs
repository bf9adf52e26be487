// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! `WikiLeaders` CLI - lead paragraphs of national leaders from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Pick countries interactively, then scrape and export
//! wikileaders
//!
//! # Scrape two countries without prompting
//! wikileaders scrape --countries fr,us
//!
//! # Every country, JSON and text exports into ./out
//! wikileaders scrape --countries all --format json,text --output-dir out
//!
//! # List the countries the API supports
//! wikileaders countries
//!
//! # Write a default settings file
//! wikileaders config init
//! ```

mod commands;
mod output;
mod prompt;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use wikileaders_fetch::FetchError;
use wikileaders_scrape::ScrapeError;
use wikileaders_store::Settings;

use commands::{config, countries, scrape};

// ============================================================================
// CLI Definition
// ============================================================================

/// `WikiLeaders` CLI - national leaders and their encyclopedia lead paragraphs.
#[derive(Parser)]
#[command(name = "wikileaders")]
#[command(about = "Scrapes the lead paragraph of national leaders' encyclopedia pages")]
#[command(long_about = r#"
WikiLeaders asks the country-leaders API for the current and past leaders of
each selected country, downloads each leader's encyclopedia page, and keeps
the cleaned-up first paragraph.

Examples:
  wikileaders                            # Interactive country selection
  wikileaders scrape --countries fr,us   # Two countries
  wikileaders scrape --countries all     # Every supported country
  wikileaders countries                  # List supported countries
  wikileaders config show                # Current settings
"#)]
#[command(version)]
#[command(author = "WikiLeaders Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'scrape' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Settings file to use instead of the default one.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Scrape leaders and export them (default if no command specified).
    #[command(visible_alias = "s")]
    Scrape(scrape::ScrapeArgs),

    /// List the countries the API supports.
    #[command(visible_alias = "c")]
    Countries(countries::CountriesArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// CLI exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success, including runs where some pages failed.
    Success = 0,
    /// General error.
    Error = 1,
    /// The API refused the credential.
    Forbidden = 2,
    /// Retrying was declined or exhausted.
    Aborted = 3,
}

impl ExitCode {
    /// Picks the exit code for a failed run.
    pub fn for_error(error: &anyhow::Error) -> Self {
        for cause in error.chain() {
            if let Some(e) = cause.downcast_ref::<ScrapeError>() {
                if e.is_forbidden() {
                    return Self::Forbidden;
                }
                if e.is_aborted() {
                    return Self::Aborted;
                }
            }
            if let Some(e) = cause.downcast_ref::<FetchError>() {
                match e {
                    FetchError::Forbidden { .. } => return Self::Forbidden,
                    FetchError::Aborted { .. } => return Self::Aborted,
                    _ => {}
                }
            }
        }
        Self::Error
    }
}

impl Cli {
    /// Path of the settings file in use.
    pub fn settings_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Settings::default_path)
    }

    /// Loads the settings file in use.
    pub async fn load_settings(&self) -> Result<Settings> {
        let path = self.settings_path();
        let settings = Settings::load(&path).await.map_err(|e| {
            anyhow::anyhow!("Failed to load settings from {}: {e}", path.display())
        })?;
        Ok(settings)
    }
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool) {
    if quiet {
        return; // No logging in quiet mode
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("wikileaders=debug,info")
        } else {
            EnvFilter::new("wikileaders=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let result = match &cli.command {
        Some(Commands::Scrape(args)) => scrape::run(args, &cli).await,
        Some(Commands::Countries(args)) => countries::run(args, &cli).await,
        Some(Commands::Config(args)) => config::run(args, &cli).await,
        None => {
            // Default to scrape command
            scrape::run(&scrape::ScrapeArgs::default(), &cli).await
        }
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::for_error(&e) as i32);
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
