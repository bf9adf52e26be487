//! Countries command - list the countries the API supports.

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use wikileaders_scrape::ScrapePipeline;

use super::session_context;
use crate::Cli;
use crate::output::{JsonFormatter, TextFormatter};

/// Arguments for the countries command.
#[derive(Args, Debug, Default)]
pub struct CountriesArgs {
    /// Print a JSON array instead of text.
    #[arg(long)]
    pub json: bool,
}

/// Runs the countries command.
pub async fn run(args: &CountriesArgs, cli: &Cli) -> Result<()> {
    let settings = cli.load_settings().await?;
    let ctx = session_context(&settings)?;
    let pipeline = ScrapePipeline::new(&ctx)?;

    let session = pipeline
        .open_session()
        .await
        .context("Failed to open API session")?;
    info!(count = session.countries.len(), "Countries listed");

    if args.json {
        println!("{}", JsonFormatter::new(false).format_countries(&session.countries)?);
    } else {
        println!(
            "{}",
            TextFormatter::new(!cli.no_color).format_countries(&session.countries)
        );
    }

    Ok(())
}
