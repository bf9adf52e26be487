//! Scrape command - the full run: select, populate, enrich, export.

use anyhow::{Context, Result, bail};
use clap::Args;
use std::path::PathBuf;
use tracing::{info, warn};

use wikileaders_core::{Country, CountrySelection};
use wikileaders_scrape::ScrapePipeline;
use wikileaders_store::{ExportFormat, Settings};

use super::session_context;
use crate::Cli;
use crate::output::{TextFormatter, export};
use crate::prompt::{is_interactive, pick_countries};

/// Arguments for the scrape command.
#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Countries to scrape: comma-separated codes ("fr,us") or "all".
    /// Prompts when omitted and a terminal is attached.
    #[arg(long, short)]
    pub countries: Option<String>,

    /// Export formats, comma-separated (json, csv, text).
    #[arg(long, short, value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// Directory the export files are written to.
    #[arg(long, short)]
    pub output_dir: Option<PathBuf>,

    /// Pretty-print the JSON export.
    #[arg(long)]
    pub pretty: bool,

    /// Maximum concurrent page downloads.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Leaders API base URL.
    #[arg(long)]
    pub api_url: Option<String>,

    /// Never ask before retrying; back off automatically.
    #[arg(long)]
    pub no_prompt: bool,

    /// Skip writing export files.
    #[arg(long)]
    pub no_export: bool,
}

impl ScrapeArgs {
    /// Applies command-line overrides to loaded settings.
    pub fn apply(&self, settings: &mut Settings) {
        if !self.format.is_empty() {
            settings.formats.clone_from(&self.format);
        }
        if let Some(dir) = &self.output_dir {
            settings.output_dir.clone_from(dir);
        }
        if self.pretty {
            settings.pretty_json = true;
        }
        if let Some(concurrency) = self.concurrency {
            settings.concurrency = concurrency;
        }
        if let Some(url) = &self.api_url {
            settings.api_base_url.clone_from(url);
        }
        if self.no_prompt {
            settings.interactive_retry = false;
        }
    }
}

/// Runs the scrape command.
pub async fn run(args: &ScrapeArgs, cli: &Cli) -> Result<()> {
    let mut settings = cli.load_settings().await?;
    args.apply(&mut settings);
    settings.validate()?;

    let ctx = session_context(&settings)?;
    let pipeline = ScrapePipeline::new(&ctx)?;

    let session = pipeline
        .open_session()
        .await
        .context("Failed to open API session")?;

    let countries = select_countries(args.countries.as_deref(), &session.countries).await?;
    info!(
        countries = %countries.iter().map(Country::code).collect::<Vec<_>>().join(","),
        "Scraping"
    );

    let (dataset, report) = pipeline.run(&countries, &session.handle).await?;

    let formatter = TextFormatter::new(!cli.no_color);
    if !cli.quiet {
        println!("{}", formatter.format_preview(&dataset));
        println!();
        println!("{}", formatter.format_report(&report));
    }

    if args.no_export {
        return Ok(());
    }
    if settings.formats.is_empty() {
        warn!("No export format configured");
        return Ok(());
    }

    let written = export(
        &dataset,
        &settings.formats,
        &settings.output_dir,
        settings.pretty_json,
    )
    .await?;
    if !cli.quiet {
        for path in &written {
            println!("Wrote {}", path.display());
        }
    }

    Ok(())
}

/// Resolves the countries to scrape from the flag, the terminal, or all.
async fn select_countries(flag: Option<&str>, available: &[Country]) -> Result<Vec<Country>> {
    if let Some(input) = flag {
        return CountrySelection::parse(input)
            .resolve(available)
            .with_context(|| format!("No supported country in {input:?}"));
    }

    if !is_interactive() {
        info!("No terminal attached, scraping every country");
        return Ok(available.to_vec());
    }

    let available = available.to_vec();
    let picked = tokio::task::spawn_blocking(move || {
        pick_countries(&available, std::io::stdin().lock(), std::io::stderr())
    })
    .await??;

    if picked.is_empty() {
        bail!("No country selected");
    }
    Ok(picked)
}

// ============================================================================
// Tests
// ============================================================================
