//! CLI command implementations.

pub mod config;
pub mod countries;
pub mod scrape;

use anyhow::{Context, Result};
use tracing::debug;

use wikileaders_fetch::{RetryPolicy, SessionContext};
use wikileaders_store::Settings;

use crate::prompt::{StdinPrompt, is_interactive};

/// Builds the session context for a run.
///
/// Failed API requests are retried on the operator's word when interactive
/// retry is enabled and a terminal is attached; otherwise with backoff.
pub fn session_context(settings: &Settings) -> Result<SessionContext> {
    let fetch_settings = settings.fetch_settings();
    let retry = if settings.interactive_retry && is_interactive() {
        debug!("Retry policy: ask");
        RetryPolicy::ask(StdinPrompt)
    } else {
        debug!(max_attempts = fetch_settings.max_retries, "Retry policy: backoff");
        RetryPolicy::Attempts(fetch_settings.backoff())
    };

    SessionContext::builder()
        .settings(fetch_settings)
        .retry(retry)
        .build()
        .context("Failed to set up HTTP session")
}
