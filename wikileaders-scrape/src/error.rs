//! Scrape error types.

use thiserror::Error;
use wikileaders_core::CoreError;
use wikileaders_fetch::FetchError;

/// Error building the paragraph extractor.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A CSS selector failed to compile.
    #[error("Invalid selector {selector:?}: {reason}")]
    Selector {
        /// Selector source.
        selector: String,
        /// Parser message.
        reason: String,
    },
}

/// Error type for a scraping run.
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// API or page fetch error.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Extractor setup error.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// Dataset bookkeeping error.
    #[error("Dataset error: {0}")]
    Core(#[from] CoreError),
}

impl ScrapeError {
    /// Returns true for errors that end the run.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_fatal(),
            Self::Extract(_) | Self::Core(_) => true,
        }
    }

    /// Returns true if the API refused the caller.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Forbidden { .. }))
    }

    /// Returns true if the retry policy or operator gave up.
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Fetch(FetchError::Aborted { .. }))
    }
}
