//! User settings.
//!
//! Stored as JSON at `<config dir>/wikileaders/settings.json`. A missing file
//! means defaults; missing fields take their default values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use wikileaders_fetch::{DEFAULT_API_BASE_URL, FetchSettings};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

// ============================================================================
// Export Format
// ============================================================================

/// An on-disk export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Full dataset as JSON.
    Json,
    /// One row per leader.
    Csv,
    /// One line per leader.
    Text,
}

impl ExportFormat {
    /// Every format.
    pub const ALL: [Self; 3] = [Self::Json, Self::Csv, Self::Text];

    /// File name used for this format.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Json => "leaders.json",
            Self::Csv => "leaders.csv",
            Self::Text => "leaders.txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "text",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "text" | "txt" => Ok(Self::Text),
            other => Err(StoreError::Parse(format!("unknown export format: {other}"))),
        }
    }
}

// ============================================================================
// Settings
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Leaders API base URL.
    pub api_base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum concurrent page fetches.
    pub concurrency: usize,
    /// Fetched pages buffered ahead of extraction.
    pub channel_capacity: usize,
    /// Maximum attempts for credential and metadata requests.
    pub max_retries: u32,
    /// Base delay between attempts, in seconds.
    pub retry_delay_secs: u64,
    /// Ask on the terminal before retrying instead of backing off.
    pub interactive_retry: bool,
    /// Directory export files are written to.
    pub output_dir: PathBuf,
    /// Formats to export.
    pub formats: Vec<ExportFormat>,
    /// Pretty-print the JSON export.
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        let fetch = FetchSettings::default();
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout_secs: fetch.timeout.as_secs(),
            concurrency: fetch.concurrency,
            channel_capacity: fetch.channel_capacity,
            max_retries: fetch.max_retries,
            retry_delay_secs: fetch.retry_delay.as_secs(),
            interactive_retry: true,
            output_dir: PathBuf::from("."),
            formats: vec![ExportFormat::Json, ExportFormat::Csv],
            pretty_json: false,
        }
    }
}

impl Settings {
    /// Returns the default settings file path.
    pub fn default_path() -> PathBuf {
        default_settings_path()
    }

    /// Loads settings from the default path.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(&Self::default_path()).await
    }

    /// Loads settings from `path`; a missing file gives defaults.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        match load_json::<Self>(path).await {
            Ok(settings) => {
                settings.validate()?;
                info!(path = %path.display(), "Loaded settings");
                Ok(settings)
            }
            Err(e) if e.is_not_found() => {
                debug!(path = %path.display(), "Settings file not found, using defaults");
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Saves settings to `path`.
    pub async fn save(&self, path: &Path) -> Result<(), StoreError> {
        self.validate()?;
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved settings");
        Ok(())
    }

    /// Checks value ranges.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.api_base_url.trim().is_empty() {
            return Err(StoreError::Config("api_base_url is empty".to_string()));
        }
        if self.concurrency == 0 {
            return Err(StoreError::Config("concurrency must be at least 1".to_string()));
        }
        if self.channel_capacity == 0 {
            return Err(StoreError::Config(
                "channel_capacity must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(StoreError::Config("timeout_secs must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Converts into fetch settings.
    pub fn fetch_settings(&self) -> FetchSettings {
        FetchSettings {
            api_base_url: self.api_base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            concurrency: self.concurrency,
            channel_capacity: self.channel_capacity,
            max_retries: self.max_retries,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
        }
    }

    /// Path of the export file for `format`.
    pub fn export_path(&self, format: ExportFormat) -> PathBuf {
        self.output_dir.join(format.file_name())
    }
}

// ============================================================================
// Tests
// ============================================================================
