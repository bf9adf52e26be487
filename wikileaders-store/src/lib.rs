// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # WikiLeaders Store
//!
//! Settings and file persistence for the WikiLeaders scraper.
//!
//! - **Settings**: User preferences persisted as JSON, convertible to fetch settings
//! - **Persistence**: Atomic file writes and JSON helpers
//!
//! ## Usage
//!
//! ```ignore
//! use wikileaders_store::Settings;
//!
//! let settings = Settings::load_default().await?;
//! let ctx = SessionContext::builder()
//!     .settings(settings.fetch_settings())
//!     .build()?;
//! ```

pub mod error;
pub mod persistence;
pub mod settings;

pub use error::StoreError;
pub use persistence::{
    default_config_dir, default_settings_path, ensure_dir, load_json, save_json, save_text,
};
pub use settings::{ExportFormat, Settings};
#[cfg(test)]
mod persistence_tests;
