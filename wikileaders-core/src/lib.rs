// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `WikiLeaders` Core
//!
//! Core types and models shared by every `WikiLeaders` crate.
//!
//! ## Key Types
//!
//! ### Countries
//! - [`Country`] - Two-letter country code as served by the leaders API
//! - [`CountrySelection`] - Operator choice of countries (`all` or a list)
//!
//! ### Leaders
//! - [`LeaderSkeleton`] - Leader metadata as returned by the API
//! - [`LeaderRecord`] - A leader plus its extracted lead paragraph
//! - [`RecordStatus`] - Where a record stands in the enrichment pipeline
//!
//! ### Dataset
//! - [`Dataset`] - Per-country, insertion-ordered collection of records
//! - [`Slot`] - Address of one record, `(country, index)`
//! - [`FetchedDocument`] - Immutable raw page body bound to a slot
//!
//! ### Extraction
//! - [`Extraction`] - Lead paragraph text or "not found"
//! - [`ContentLayout`] - Which container the paragraph came from

pub mod error;
pub mod models;

pub use error::CoreError;

pub use models::{
    // Countries
    Country,
    CountrySelection,
    // Leaders
    LeaderRecord,
    LeaderSkeleton,
    RecordStatus,
    // Dataset
    Dataset,
    DatasetSummary,
    FetchedDocument,
    Slot,
    // Extraction
    ContentLayout,
    Extraction,
};
