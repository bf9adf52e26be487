//! Domain models for `WikiLeaders`.
//!
//! ## Submodules
//!
//! - [`country`] - Country codes and operator selection
//! - [`leader`] - Leader metadata and enriched records
//! - [`dataset`] - The per-country dataset and its slots
//! - [`extraction`] - Lead paragraph search results

mod country;
mod dataset;
mod extraction;
mod leader;

pub use country::{Country, CountrySelection};
pub use dataset::{Dataset, DatasetSummary, FetchedDocument, Slot};
pub use extraction::{ContentLayout, Extraction};
pub use leader::{LeaderRecord, LeaderSkeleton, RecordStatus};
