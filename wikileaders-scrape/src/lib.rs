// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # WikiLeaders Scrape
//!
//! Turns leader pages into clean lead paragraphs.
//!
//! - [`extract::ParagraphExtractor`] - Finds the first bold paragraph of a page
//! - [`normalize::TextNormalizer`] - Strips citations and pronunciations, tidies spacing
//! - [`pipeline::ScrapePipeline`] - Populates and enriches a [`wikileaders_core::Dataset`]
//!
//! ## Example
//!
//! ```ignore
//! use wikileaders_fetch::SessionContext;
//! use wikileaders_scrape::ScrapePipeline;
//!
//! let pipeline = ScrapePipeline::new(&SessionContext::new()?)?;
//! let session = pipeline.open_session().await?;
//! let (dataset, report) = pipeline.run(&session.countries, &session.handle).await?;
//! println!("{} paragraphs", report.summary.extracted);
//! ```

pub mod error;
pub mod extract;
pub mod normalize;
pub mod pipeline;

pub use error::{ExtractError, ScrapeError};
pub use extract::{ContentLocator, PageExtraction, ParagraphExtractor};
pub use normalize::{NormalizationRule, TextNormalizer};
pub use pipeline::{LayoutCounts, ScrapePipeline, ScrapeReport, Session};
