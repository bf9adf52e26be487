//! Lead paragraph extraction.
//!
//! - [`layout`] - Content container lookup (ltr, rtl, whole document)
//! - [`paragraph`] - First bold paragraph and its plain text

pub mod layout;
pub mod paragraph;

pub use layout::ContentLocator;
pub use paragraph::{PageExtraction, ParagraphExtractor};
