//! Core error types for `WikiLeaders`.

use thiserror::Error;

/// Core error type for `WikiLeaders` model operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Not a two-letter country code.
    #[error("Invalid country code: {0:?}")]
    InvalidCountry(String),

    /// Selection resolved to no supported country.
    #[error("No supported country selected")]
    EmptySelection,

    /// Country was already populated.
    #[error("Country already populated: {0}")]
    DuplicateCountry(String),

    /// Slot does not address a record.
    #[error("No record at {country}[{index}]")]
    UnknownSlot {
        /// Country code of the slot.
        country: String,
        /// Position within the country.
        index: usize,
    },
}
