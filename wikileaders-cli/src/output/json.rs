//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

use wikileaders_core::{Country, Dataset};

/// JSON formatter.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the dataset as `{ "<country>": [records] }`.
    pub fn format_dataset(&self, dataset: &Dataset) -> Result<String> {
        self.format(dataset)
    }

    /// Formats a country list as an array of codes.
    pub fn format_countries(&self, countries: &[Country]) -> Result<String> {
        self.format(&countries)
    }
}
