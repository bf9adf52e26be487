//! CSV export: one row per leader.

use anyhow::{Context, Result};

use wikileaders_core::Dataset;

/// Column headers.
pub const HEADER: [&str; 3] = ["Country", "Leader", "First Paragraph"];

/// CSV formatter.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvFormatter;

impl CsvFormatter {
    /// Creates a new CSV formatter.
    pub fn new() -> Self {
        Self
    }

    /// Formats the dataset, countries and leaders in dataset order.
    ///
    /// A record without a paragraph gets an empty cell.
    pub fn format_dataset(&self, dataset: &Dataset) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(HEADER)?;

        for (country, records) in dataset.iter() {
            for record in records {
                writer.write_record([
                    country.code(),
                    record.full_name().as_str(),
                    record.paragraph.as_deref().unwrap_or(""),
                ])?;
            }
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush CSV: {}", e.error()))?;
        String::from_utf8(bytes).context("CSV output is not UTF-8")
    }
}
