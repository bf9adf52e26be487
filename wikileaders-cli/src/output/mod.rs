//! Output formatting and export files.

mod csv;
mod json;
mod text;

pub use self::csv::CsvFormatter;
pub use json::JsonFormatter;
pub use text::TextFormatter;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::info;

use wikileaders_core::Dataset;
use wikileaders_store::{ExportFormat, ensure_dir, save_text};

/// Renders the dataset in one export format.
pub fn render(dataset: &Dataset, format: ExportFormat, pretty_json: bool) -> Result<String> {
    match format {
        ExportFormat::Json => JsonFormatter::new(pretty_json).format_dataset(dataset),
        ExportFormat::Csv => CsvFormatter::new().format_dataset(dataset),
        ExportFormat::Text => Ok(TextFormatter::new(false).format_dataset(dataset)),
    }
}

/// Writes one file per format into `dir` and returns the paths written.
pub async fn export(
    dataset: &Dataset,
    formats: &[ExportFormat],
    dir: &Path,
    pretty_json: bool,
) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)
        .await
        .with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = dir.join(format.file_name());
        if written.contains(&path) {
            continue;
        }
        let contents = render(dataset, format, pretty_json)?;
        save_text(&path, &contents)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!(%format, path = %path.display(), "Exported");
        written.push(path);
    }
    Ok(written)
}
