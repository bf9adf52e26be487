//! Text output: the flat export, the run preview and the run summary.

use std::fmt::Write as _;

use wikileaders_core::{Country, Dataset, LeaderRecord, RecordStatus};
use wikileaders_scrape::ScrapeReport;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Written in place of a missing paragraph in the text export.
pub const PLACEHOLDER: &str = "[no paragraph found]";

/// Shown in the preview for a page without a lead paragraph.
pub const NOTHING_FOUND: &str = "!!! NOTHING FOUND !!!";

/// Characters of the paragraph shown in the preview.
const PREVIEW_CHARS: usize = 70;

/// First characters of a paragraph followed by `...`, or the not-found marker.
pub fn preview(paragraph: Option<&str>) -> String {
    match paragraph {
        Some(text) => {
            let head: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        }
        None => NOTHING_FOUND.to_string(),
    }
}

/// Text formatter with optional colors.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats the flat export: `<first> <last>: <paragraph>` per line.
    pub fn format_dataset(&self, dataset: &Dataset) -> String {
        let mut out = String::new();
        for (_, records) in dataset.iter() {
            for record in records {
                let _ = writeln!(
                    out,
                    "{}: {}",
                    record.full_name(),
                    record.paragraph.as_deref().unwrap_or(PLACEHOLDER)
                );
            }
        }
        out
    }

    /// Formats the per-country preview shown after a run.
    pub fn format_preview(&self, dataset: &Dataset) -> String {
        let mut lines = Vec::new();

        for (country, records) in dataset.iter() {
            lines.push(String::new());
            lines.push(self.bold(&format!("    country: {}", country.display_code())));
            for record in records {
                lines.push(String::new());
                lines.push(self.format_record(record));
            }
        }

        lines.join("\n")
    }

    fn format_record(&self, record: &LeaderRecord) -> String {
        let body = match &record.status {
            RecordStatus::FetchFailed(reason) => self.red(&format!("fetch failed: {reason}")),
            RecordStatus::NotFound | RecordStatus::Pending => self.yellow(&preview(None)),
            RecordStatus::Extracted => preview(record.paragraph.as_deref()),
        };
        format!("{}: {}", record.leader.first_name, body)
    }

    /// Formats the run summary line.
    pub fn format_report(&self, report: &ScrapeReport) -> String {
        let summary = &report.summary;
        let elapsed = report.elapsed().num_milliseconds();

        let mut line = format!(
            "{} leaders in {} countries: {} extracted",
            summary.leaders,
            summary.countries,
            self.green(&summary.extracted.to_string())
        );
        if summary.not_found > 0 {
            let _ = write!(line, ", {} not found", self.yellow(&summary.not_found.to_string()));
        }
        if summary.failed > 0 {
            let _ = write!(line, ", {} failed", self.red(&summary.failed.to_string()));
        }
        let _ = write!(line, " {}", self.dim(&format!("({elapsed} ms)")));
        line
    }

    /// Formats a country list, one code per line.
    pub fn format_countries(&self, countries: &[Country]) -> String {
        let mut lines = vec![self.bold(&format!("{} countries", countries.len()))];
        lines.extend(countries.iter().map(|c| format!("  {}", c.code())));
        lines.join("\n")
    }

    // ========================================================================
    // Color Helpers
    // ========================================================================

    fn paint(&self, color: &str, text: &str) -> String {
        if self.use_colors {
            format!("{color}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}
