//! The per-country dataset.
//!
//! A [`Dataset`] maps each country to the leaders the API returned for it, in
//! API order. Records are addressed by [`Slot`]s, so enrichment of one record
//! never touches another. Raw page bodies travel separately as
//! [`FetchedDocument`] values and never enter the dataset.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

use super::country::Country;
use super::leader::{LeaderRecord, LeaderSkeleton, RecordStatus};
use crate::error::CoreError;

// ============================================================================
// Slot
// ============================================================================

/// Address of one record: a country and a position within it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Slot {
    /// Country the record belongs to.
    pub country: Country,
    /// Position in the country's leader list.
    pub index: usize,
}

impl Slot {
    /// Creates a slot.
    pub fn new(country: Country, index: usize) -> Self {
        Self { country, index }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.country, self.index)
    }
}

// ============================================================================
// Fetched Document
// ============================================================================

/// A raw page body retrieved for one slot.
///
/// Write-once: built by the fetcher, consumed by extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    slot: Slot,
    url: String,
    body: String,
}

impl FetchedDocument {
    /// Creates a fetched document.
    pub fn new(slot: Slot, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            slot,
            url: url.into(),
            body: body.into(),
        }
    }

    /// Slot this document belongs to.
    pub fn slot(&self) -> &Slot {
        &self.slot
    }

    /// URL the body was retrieved from.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw markup.
    pub fn body(&self) -> &str {
        &self.body
    }
}

// ============================================================================
// Dataset
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
struct CountryEntry {
    country: Country,
    leaders: Vec<LeaderRecord>,
}

/// Per-country collection of leader records, in insertion order.
///
/// A country key exists only once its leader list was retrieved, and a
/// country's records are never reordered after population.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dataset {
    entries: Vec<CountryEntry>,
}

/// Counts of records per pipeline status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DatasetSummary {
    /// Populated countries.
    pub countries: usize,
    /// Total leader records.
    pub leaders: usize,
    /// Records with a paragraph.
    pub extracted: usize,
    /// Records whose page had no qualifying paragraph.
    pub not_found: usize,
    /// Records whose page could not be retrieved.
    pub failed: usize,
    /// Records not enriched yet.
    pub pending: usize,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Populates a country with its leaders, in API order.
    pub fn insert_country(
        &mut self,
        country: Country,
        leaders: Vec<LeaderSkeleton>,
    ) -> Result<(), CoreError> {
        if self.contains(&country) {
            return Err(CoreError::DuplicateCountry(country.to_string()));
        }

        self.entries.push(CountryEntry {
            country,
            leaders: leaders.into_iter().map(LeaderRecord::pending).collect(),
        });
        Ok(())
    }

    /// Returns true if the country was populated.
    pub fn contains(&self, country: &Country) -> bool {
        self.entries.iter().any(|e| &e.country == country)
    }

    /// Returns a country's records.
    pub fn leaders(&self, country: &Country) -> Option<&[LeaderRecord]> {
        self.entries
            .iter()
            .find(|e| &e.country == country)
            .map(|e| e.leaders.as_slice())
    }

    /// Populated countries, in insertion order.
    pub fn countries(&self) -> impl Iterator<Item = &Country> {
        self.entries.iter().map(|e| &e.country)
    }

    /// Iterates `(country, records)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Country, &[LeaderRecord])> {
        self.entries
            .iter()
            .map(|e| (&e.country, e.leaders.as_slice()))
    }

    /// Number of populated countries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no country was populated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the record at `slot`.
    pub fn record(&self, slot: &Slot) -> Option<&LeaderRecord> {
        self.leaders(&slot.country)
            .and_then(|leaders| leaders.get(slot.index))
    }

    fn record_mut(&mut self, slot: &Slot) -> Result<&mut LeaderRecord, CoreError> {
        self.entries
            .iter_mut()
            .find(|e| e.country == slot.country)
            .and_then(|e| e.leaders.get_mut(slot.index))
            .ok_or_else(|| CoreError::UnknownSlot {
                country: slot.country.to_string(),
                index: slot.index,
            })
    }

    /// Slots still waiting for their page, with the URL to fetch.
    pub fn pending_documents(&self) -> Vec<(Slot, String)> {
        self.entries
            .iter()
            .flat_map(|entry| {
                entry
                    .leaders
                    .iter()
                    .enumerate()
                    .filter(|(_, record)| !record.status.is_settled())
                    .map(|(index, record)| {
                        (
                            Slot::new(entry.country.clone(), index),
                            record.document_url().to_string(),
                        )
                    })
            })
            .collect()
    }

    /// Stores an extraction result. `None` records a "not found".
    pub fn set_paragraph(
        &mut self,
        slot: &Slot,
        paragraph: Option<String>,
    ) -> Result<(), CoreError> {
        let record = self.record_mut(slot)?;
        record.status = if paragraph.is_some() {
            RecordStatus::Extracted
        } else {
            RecordStatus::NotFound
        };
        record.paragraph = paragraph;
        Ok(())
    }

    /// Records that the page for `slot` could not be retrieved.
    pub fn mark_failed(&mut self, slot: &Slot, reason: impl Into<String>) -> Result<(), CoreError> {
        let record = self.record_mut(slot)?;
        record.status = RecordStatus::FetchFailed(reason.into());
        record.paragraph = None;
        Ok(())
    }

    /// Counts records per status.
    pub fn summary(&self) -> DatasetSummary {
        let mut summary = DatasetSummary {
            countries: self.entries.len(),
            ..DatasetSummary::default()
        };

        for record in self.entries.iter().flat_map(|e| &e.leaders) {
            summary.leaders += 1;
            match record.status {
                RecordStatus::Pending => summary.pending += 1,
                RecordStatus::Extracted => summary.extracted += 1,
                RecordStatus::NotFound => summary.not_found += 1,
                RecordStatus::FetchFailed(_) => summary.failed += 1,
            }
        }

        summary
    }
}

/// Serializes as `{ "<country>": [record, ...], ... }` in insertion order.
impl Serialize for Dataset {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(entry.country.code(), &entry.leaders)?;
        }
        map.end()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn country(code: &str) -> Country {
        Country::new(code).unwrap()
    }

    fn leaders(names: &[&str]) -> Vec<LeaderSkeleton> {
        names
            .iter()
            .map(|n| LeaderSkeleton::new(*n, "Doe", format!("https://wiki.test/{n}")))
            .collect()
    }

    #[test]
    fn test_insert_preserves_order() {
        let mut dataset = Dataset::new();
        dataset.insert_country(country("us"), leaders(&["b", "a", "c"])).unwrap();
        dataset.insert_country(country("fr"), leaders(&["z"])).unwrap();

        let names: Vec<_> = dataset
            .leaders(&country("us"))
            .unwrap()
            .iter()
            .map(|r| r.leader.first_name.as_str())
            .collect();
        assert_eq!(names, ["b", "a", "c"]);

        let order: Vec<_> = dataset.countries().map(Country::code).collect();
        assert_eq!(order, ["us", "fr"]);
    }

    #[test]
    fn test_duplicate_country_rejected() {
        let mut dataset = Dataset::new();
        dataset.insert_country(country("us"), leaders(&["a"])).unwrap();
        let err = dataset.insert_country(country("us"), leaders(&["a"])).unwrap_err();
        assert_eq!(err, CoreError::DuplicateCountry("us".to_string()));
        assert_eq!(dataset.leaders(&country("us")).unwrap().len(), 1);
    }

    #[test]
    fn test_pending_documents_skip_settled() {
        let mut dataset = Dataset::new();
        dataset.insert_country(country("us"), leaders(&["a", "b"])).unwrap();
        dataset
            .set_paragraph(&Slot::new(country("us"), 0), Some("text".into()))
            .unwrap();

        let pending = dataset.pending_documents();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].0, Slot::new(country("us"), 1));
        assert_eq!(pending[0].1, "https://wiki.test/b");
    }

    #[test]
    fn test_unknown_slot() {
        let mut dataset = Dataset::new();
        dataset.insert_country(country("us"), leaders(&["a"])).unwrap();

        let err = dataset
            .set_paragraph(&Slot::new(country("us"), 5), None)
            .unwrap_err();
        assert!(matches!(err, CoreError::UnknownSlot { index: 5, .. }));
        assert!(dataset.mark_failed(&Slot::new(country("fr"), 0), "x").is_err());
    }

    #[test]
    fn test_summary_counts() {
        let mut dataset = Dataset::new();
        dataset.insert_country(country("us"), leaders(&["a", "b", "c", "d"])).unwrap();
        let us = |i| Slot::new(country("us"), i);
        dataset.set_paragraph(&us(0), Some("p".into())).unwrap();
        dataset.set_paragraph(&us(1), None).unwrap();
        dataset.mark_failed(&us(2), "HTTP 404").unwrap();

        let summary = dataset.summary();
        assert_eq!(summary.countries, 1);
        assert_eq!(summary.leaders, 4);
        assert_eq!(summary.extracted, 1);
        assert_eq!(summary.not_found, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.pending, 1);
    }

    #[test]
    fn test_slot_display() {
        assert_eq!(Slot::new(country("ma"), 3).to_string(), "ma[3]");
    }
}
