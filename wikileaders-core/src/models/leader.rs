//! Leader metadata and enriched records.

use serde::{Deserialize, Serialize};

// ============================================================================
// Leader Skeleton
// ============================================================================

/// A leader as returned by the leaders API.
///
/// Only the name and `wikipedia_url` are required; the other fields are
/// carried through to the JSON export when the API provides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderSkeleton {
    /// API identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Birth date, as the API formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Death date, as the API formats it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    /// Place of birth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_of_birth: Option<String>,
    /// Encyclopedia page of this leader.
    pub wikipedia_url: String,
    /// Start of mandate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_mandate: Option<String>,
    /// End of mandate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_mandate: Option<String>,
}

impl LeaderSkeleton {
    /// Creates a skeleton with only the required fields.
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        wikipedia_url: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            birth_date: None,
            death_date: None,
            place_of_birth: None,
            wikipedia_url: wikipedia_url.into(),
            start_mandate: None,
            end_mandate: None,
        }
    }

    /// Returns `"first last"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

// ============================================================================
// Record Status
// ============================================================================

/// Where a record stands in the enrichment pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RecordStatus {
    /// Not enriched yet.
    #[default]
    Pending,
    /// A lead paragraph was extracted.
    Extracted,
    /// The page had no qualifying paragraph.
    NotFound,
    /// The page could not be retrieved.
    FetchFailed(String),
}

impl RecordStatus {
    /// Returns true once the record left the pending state.
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

// ============================================================================
// Leader Record
// ============================================================================

/// A leader enriched with its lead paragraph.
///
/// Serializes flat: the API fields followed by `paragraph` (null when absent).
/// The pipeline status is in-memory bookkeeping and is never exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderRecord {
    /// API metadata.
    #[serde(flatten)]
    pub leader: LeaderSkeleton,
    /// Normalized lead paragraph.
    #[serde(default)]
    pub paragraph: Option<String>,
    /// Pipeline status.
    #[serde(skip)]
    pub status: RecordStatus,
}

impl LeaderRecord {
    /// Wraps a skeleton in a pending record.
    pub fn pending(leader: LeaderSkeleton) -> Self {
        Self {
            leader,
            paragraph: None,
            status: RecordStatus::Pending,
        }
    }

    /// Returns `"first last"`.
    pub fn full_name(&self) -> String {
        self.leader.full_name()
    }

    /// Returns the page to fetch for this record.
    pub fn document_url(&self) -> &str {
        &self.leader.wikipedia_url
    }
}
