//! Country codes and operator selection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Country
// ============================================================================

/// A two-letter country code, stored lowercase (`"fr"`, `"us"`).
///
/// The leaders API is the authority on which codes exist; this type only
/// guarantees the shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Country(String);

impl Country {
    /// Parses a country code, ignoring surrounding whitespace and case.
    pub fn new(code: &str) -> Result<Self, CoreError> {
        let code = code.trim().to_ascii_lowercase();
        if code.len() == 2 && code.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(code))
        } else {
            Err(CoreError::InvalidCountry(code))
        }
    }

    /// Returns the lowercase code, as sent to the API.
    pub fn code(&self) -> &str {
        &self.0
    }

    /// Returns the uppercase code, for display.
    pub fn display_code(&self) -> String {
        self.0.to_ascii_uppercase()
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Country {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Country {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<Country> for String {
    fn from(country: Country) -> Self {
        country.0
    }
}

// ============================================================================
// Country Selection
// ============================================================================

/// Which countries the operator asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CountrySelection {
    /// Every country the API supports.
    All,
    /// An explicit list, in the order given.
    Codes(Vec<Country>),
}

impl CountrySelection {
    /// Parses operator input.
    ///
    /// Accepts the literal `all` or a comma-separated list of codes. Spaces
    /// and case are ignored; tokens that are not two-letter codes are dropped.
    pub fn parse(input: &str) -> Self {
        let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
        let compact = compact.to_ascii_lowercase();

        if compact == "all" {
            return Self::All;
        }

        let codes = compact
            .split(',')
            .filter(|token| !token.is_empty())
            .filter_map(|token| Country::new(token).ok())
            .collect();

        Self::Codes(codes)
    }

    /// Resolves the selection against the countries the API supports.
    ///
    /// Unsupported codes are dropped and duplicates collapse to their first
    /// occurrence. Fails with [`CoreError::EmptySelection`] when nothing is left.
    pub fn resolve(&self, available: &[Country]) -> Result<Vec<Country>, CoreError> {
        let resolved: Vec<Country> = match self {
            Self::All => available.to_vec(),
            Self::Codes(codes) => {
                let mut picked: Vec<Country> = Vec::with_capacity(codes.len());
                for code in codes {
                    if available.contains(code) && !picked.contains(code) {
                        picked.push(code.clone());
                    }
                }
                picked
            }
        };

        if resolved.is_empty() {
            return Err(CoreError::EmptySelection);
        }
        Ok(resolved)
    }
}

// ============================================================================
// Tests
// ============================================================================
