//! Paragraph text normalization.
//!
//! An ordered list of rewrite rules. Every rule either leaves its input
//! unchanged or makes it strictly shorter, so repeating the whole sequence
//! until nothing changes terminates, and the result is a fixed point:
//! normalizing twice gives the same text as normalizing once.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;
use tracing::debug;

// ============================================================================
// Regex Patterns
// ============================================================================

/// Citation markers such as `[12]` or `[note 3]`.
static CITATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("Invalid regex"));

/// Pronunciation parentheticals such as `(/ʒɑ̃/; born 1950)`.
static PRONUNCIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(/[^)]*\)").expect("Invalid regex"));

/// Parentheses holding nothing but spaces and commas.
static EMPTY_PARENS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\( *(?:, *)*\)").expect("Invalid regex"));

/// Two or more spaces.
static SPACE_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" {2,}").expect("Invalid regex"));

/// A comma with an optional leading space and trailing duplicate commas.
static COMMA_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ?,(?: *,)*").expect("Invalid regex"));

/// An opening parenthesis followed by a stray comma.
static PAREN_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\( *, *").expect("Invalid regex"));

// ============================================================================
// Rules
// ============================================================================

/// One normalization step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationRule {
    /// Delete `[...]` citation markers.
    StripCitations,
    /// Delete `(/.../)` pronunciation parentheticals and empty parentheses.
    StripPronunciations,
    /// Collapse runs of spaces into one.
    CollapseSpaces,
    /// Collapse ` ,` and `, ,` runs into a single comma.
    CollapseCommas,
    /// Turn `(,` into `(`.
    TrimParenComma,
    /// Trim surrounding whitespace.
    Trim,
}

impl NormalizationRule {
    /// Every rule, in application order.
    pub const ALL: [Self; 6] = [
        Self::StripCitations,
        Self::StripPronunciations,
        Self::CollapseSpaces,
        Self::CollapseCommas,
        Self::TrimParenComma,
        Self::Trim,
    ];

    /// Applies this rule once.
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Self::StripCitations => CITATION_RE.replace_all(text, ""),
            Self::StripPronunciations => match PRONUNCIATION_RE.replace_all(text, "") {
                Cow::Borrowed(t) => EMPTY_PARENS_RE.replace_all(t, ""),
                Cow::Owned(t) => Cow::Owned(EMPTY_PARENS_RE.replace_all(&t, "").into_owned()),
            },
            Self::CollapseSpaces => SPACE_RUN_RE.replace_all(text, " "),
            Self::CollapseCommas => COMMA_RUN_RE.replace_all(text, ","),
            Self::TrimParenComma => PAREN_COMMA_RE.replace_all(text, "("),
            Self::Trim => Cow::Borrowed(text.trim()),
        }
    }
}

// ============================================================================
// Normalizer
// ============================================================================

/// Applies a rule sequence to a fixed point.
#[derive(Debug, Clone)]
pub struct TextNormalizer {
    rules: Vec<NormalizationRule>,
}

impl TextNormalizer {
    /// Creates a normalizer with every rule.
    pub fn new() -> Self {
        Self {
            rules: NormalizationRule::ALL.to_vec(),
        }
    }

    /// Applies every rule once, in order.
    pub fn apply_once(&self, text: &str) -> String {
        self.rules
            .iter()
            .fold(text.to_string(), |acc, rule| rule.apply(&acc).into_owned())
    }

    /// Applies the rule sequence until the text stops changing.
    pub fn normalize(&self, text: &str) -> String {
        let mut current = text.to_string();
        let mut passes = 0u32;
        loop {
            passes += 1;
            let next = self.apply_once(&current);
            if next == current {
                break;
            }
            current = next;
        }

        let removed = text.chars().count() - current.chars().count();
        if removed > 0 {
            debug!(removed, passes, "Normalized paragraph");
        }
        current
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================
