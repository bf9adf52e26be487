//! Extraction results.

use std::fmt;

/// Which content container the lead paragraph was searched in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentLayout {
    /// Left-to-right article body.
    Forward,
    /// Right-to-left article body.
    Reverse,
    /// No known container; the whole document was searched.
    WholeDocument,
}

impl fmt::Display for ContentLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Forward => "ltr",
            Self::Reverse => "rtl",
            Self::WholeDocument => "document",
        })
    }
}

/// Outcome of searching a page for its lead paragraph.
///
/// `NotFound` is an ordinary result, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Plain text of the lead paragraph.
    Found(String),
    /// The page has no qualifying paragraph.
    NotFound,
}

impl Extraction {
    /// Returns the paragraph text, if any.
    pub fn into_paragraph(self) -> Option<String> {
        match self {
            Self::Found(text) => Some(text),
            Self::NotFound => None,
        }
    }

    /// Applies `f` to the found text.
    #[must_use]
    pub fn map_text(self, f: impl FnOnce(String) -> String) -> Self {
        match self {
            Self::Found(text) => Self::Found(f(text)),
            Self::NotFound => Self::NotFound,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_paragraph() {
        assert_eq!(
            Extraction::Found("x".into()).into_paragraph().as_deref(),
            Some("x")
        );
        assert!(Extraction::NotFound.into_paragraph().is_none());
    }

    #[test]
    fn test_map_text_keeps_not_found() {
        let mapped = Extraction::NotFound.map_text(|t| t.to_uppercase());
        assert_eq!(mapped, Extraction::NotFound);
        let mapped = Extraction::Found("ab".into()).map_text(|t| t.to_uppercase());
        assert_eq!(mapped, Extraction::Found("AB".into()));
    }

    #[test]
    fn test_layout_display() {
        assert_eq!(ContentLayout::Reverse.to_string(), "rtl");
    }
}
