//! Content container lookup.

use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use wikileaders_core::ContentLayout;

use crate::error::ExtractError;

const FORWARD_SELECTOR: &str = "div.mw-content-ltr.mw-parser-output";
const REVERSE_SELECTOR: &str = "div.mw-content-rtl.mw-parser-output";

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, ExtractError> {
    Selector::parse(selector).map_err(|e| ExtractError::Selector {
        selector: selector.to_string(),
        reason: format!("{e:?}"),
    })
}

/// Finds the article body of a page.
///
/// Tries the left-to-right container, then the right-to-left one, then
/// falls back to the whole document.
#[derive(Debug, Clone)]
pub struct ContentLocator {
    forward: Selector,
    reverse: Selector,
}

impl ContentLocator {
    /// Compiles the container selectors.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            forward: parse_selector(FORWARD_SELECTOR)?,
            reverse: parse_selector(REVERSE_SELECTOR)?,
        })
    }

    /// Returns the content root and the rung that produced it.
    pub fn locate<'a>(&self, document: &'a Html) -> (ContentLayout, ElementRef<'a>) {
        if let Some(container) = document.select(&self.forward).next() {
            return (ContentLayout::Forward, container);
        }
        if let Some(container) = document.select(&self.reverse).next() {
            debug!("Using right-to-left content container");
            return (ContentLayout::Reverse, container);
        }
        debug!("No content container, searching whole document");
        (ContentLayout::WholeDocument, document.root_element())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_of(html: &str) -> ContentLayout {
        let locator = ContentLocator::new().unwrap();
        let document = Html::parse_document(html);
        locator.locate(&document).0
    }

    #[test]
    fn test_forward_preferred() {
        let html = r#"
            <div class="mw-content-rtl mw-parser-output"><p>r</p></div>
            <div class="mw-content-ltr mw-parser-output"><p>l</p></div>
        "#;
        assert_eq!(layout_of(html), ContentLayout::Forward);
    }

    #[test]
    fn test_reverse_only() {
        let html = r#"<div class="mw-parser-output mw-content-rtl"><p>r</p></div>"#;
        assert_eq!(layout_of(html), ContentLayout::Reverse);
    }

    #[test]
    fn test_partial_class_match_falls_through() {
        let html = r#"<div class="mw-content-ltr"><p>l</p></div>"#;
        assert_eq!(layout_of(html), ContentLayout::WholeDocument);
    }
}
