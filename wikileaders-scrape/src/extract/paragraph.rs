//! Lead paragraph extraction.
//!
//! The lead paragraph is the first `p` in the article body that contains a
//! bold term. Nested `div` blocks (infoboxes, hatnotes, navigation) are not
//! searched, and citation superscripts and hidden spans are left out of the
//! text.

use scraper::{ElementRef, Html, Node, Selector};
use tracing::{debug, instrument};

use wikileaders_core::{ContentLayout, Extraction};

use super::layout::{ContentLocator, parse_selector};
use crate::error::ExtractError;

/// Span classes whose content is never part of the prose.
const DECORATIVE_CLASSES: &[&str] = &["noprint", "mw-editsection", "mw-empty-elt"];

/// Elements whose content is never part of the prose.
const SKIPPED_ELEMENTS: &[&str] = &["sup", "style", "script"];

// ============================================================================
// Result
// ============================================================================

/// What the extractor found on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExtraction {
    /// Paragraph text (not normalized) or "not found".
    pub extraction: Extraction,
    /// Container rung used.
    pub layout: ContentLayout,
    /// Superscripts and decorative spans left out of the text.
    pub stripped: usize,
}

// ============================================================================
// Extractor
// ============================================================================

/// Locates and isolates the lead paragraph of a page.
#[derive(Debug, Clone)]
pub struct ParagraphExtractor {
    locator: ContentLocator,
    bold: Selector,
}

impl ParagraphExtractor {
    /// Compiles the selectors.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            locator: ContentLocator::new()?,
            bold: parse_selector("b")?,
        })
    }

    /// Extracts the lead paragraph from a raw page body.
    #[instrument(skip_all, fields(bytes = body.len()))]
    pub fn extract(&self, body: &str) -> PageExtraction {
        let document = Html::parse_document(body);
        let (layout, root) = self.locator.locate(&document);

        let mut paragraphs = Vec::new();
        collect_paragraphs(root, &mut paragraphs);

        let Some(lead) = paragraphs
            .into_iter()
            .find(|p| p.select(&self.bold).next().is_some())
        else {
            debug!(%layout, "No bold paragraph found");
            return PageExtraction {
                extraction: Extraction::NotFound,
                layout,
                stripped: 0,
            };
        };

        let mut text = String::new();
        let mut stripped = 0;
        collect_text(lead, &mut text, &mut stripped);
        if stripped > 0 {
            debug!(stripped, "Removed citation and decorative elements");
        }

        PageExtraction {
            extraction: Extraction::Found(text),
            layout,
            stripped,
        }
    }
}

/// Collects `p` elements in document order, without entering `div`s.
fn collect_paragraphs<'a>(element: ElementRef<'a>, out: &mut Vec<ElementRef<'a>>) {
    for child in element.children().filter_map(ElementRef::wrap) {
        match child.value().name() {
            "div" => {}
            "p" => out.push(child),
            _ => collect_paragraphs(child, out),
        }
    }
}

fn is_decorative(element: &ElementRef<'_>) -> bool {
    let value = element.value();
    if SKIPPED_ELEMENTS.contains(&value.name()) {
        return true;
    }
    if value.name() != "span" {
        return false;
    }
    if value.classes().any(|c| DECORATIVE_CLASSES.contains(&c)) {
        return true;
    }
    value.attr("style").is_some_and(|style| {
        style
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase()
            .contains("display:none")
    })
}

fn collect_text(element: ElementRef<'_>, out: &mut String, stripped: &mut usize) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    if is_decorative(&child) {
                        *stripped += 1;
                    } else {
                        collect_text(child, out, stripped);
                    }
                }
            }
            _ => {}
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(html: &str) -> PageExtraction {
        ParagraphExtractor::new().unwrap().extract(html)
    }

    #[test]
    fn test_first_bold_paragraph_wins() {
        let html = r#"
            <div class="mw-content-ltr mw-parser-output">
              <p>Intro without bold.</p>
              <p><b>Ada</b> was a mathematician.</p>
              <p><b>Later</b> paragraph.</p>
            </div>
        "#;
        let page = extract(html);
        assert_eq!(page.layout, ContentLayout::Forward);
        assert_eq!(
            page.extraction,
            Extraction::Found("Ada was a mathematician.".into())
        );
    }

    #[test]
    fn test_citations_are_dropped() {
        let html = r##"
            <div class="mw-content-ltr mw-parser-output">
              <p><b>Ada</b> was born in London.<sup class="reference"><a href="#c1">[1]</a></sup> She</p>
            </div>
        "##;
        let page = extract(html);
        assert_eq!(
            page.extraction,
            Extraction::Found("Ada was born in London. She".into())
        );
        assert_eq!(page.stripped, 1);
    }

    #[test]
    fn test_hidden_spans_are_dropped() {
        let html = r#"
            <p><b>Ada</b><span style="display: none">hidden</span> lived<span class="noprint"> (listen)</span>.</p>
        "#;
        let page = extract(html);
        assert_eq!(page.extraction, Extraction::Found("Ada lived.".into()));
        assert_eq!(page.stripped, 2);
    }

    #[test]
    fn test_nested_markup_keeps_text() {
        let html = r#"<p><b><a href="/wiki/Ada">Ada</a></b> was <i>very</i> <span>precise</span>.</p>"#;
        let page = extract(html);
        assert_eq!(page.layout, ContentLayout::WholeDocument);
        assert_eq!(page.extraction, Extraction::Found("Ada was very precise.".into()));
    }

    #[test]
    fn test_no_paragraph_is_not_found() {
        let page = extract("<html><body><h1>Empty</h1></body></html>");
        assert_eq!(page.extraction, Extraction::NotFound);
        assert_eq!(extract("").extraction, Extraction::NotFound);
    }
}
