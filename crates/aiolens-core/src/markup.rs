//! Markup access for the analysis core
//!
//! The scorers never touch an HTML parser directly. They work through
//! [`MarkupProvider`], which [`ScraperDocument`] implements on top of
//! `scraper`. Absent elements and attributes come back as `None` or empty
//! collections, never as errors.

use scraper::{ElementRef, Html, Selector};
use serde_json::Value as JsonValue;
use tracing::debug;

/// Capability interface over a parsed document
pub trait MarkupProvider {
    /// Detach every element matching `selector` (and its subtree)
    fn remove(&mut self, selector: &str);

    /// Visible text of each element matching `selector`, in document order
    ///
    /// Text nodes are trimmed and joined with a single space; empty nodes
    /// are skipped.
    fn texts(&self, selector: &str) -> Vec<String>;

    /// Value of `attr` for each element matching `selector`
    fn attr_values(&self, selector: &str, attr: &str) -> Vec<Option<String>>;

    /// Number of elements matching `selector`
    fn count(&self, selector: &str) -> usize;

    /// Visible text of the whole document
    ///
    /// Only consulted when no `body` element exists. HTML parsers that
    /// synthesise a `body` (as `scraper` does) never reach it.
    fn document_text(&self) -> String;

    /// Markup the document was parsed from
    fn source(&self) -> &str;

    fn first_text(&self, selector: &str) -> Option<String> {
        self.texts(selector).into_iter().next()
    }

    /// First value of `attr` on the first matching element, trimmed
    fn attr(&self, selector: &str, attr: &str) -> Option<String> {
        self.attr_values(selector, attr)
            .into_iter()
            .next()
            .flatten()
            .map(|value| value.trim().to_string())
    }
}

/// [`MarkupProvider`] backed by a `scraper` document
#[derive(Debug, Clone)]
pub struct ScraperDocument {
    source: String,
    html: Html,
}

impl ScraperDocument {
    pub fn parse(source: impl Into<String>) -> Self {
        let source = source.into();
        let html = Html::parse_document(&source);
        Self { source, html }
    }

    fn selector(selector: &str) -> Option<Selector> {
        match Selector::parse(selector) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(selector, error = ?err, "ignoring unparsable selector");
                None
            }
        }
    }
}

fn visible_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl MarkupProvider for ScraperDocument {
    fn remove(&mut self, selector: &str) {
        let Some(selector) = Self::selector(selector) else {
            return;
        };
        let ids: Vec<_> = self.html.select(&selector).map(|el| el.id()).collect();
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
            }
        }
    }

    fn texts(&self, selector: &str) -> Vec<String> {
        let Some(selector) = Self::selector(selector) else {
            return Vec::new();
        };
        self.html.select(&selector).map(visible_text).collect()
    }

    fn attr_values(&self, selector: &str, attr: &str) -> Vec<Option<String>> {
        let Some(selector) = Self::selector(selector) else {
            return Vec::new();
        };
        self.html
            .select(&selector)
            .map(|el| el.value().attr(attr).map(str::to_string))
            .collect()
    }

    fn count(&self, selector: &str) -> usize {
        Self::selector(selector)
            .map(|selector| self.html.select(&selector).count())
            .unwrap_or(0)
    }

    fn document_text(&self) -> String {
        visible_text(self.html.root_element())
    }

    fn source(&self) -> &str {
        &self.source
    }
}

/// Collect `@type` values from JSON-LD script blocks
///
/// Blocks that fail to parse are skipped; they still count as structured
/// data for presence checks.
pub fn json_ld_types(blocks: &[String]) -> Vec<String> {
    let mut types = Vec::new();
    for block in blocks {
        let parsed: JsonValue = match serde_json::from_str(block) {
            Ok(parsed) => parsed,
            Err(err) => {
                debug!(error = %err, "skipping unparsable JSON-LD block");
                continue;
            }
        };
        match parsed {
            JsonValue::Object(obj) => push_type(obj.get("@type"), &mut types),
            JsonValue::Array(items) => {
                for item in items {
                    if let JsonValue::Object(obj) = item {
                        push_type(obj.get("@type"), &mut types);
                    }
                }
            }
            _ => {}
        }
    }
    types
}

fn push_type(value: Option<&JsonValue>, types: &mut Vec<String>) {
    match value {
        Some(JsonValue::String(s)) => types.push(s.clone()),
        Some(JsonValue::Array(arr)) => {
            types.extend(arr.iter().filter_map(|t| t.as_str()).map(str::to_string));
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texts_join_trimmed_text_nodes() {
        let doc = ScraperDocument::parse(
            "<html><body><p>  Hello <b>bold</b>\n world </p><p></p></body></html>",
        );
        assert_eq!(doc.texts("p"), vec!["Hello bold world".to_string(), String::new()]);
    }

    #[test]
    fn remove_detaches_matching_subtrees() {
        let mut doc = ScraperDocument::parse(
            "<html><body><nav>Menu</nav><p>Body text</p><script>var x;</script></body></html>",
        );
        doc.remove("nav, script");
        assert_eq!(doc.count("nav"), 0);
        assert_eq!(doc.document_text(), "Body text");
    }

    #[test]
    fn removal_only_affects_the_copy() {
        let original = ScraperDocument::parse("<html><body><nav>Menu</nav><p>Text</p></body></html>");
        let mut copy = original.clone();
        copy.remove("nav");
        assert_eq!(original.count("nav"), 1);
        assert_eq!(copy.count("nav"), 0);
    }

    #[test]
    fn absent_attributes_are_none() {
        let doc = ScraperDocument::parse(
            r#"<html><head><meta name="description"><link rel="canonical" href=" https://a.test/ "></head></html>"#,
        );
        assert_eq!(doc.attr(r#"meta[name="description"]"#, "content"), None);
        assert_eq!(doc.attr(r#"meta[name="keywords"]"#, "content"), None);
        assert_eq!(
            doc.attr(r#"link[rel="canonical"]"#, "href").as_deref(),
            Some("https://a.test/")
        );
    }

    #[test]
    fn invalid_selector_matches_nothing() {
        let mut doc = ScraperDocument::parse("<p>text</p>");
        assert!(doc.texts("p[").is_empty());
        assert_eq!(doc.count(":::"), 0);
        doc.remove("[[");
        assert_eq!(doc.count("p"), 1);
    }

    #[test]
    fn collects_json_ld_types_from_objects_and_arrays() {
        let blocks = vec![
            r#"{"@context": "https://schema.org", "@type": "Product"}"#.to_string(),
            r#"[{"@type": "Organization"}, {"@type": ["WebSite", "Thing"]}, 3]"#.to_string(),
            r#"{"@type": "Broken""#.to_string(),
        ];
        assert_eq!(
            json_ld_types(&blocks),
            vec!["Product", "Organization", "WebSite", "Thing"]
        );
    }
}
