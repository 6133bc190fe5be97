//! Main-content extraction
//!
//! Reduces a page to the plain text that represents its primary content.
//! The text feeds the word count, keyword frequencies, the industry
//! detector, and the LLM prompt.

use tracing::debug;

use crate::markup::MarkupProvider;

/// Elements that never carry primary content
pub const NON_CONTENT_SELECTOR: &str = "script, style, header, footer, nav, aside, form, iframe";

/// Content-region selectors in priority order
pub const CONTENT_SELECTORS: [&str; 6] = [
    "article",
    "main",
    ".main-content",
    "#content",
    "#main",
    ".post-content",
];

/// Widgets stripped from inside a content region before its text is taken
pub const BOILERPLATE_CLASSES: [&str; 3] = ["comments", "social-sharing", "related-posts"];

/// Accumulated length after which no further regions are collected
pub const EARLY_STOP_CHARS: usize = 5000;

/// A region must be longer than this to count as content
pub const MIN_REGION_CHARS: usize = 200;

/// Extracts representative text from a page
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract the main text of `document`
    ///
    /// Works on a clone; the caller's document is left untouched. The
    /// length check runs after each region is appended, so the result can
    /// exceed [`EARLY_STOP_CHARS`].
    pub fn extract<M>(&self, document: &M) -> String
    where
        M: MarkupProvider + Clone,
    {
        let mut working = document.clone();
        working.remove(NON_CONTENT_SELECTOR);

        let mut parts: Vec<String> = Vec::new();
        for region in CONTENT_SELECTORS {
            working.remove(&boilerplate_selector(region));
            for text in working.texts(region) {
                if text.chars().count() <= MIN_REGION_CHARS {
                    continue;
                }
                parts.push(text);
                let joined = parts.join(" ");
                if joined.chars().count() > EARLY_STOP_CHARS {
                    debug!(region, chars = joined.chars().count(), "content cap reached");
                    return joined;
                }
            }
        }

        if !parts.is_empty() {
            return parts.join(" ");
        }

        match working.first_text("body") {
            Some(body) => {
                debug!("no content region matched, using body text");
                body
            }
            None => {
                debug!("no body element, using document text");
                working.document_text()
            }
        }
    }
}

fn boilerplate_selector(region: &str) -> String {
    BOILERPLATE_CLASSES
        .iter()
        .map(|class| format!("{region} .{class}"))
        .collect::<Vec<_>>()
        .join(", ")
}
