//! Page signal extraction
//!
//! Turns a parsed page into the immutable [`PageSignals`] record the SEO
//! scorer works from. Every field resolves on its own: a missing tag
//! yields an empty string or zero for that field only.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::markup::{MarkupProvider, json_ld_types};
use crate::url_utils::registrable_domain;

const JSON_LD_SELECTOR: &str = r#"script[type="application/ld+json"]"#;
const TOP_KEYWORDS: usize = 10;
const HEADING_SAMPLES: usize = 3;

static STOP_WORDS: [&str; 27] = [
    "the", "and", "for", "with", "that", "this", "you", "your", "from", "are", "was", "were",
    "have", "has", "not", "but", "can", "will", "his", "her", "its", "she", "him", "our", "out",
    "use", "using",
];

/// Everything the SEO scorer needs to know about a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageSignals {
    pub title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
    pub og_image: String,
    pub canonical_url: String,
    pub meta_keywords: String,
    pub meta_author: String,
    /// Count of h1..h6, index 0 is h1
    pub heading_counts: [usize; 6],
    /// First texts of h1..h3, index 0 is h1
    pub heading_samples: [Vec<String>; 3],
    pub internal_links: usize,
    pub external_links: usize,
    pub images_total: usize,
    pub images_with_alt: usize,
    pub has_structured_data: bool,
    pub structured_data_count: usize,
    pub structured_data_types: Vec<String>,
    pub has_viewport: bool,
    pub tech_stack: Vec<String>,
    pub top_keywords: Vec<KeywordCount>,
    pub word_count: usize,
    /// Visible text length as a percentage of markup length
    pub text_html_ratio: f64,
    pub meta_tags_count: usize,
    pub page_size_kb: f64,
    pub garbled: GarbledText,
}

impl PageSignals {
    /// Heading count for `level` (1..=6); out-of-range levels count zero
    pub fn headings(&self, level: usize) -> usize {
        level
            .checked_sub(1)
            .and_then(|idx| self.heading_counts.get(idx))
            .copied()
            .unwrap_or(0)
    }

    pub fn images_without_alt(&self) -> usize {
        self.images_total.saturating_sub(self.images_with_alt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub word: String,
    pub count: usize,
}

/// Whether title/description look like mis-decoded text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GarbledText {
    pub title: bool,
    pub meta_description: bool,
}

/// Builds [`PageSignals`] from a document and the URL it was served from
#[derive(Debug, Default, Clone, Copy)]
pub struct SignalExtractor;

impl SignalExtractor {
    pub fn new() -> Self {
        Self
    }

    /// `main_content` is the output of the content extractor for the same
    /// document; word count and keywords are taken from it.
    pub fn extract<M>(&self, document: &M, page_url: &str, main_content: &str) -> PageSignals
    where
        M: MarkupProvider + Clone,
    {
        let title = document.first_text("title").unwrap_or_default();
        let meta_description = meta_content(document, "name", "description");

        let mut heading_counts = [0usize; 6];
        for (idx, count) in heading_counts.iter_mut().enumerate() {
            *count = document.count(&format!("h{}", idx + 1));
        }
        let heading_samples = [1, 2, 3].map(|level| heading_texts(document, level));

        let (internal_links, external_links) = count_links(document, page_url);

        let alts = document.attr_values("img", "alt");
        let images_total = alts.len();
        let images_with_alt = alts
            .iter()
            .filter(|alt| alt.as_deref().is_some_and(|a| !a.trim().is_empty()))
            .count();

        let json_ld_blocks = document.texts(JSON_LD_SELECTOR);
        let structured_data_count = json_ld_blocks.len();

        let source = document.source();
        let text_html_ratio = text_ratio(document);

        let garbled = GarbledText {
            title: looks_garbled(&title),
            meta_description: looks_garbled(&meta_description),
        };

        PageSignals {
            og_title: meta_content(document, "property", "og:title"),
            og_description: meta_content(document, "property", "og:description"),
            og_image: meta_content(document, "property", "og:image"),
            canonical_url: document
                .attr(r#"link[rel="canonical"]"#, "href")
                .unwrap_or_default(),
            meta_keywords: meta_content(document, "name", "keywords"),
            meta_author: meta_content(document, "name", "author"),
            heading_counts,
            heading_samples,
            internal_links,
            external_links,
            images_total,
            images_with_alt,
            has_structured_data: structured_data_count > 0,
            structured_data_count,
            structured_data_types: json_ld_types(&json_ld_blocks),
            has_viewport: document.count(r#"meta[name="viewport"]"#) > 0,
            tech_stack: detect_tech_stack(document),
            top_keywords: top_keywords(main_content),
            word_count: main_content.split_whitespace().count(),
            text_html_ratio,
            meta_tags_count: document.count("meta"),
            page_size_kb: source.len() as f64 / 1024.0,
            garbled,
            title,
            meta_description,
        }
    }
}

fn meta_content<M: MarkupProvider>(document: &M, key: &str, value: &str) -> String {
    document
        .attr(&format!(r#"meta[{key}="{value}"]"#), "content")
        .unwrap_or_default()
}

fn heading_texts<M: MarkupProvider>(document: &M, level: usize) -> Vec<String> {
    document
        .texts(&format!("h{level}"))
        .into_iter()
        .take(HEADING_SAMPLES)
        .collect()
}

fn count_links<M: MarkupProvider>(document: &M, page_url: &str) -> (usize, usize) {
    let base = match Url::parse(page_url) {
        Ok(base) => base,
        Err(err) => {
            debug!(page_url, error = %err, "page URL unparsable, links not classified");
            return (0, 0);
        }
    };
    let Some(base_domain) = registrable_domain(&base) else {
        return (0, 0);
    };

    let mut internal = 0;
    let mut external = 0;
    for href in document.attr_values("a[href]", "href").into_iter().flatten() {
        let href = href.trim();
        if href.is_empty() || href.starts_with('#') || href.starts_with("javascript:") {
            continue;
        }
        let Some(link_domain) = base.join(href).ok().as_ref().and_then(registrable_domain) else {
            continue;
        };
        if link_domain == base_domain {
            internal += 1;
        } else {
            external += 1;
        }
    }
    (internal, external)
}

/// Visible text length over markup length, in percent
fn text_ratio<M: MarkupProvider + Clone>(document: &M) -> f64 {
    let markup_chars = document.source().chars().count();
    if markup_chars == 0 {
        return 0.0;
    }
    let mut visible = document.clone();
    visible.remove("script, style, noscript, template");
    visible.document_text().chars().count() as f64 / markup_chars as f64 * 100.0
}

fn detect_tech_stack<M: MarkupProvider>(document: &M) -> Vec<String> {
    let generator = meta_content(document, "name", "generator").to_lowercase();
    let markup = document.source().to_lowercase();

    let markers: [(&str, &str, &str); 3] = [
        ("WordPress", "wordpress", "wp-content"),
        ("Shopify", "shopify", "shopify"),
        ("Wix", "wix", "wixsite"),
    ];
    markers
        .iter()
        .filter(|(_, gen_marker, markup_marker)| {
            generator.contains(gen_marker) || markup.contains(markup_marker)
        })
        .map(|(name, _, _)| name.to_string())
        .collect()
}

/// Ten most frequent words of three or more ASCII letters
///
/// Ties keep first-occurrence order.
pub fn top_keywords(text: &str) -> Vec<KeywordCount> {
    static RE_WORD: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"[A-Za-z]{3,}").expect("invalid word regex"));

    let lowered = text.to_lowercase();
    let mut counts: HashMap<&str, (usize, usize)> = HashMap::new();
    for (position, word) in RE_WORD
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|w| !STOP_WORDS.contains(w))
        .enumerate()
    {
        counts.entry(word).or_insert((0, position)).0 += 1;
    }

    let mut ranked: Vec<(&str, usize, usize)> = counts
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
    ranked
        .into_iter()
        .take(TOP_KEYWORDS)
        .map(|(word, count, _)| KeywordCount {
            word: word.to_string(),
            count,
        })
        .collect()
}

/// Replacement characters or UTF-8 read as Latin-1 (`Ã©`, `â€™`)
pub fn looks_garbled(text: &str) -> bool {
    static RE_MOJIBAKE: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"[ÃÂ][\x{80}-\x{BF}]|â€|ã[\x{80}-\x{BF}]").expect("invalid mojibake regex")
    });

    text.contains('\u{FFFD}') || RE_MOJIBAKE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::ScraperDocument;

    const PAGE: &str = r##"<!DOCTYPE html>
<html>
<head>
  <title>Handmade leather bags from Florence</title>
  <meta name="description" content="Shop handmade leather bags.">
  <meta name="keywords" content="leather, bags">
  <meta name="author" content="Atelier">
  <meta name="viewport" content="width=device-width">
  <meta name="generator" content="WordPress 6.5">
  <meta property="og:title" content="Leather bags">
  <meta property="og:image" content="https://shop.example.com/og.png">
  <link rel="canonical" href="https://shop.example.com/bags">
  <script type="application/ld+json">{"@type": "Product", "name": "Tote"}</script>
  <script type="application/ld+json">not json</script>
</head>
<body>
  <h1>Leather bags</h1>
  <h2>Totes</h2><h2>Clutches</h2>
  <h3>Care</h3>
  <a href="/about">About</a>
  <a href="https://blog.example.com/post">Blog</a>
  <a href="https://other.org/">Partner</a>
  <a href="#top">Top</a>
  <a href="javascript:void(0)">Menu</a>
  <a href="mailto:hi@example.com">Mail</a>
  <img src="a.jpg" alt="Tote bag">
  <img src="b.jpg" alt="  ">
  <img src="c.jpg">
</body>
</html>"##;

    fn extract(html: &str, content: &str) -> PageSignals {
        let doc = ScraperDocument::parse(html);
        SignalExtractor::new().extract(&doc, "https://shop.example.com/bags", content)
    }

    #[test]
    fn reads_basic_metadata() {
        let signals = extract(PAGE, "");
        assert_eq!(signals.title, "Handmade leather bags from Florence");
        assert_eq!(signals.meta_description, "Shop handmade leather bags.");
        assert_eq!(signals.meta_keywords, "leather, bags");
        assert_eq!(signals.meta_author, "Atelier");
        assert_eq!(signals.og_title, "Leather bags");
        assert_eq!(signals.og_description, "");
        assert_eq!(signals.og_image, "https://shop.example.com/og.png");
        assert_eq!(signals.canonical_url, "https://shop.example.com/bags");
        assert!(signals.has_viewport);
        assert_eq!(signals.tech_stack, vec!["WordPress"]);
    }

    #[test]
    fn counts_headings_and_samples() {
        let signals = extract(PAGE, "");
        assert_eq!(signals.heading_counts, [1, 2, 1, 0, 0, 0]);
        assert_eq!(signals.headings(2), 2);
        assert_eq!(signals.headings(0), 0);
        assert_eq!(signals.headings(7), 0);
        assert_eq!(signals.heading_samples[1], vec!["Totes", "Clutches"]);
    }

    #[test]
    fn classifies_links_by_registrable_domain() {
        let signals = extract(PAGE, "");
        assert_eq!(signals.internal_links, 2);
        assert_eq!(signals.external_links, 1);
    }

    #[test]
    fn counts_alt_coverage() {
        let signals = extract(PAGE, "");
        assert_eq!(signals.images_total, 3);
        assert_eq!(signals.images_with_alt, 1);
        assert_eq!(signals.images_without_alt(), 2);
    }

    #[test]
    fn structured_data_counts_unparsable_blocks() {
        let signals = extract(PAGE, "");
        assert!(signals.has_structured_data);
        assert_eq!(signals.structured_data_count, 2);
        assert_eq!(signals.structured_data_types, vec!["Product"]);
    }

    #[test]
    fn sparse_page_yields_empty_signals() {
        let signals = extract("<html></html>", "");
        assert_eq!(signals.title, "");
        assert_eq!(signals.meta_description, "");
        assert_eq!(signals.heading_counts, [0; 6]);
        assert_eq!(signals.internal_links, 0);
        assert_eq!(signals.images_total, 0);
        assert!(!signals.has_structured_data);
        assert!(!signals.has_viewport);
        assert_eq!(signals.word_count, 0);
        assert!(signals.top_keywords.is_empty());
    }

    #[test]
    fn word_count_and_keywords_come_from_main_content() {
        let signals = extract(PAGE, "Leather bags and leather care for the leather lover");
        assert_eq!(signals.word_count, 9);
        assert_eq!(signals.top_keywords[0].word, "leather");
        assert_eq!(signals.top_keywords[0].count, 3);
    }

    #[test]
    fn keyword_ties_keep_first_occurrence_order() {
        let keywords = top_keywords("zeta alpha zeta alpha beta an of the THE");
        let words: Vec<&str> = keywords.iter().map(|k| k.word.as_str()).collect();
        assert_eq!(words, vec!["zeta", "alpha", "beta"]);
    }

    #[test]
    fn keywords_are_capped_at_ten() {
        let text = "aaa bbb ccc ddd eee fff ggg hhh iii jjj kkk lll";
        assert_eq!(top_keywords(text).len(), 10);
    }

    #[test]
    fn text_ratio_ignores_scripts() {
        let with_script = extract(
            "<html><body><p>Hello</p><script>var a = 'long script body';</script></body></html>",
            "",
        );
        let text_chars = "Hello".len() as f64;
        let markup_chars =
            "<html><body><p>Hello</p><script>var a = 'long script body';</script></body></html>"
                .len() as f64;
        assert!((with_script.text_html_ratio - text_chars / markup_chars * 100.0).abs() < 1e-9);
    }

    #[test]
    fn detects_mojibake() {
        assert!(looks_garbled("CafÃ© menu"));
        assert!(looks_garbled("Itâ€™s here"));
        assert!(looks_garbled("broken \u{FFFD} text"));
        assert!(!looks_garbled("Café menu"));
        assert!(!looks_garbled("日本語のタイトル"));
    }
}
