//! Deterministic SEO scoring
//!
//! Seven bucketed sub-scores in `[0, 10]` and an aggregate in `[0, 100]`.
//! Bucket boundaries are inclusive as written; no rounding is applied
//! before the final average.

use serde::{Deserialize, Serialize};

use crate::signals::PageSignals;

/// Sub-scores below this are treated as failing
pub const PASSING_SUBSCORE: f64 = 7.0;

/// The seven SEO sub-scores in canonical order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeoItem {
    Title,
    MetaDescription,
    Headings,
    Content,
    Links,
    Images,
    Technical,
}

impl SeoItem {
    pub const ALL: [SeoItem; 7] = [
        SeoItem::Title,
        SeoItem::MetaDescription,
        SeoItem::Headings,
        SeoItem::Content,
        SeoItem::Links,
        SeoItem::Images,
        SeoItem::Technical,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Title => "title_score",
            Self::MetaDescription => "meta_description_score",
            Self::Headings => "headings_score",
            Self::Content => "content_score",
            Self::Links => "links_score",
            Self::Images => "images_score",
            Self::Technical => "technical_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Title => "Title",
            Self::MetaDescription => "Meta Description",
            Self::Headings => "Headings",
            Self::Content => "Content",
            Self::Links => "Links",
            Self::Images => "Images",
            Self::Technical => "Technical",
        }
    }
}

/// Sub-scores plus the aggregate they produce
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeoScoreSet {
    pub title: f64,
    pub meta_description: f64,
    pub headings: f64,
    pub content: f64,
    pub links: f64,
    pub images: f64,
    pub technical: f64,
    /// `mean(sub-scores) * 10`
    pub total: f64,
}

impl SeoScoreSet {
    /// Build a set from sub-scores in [`SeoItem::ALL`] order, deriving the total
    pub fn from_subscores(scores: [f64; 7]) -> Self {
        let [title, meta_description, headings, content, links, images, technical] = scores;
        Self {
            title,
            meta_description,
            headings,
            content,
            links,
            images,
            technical,
            total: aggregate(&scores),
        }
    }

    pub fn get(&self, item: SeoItem) -> f64 {
        match item {
            SeoItem::Title => self.title,
            SeoItem::MetaDescription => self.meta_description,
            SeoItem::Headings => self.headings,
            SeoItem::Content => self.content,
            SeoItem::Links => self.links,
            SeoItem::Images => self.images,
            SeoItem::Technical => self.technical,
        }
    }

    /// Sub-scores in canonical order
    pub fn subscores(&self) -> [f64; 7] {
        SeoItem::ALL.map(|item| self.get(item))
    }

    /// Failing sub-scores, lowest first; ties keep canonical order
    pub fn weakest(&self, limit: usize) -> Vec<(SeoItem, f64)> {
        let mut failing: Vec<(SeoItem, f64)> = SeoItem::ALL
            .iter()
            .map(|&item| (item, self.get(item)))
            .filter(|(_, score)| *score < PASSING_SUBSCORE)
            .collect();
        failing.sort_by(|a, b| a.1.total_cmp(&b.1));
        failing.truncate(limit);
        failing
    }
}

/// `mean(scores) * 10`, zero for an empty slice
pub fn aggregate(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64 * 10.0
}

/// Scores page signals
#[derive(Debug, Default, Clone, Copy)]
pub struct SeoScorer;

impl SeoScorer {
    pub fn new() -> Self {
        Self
    }

    pub fn score(&self, signals: &PageSignals) -> SeoScoreSet {
        SeoScoreSet::from_subscores([
            title_score(&signals.title),
            meta_description_score(&signals.meta_description),
            headings_score(&signals.heading_counts),
            content_score(signals.word_count, signals.text_html_ratio),
            links_score(signals.internal_links, signals.external_links),
            images_score(signals.images_with_alt, signals.images_without_alt()),
            technical_score(
                signals.has_structured_data,
                signals.has_viewport,
                !signals.canonical_url.is_empty(),
            ),
        ])
    }
}

pub fn title_score(title: &str) -> f64 {
    if title.is_empty() {
        return 0.0;
    }
    match title.chars().count() {
        30..=60 => 10.0,
        20..=29 | 61..=70 => 8.0,
        10..=19 | 71..=80 => 6.0,
        len if len < 10 => 3.0,
        _ => 4.0,
    }
}

pub fn meta_description_score(description: &str) -> f64 {
    if description.is_empty() {
        return 0.0;
    }
    match description.chars().count() {
        120..=156 => 10.0,
        100..=119 | 157..=170 => 8.0,
        80..=99 | 171..=200 => 6.0,
        len if len < 80 => 3.0,
        _ => 4.0,
    }
}

/// `counts[0]` is the number of h1 elements, `counts[5]` of h6
pub fn headings_score(counts: &[usize; 6]) -> f64 {
    let (h1, h2) = (counts[0], counts[1]);
    let h1_score = match h1 {
        1 => 10.0,
        0 => 0.0,
        _ => 5.0,
    };
    let h2_score = if h2 >= 1 { 10.0 } else { 0.0 };
    let skips_h2 = h1 > 0 && h2 == 0 && counts[2..].iter().any(|&n| n > 0);
    let hierarchy_score = if skips_h2 { 5.0 } else { 10.0 };
    h1_score * 0.4 + h2_score * 0.3 + hierarchy_score * 0.3
}

/// `text_html_ratio` is a percentage
pub fn content_score(word_count: usize, text_html_ratio: f64) -> f64 {
    let words = match word_count {
        0..=199 => 2.0,
        200..=299 => 4.0,
        300..=399 => 6.0,
        400..=599 => 8.0,
        _ => 10.0,
    };
    let ratio = if text_html_ratio >= 25.0 {
        10.0
    } else if text_html_ratio >= 20.0 {
        8.0
    } else if text_html_ratio >= 15.0 {
        6.0
    } else if text_html_ratio >= 10.0 {
        4.0
    } else {
        2.0
    };
    words * 0.7 + ratio * 0.3
}

pub fn links_score(internal: usize, external: usize) -> f64 {
    let internal_score = match internal {
        0 => 0.0,
        1..=2 => 5.0,
        3..=4 => 8.0,
        _ => 10.0,
    };
    let external_score = match external {
        0 => 5.0,
        1..=2 => 8.0,
        _ => 10.0,
    };
    internal_score * 0.7 + external_score * 0.3
}

pub fn images_score(with_alt: usize, without_alt: usize) -> f64 {
    let total = with_alt + without_alt;
    if total == 0 {
        return 5.0;
    }
    let ratio = with_alt as f64 / total as f64;
    if ratio >= 1.0 {
        10.0
    } else if ratio >= 0.8 {
        8.0
    } else if ratio >= 0.6 {
        6.0
    } else if ratio >= 0.4 {
        4.0
    } else if ratio >= 0.2 {
        2.0
    } else {
        0.0
    }
}

/// A missing canonical keeps partial credit
pub fn technical_score(has_structured_data: bool, has_viewport: bool, has_canonical: bool) -> f64 {
    let checks = [
        if has_structured_data { 10.0 } else { 0.0 },
        if has_viewport { 10.0 } else { 0.0 },
        if has_canonical { 10.0 } else { 5.0 },
    ];
    checks.iter().sum::<f64>() / checks.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(len: usize) -> String {
        "a".repeat(len)
    }

    #[test]
    fn title_buckets() {
        assert_eq!(title_score(""), 0.0);
        assert_eq!(title_score(&text(45)), 10.0);
        assert_eq!(title_score(&text(30)), 10.0);
        assert_eq!(title_score(&text(60)), 10.0);
        assert_eq!(title_score(&text(25)), 8.0);
        assert_eq!(title_score(&text(70)), 8.0);
        assert_eq!(title_score(&text(15)), 6.0);
        assert_eq!(title_score(&text(80)), 6.0);
        assert_eq!(title_score(&text(5)), 3.0);
        assert_eq!(title_score(&text(90)), 4.0);
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        let title = "日本語".repeat(15);
        assert_eq!(title.chars().count(), 45);
        assert_eq!(title_score(&title), 10.0);
    }

    #[test]
    fn meta_description_buckets() {
        assert_eq!(meta_description_score(""), 0.0);
        assert_eq!(meta_description_score(&text(140)), 10.0);
        assert_eq!(meta_description_score(&text(110)), 8.0);
        assert_eq!(meta_description_score(&text(160)), 8.0);
        assert_eq!(meta_description_score(&text(90)), 6.0);
        assert_eq!(meta_description_score(&text(200)), 6.0);
        assert_eq!(meta_description_score(&text(60)), 3.0);
        assert_eq!(meta_description_score(&text(250)), 4.0);
    }

    #[test]
    fn heading_structure() {
        assert_eq!(headings_score(&[1, 2, 0, 0, 0, 0]), 10.0);
        assert_eq!(headings_score(&[2, 1, 0, 0, 0, 0]), 8.0);
        assert_eq!(headings_score(&[0, 0, 0, 0, 0, 0]), 3.0);
        // h1 followed directly by h3
        assert_eq!(headings_score(&[1, 0, 3, 0, 0, 0]), 5.5);
        assert_eq!(headings_score(&[1, 0, 0, 0, 0, 0]), 7.0);
    }

    #[test]
    fn content_buckets() {
        assert!((content_score(600, 25.0) - 10.0).abs() < 1e-9);
        assert!((content_score(450, 21.0) - 8.0).abs() < 1e-9);
        assert!((content_score(0, 0.0) - 2.0).abs() < 1e-9);
        assert!((content_score(250, 12.0) - (4.0 * 0.7 + 4.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn link_buckets() {
        assert!((links_score(5, 3) - 10.0).abs() < 1e-9);
        assert!((links_score(0, 0) - 1.5).abs() < 1e-9);
        assert!((links_score(3, 1) - 8.0).abs() < 1e-9);
        assert!((links_score(1, 0) - (5.0 * 0.7 + 5.0 * 0.3)).abs() < 1e-9);
    }

    #[test]
    fn image_alt_coverage() {
        assert_eq!(images_score(0, 0), 5.0);
        assert_eq!(images_score(4, 0), 10.0);
        assert_eq!(images_score(4, 1), 8.0);
        assert_eq!(images_score(3, 2), 6.0);
        assert_eq!(images_score(2, 3), 4.0);
        assert_eq!(images_score(1, 4), 2.0);
        assert_eq!(images_score(0, 4), 0.0);
    }

    #[test]
    fn technical_checks() {
        assert_eq!(technical_score(true, true, true), 10.0);
        assert_eq!(technical_score(false, false, false), 5.0 / 3.0);
        assert_eq!(technical_score(true, false, false), 5.0);
    }

    #[test]
    fn sparse_signals_still_score_every_item() {
        let set = SeoScorer::new().score(&PageSignals::default());
        for score in set.subscores() {
            assert!((0.0..=10.0).contains(&score));
        }
        assert_eq!(set.title, 0.0);
        assert_eq!(set.images, 5.0);
        assert!((set.total - aggregate(&set.subscores())).abs() < 1e-12);
    }

    #[test]
    fn total_is_mean_times_ten() {
        let set = SeoScoreSet::from_subscores([10.0, 8.0, 6.0, 4.0, 2.0, 0.0, 5.0]);
        assert_eq!(set.total, 50.0);
        assert_eq!(set.get(SeoItem::Links), 2.0);
    }

    #[test]
    fn weakest_items_sorted_with_canonical_ties() {
        let set = SeoScoreSet::from_subscores([6.0, 3.0, 10.0, 3.0, 9.0, 5.0, 7.0]);
        let weakest = set.weakest(2);
        assert_eq!(
            weakest,
            vec![(SeoItem::MetaDescription, 3.0), (SeoItem::Content, 3.0)]
        );
        assert_eq!(set.weakest(10).len(), 4);
    }

    #[test]
    fn item_keys_and_labels() {
        assert_eq!(SeoItem::MetaDescription.key(), "meta_description_score");
        assert_eq!(SeoItem::MetaDescription.label(), "Meta Description");
    }
}
