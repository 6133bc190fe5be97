//! Industry verdict resolution
//!
//! Merges a user-declared industry with the detector's verdict. A
//! detector result only counts as evidence above
//! [`CONFIDENCE_THRESHOLD`]; below it, a low-confidence guess is never
//! promoted to the primary label.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Detector confidence (exclusive) above which its verdict is trusted
pub const CONFIDENCE_THRESHOLD: f64 = 70.0;

/// Label used when neither the user nor the detector settles the industry
pub const UNDETERMINED_INDUSTRY: &str = "undetermined";

const CONFIRMED_CONFIDENCE: f64 = 95.0;
const OVERRIDE_CONFIDENCE: f64 = 85.0;
const USER_ONLY_CONFIDENCE: f64 = 80.0;

/// Output of the industry detector collaborator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectedIndustry {
    pub primary_industry: String,
    /// 0-100
    pub confidence: f64,
    #[serde(default)]
    pub secondary_industries: Vec<String>,
    #[serde(default)]
    pub specialized_terms: Vec<String>,
    #[serde(default)]
    pub target_audience_clues: Vec<String>,
    #[serde(default)]
    pub regulatory_indicators: Vec<String>,
}

/// Classifies a page into a business sector
pub trait IndustryDetector {
    fn detect(
        &self,
        title: &str,
        content: &str,
        meta_description: &str,
    ) -> anyhow::Result<DetectedIndustry>;
}

impl<T: IndustryDetector + ?Sized> IndustryDetector for &T {
    fn detect(
        &self,
        title: &str,
        content: &str,
        meta_description: &str,
    ) -> anyhow::Result<DetectedIndustry> {
        (**self).detect(title, content, meta_description)
    }
}

impl<T: IndustryDetector + ?Sized> IndustryDetector for Box<T> {
    fn detect(
        &self,
        title: &str,
        content: &str,
        meta_description: &str,
    ) -> anyhow::Result<DetectedIndustry> {
        (**self).detect(title, content, meta_description)
    }
}

/// How the final label was reached
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// User label is a substring of a confident detector label
    Confirmed,
    /// User label disagrees with a confident detector label
    Overridden { detected: String },
    /// User label with no confident detector opinion
    UserOnly,
    /// Confident detector label, no user input
    Detected,
    /// Neither source is usable
    Undetermined,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "user input, confirmed by detection"),
            Self::Overridden { detected } => write!(f, "user input (detected: {detected})"),
            Self::UserOnly => write!(f, "user input"),
            Self::Detected => write!(f, "automatic detection"),
            Self::Undetermined => write!(f, "could not be determined"),
        }
    }
}

/// Final industry classification for one analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndustryVerdict {
    pub primary: String,
    pub resolution: Resolution,
    /// 0-100
    pub confidence: f64,
    pub secondary_detected: Vec<String>,
    pub detected_primary: String,
    pub detected_confidence: f64,
}

impl IndustryVerdict {
    pub fn is_undetermined(&self) -> bool {
        self.resolution == Resolution::Undetermined
    }
}

/// Resolve the final industry from optional user input and a detector verdict
///
/// Blank user input counts as absent.
pub fn resolve_industry(
    user_industry: Option<&str>,
    detected: &DetectedIndustry,
) -> IndustryVerdict {
    let user = user_industry.map(str::trim).filter(|s| !s.is_empty());
    let confident = detected.confidence > CONFIDENCE_THRESHOLD;

    let (primary, resolution, confidence) = match (user, confident) {
        (Some(user), true) => {
            if detected
                .primary_industry
                .to_lowercase()
                .contains(&user.to_lowercase())
            {
                (user.to_string(), Resolution::Confirmed, CONFIRMED_CONFIDENCE)
            } else {
                (
                    user.to_string(),
                    Resolution::Overridden {
                        detected: detected.primary_industry.clone(),
                    },
                    OVERRIDE_CONFIDENCE,
                )
            }
        }
        (Some(user), false) => (user.to_string(), Resolution::UserOnly, USER_ONLY_CONFIDENCE),
        (None, true) => (
            detected.primary_industry.clone(),
            Resolution::Detected,
            detected.confidence,
        ),
        (None, false) => (
            UNDETERMINED_INDUSTRY.to_string(),
            Resolution::Undetermined,
            detected.confidence,
        ),
    };

    debug!(%primary, %resolution, confidence, "resolved industry");

    IndustryVerdict {
        primary,
        resolution,
        confidence,
        secondary_detected: detected.secondary_industries.clone(),
        detected_primary: detected.primary_industry.clone(),
        detected_confidence: detected.confidence,
    }
}
