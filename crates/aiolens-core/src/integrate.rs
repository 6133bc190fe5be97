//! Blending of the SEO and AIO sides into one result

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::aio::AioScoreSet;
use crate::config::Balance;
use crate::seo::{SeoItem, SeoScoreSet};

/// AIO immediate actions listed when AIO is the weaker side
const MAX_AIO_PRIORITIES: usize = 3;
/// Failing SEO sub-scores listed when SEO is the weaker side
const MAX_SEO_PRIORITIES: usize = 2;
/// SEO total under which a title note is added to an AIO-first list
const SEO_TITLE_NOTE_BELOW: f64 = 70.0;

/// The side that needs attention first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Focus {
    Seo,
    Aio,
}

impl fmt::Display for Focus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Seo => "SEO",
            Self::Aio => "AIO",
        })
    }
}

/// One entry of the prioritized improvement list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Improvement {
    /// AIO immediate action, listed because AIO is the weaker side
    AioPriority { action: String },
    /// Title work suggested alongside AIO priorities
    SeoTitle { score: f64 },
    /// Failing SEO sub-score, listed because SEO is the weaker side
    SeoItem { item: SeoItem, score: f64 },
    /// First AIO immediate action, added after SEO priorities
    AioComplement { action: String },
}

impl fmt::Display for Improvement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AioPriority { action } => write!(f, "AIO priority: {}", or_na(action)),
            Self::SeoTitle { score } => write!(
                f,
                "SEO complement: optimize the title (current score: {score:.1}/10)"
            ),
            Self::SeoItem { item, score } => write!(
                f,
                "SEO priority: improve {} (current score: {score:.1}/10)",
                item.label()
            ),
            Self::AioComplement { action } => write!(f, "AIO complement: {}", or_na(action)),
        }
    }
}

fn or_na(text: &str) -> &str {
    if text.trim().is_empty() { "N/A" } else { text }
}

/// A single keyed score in a distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub key: String,
    pub score: f64,
}

/// Suggested split of future effort, always summing to 100
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendedBalance {
    pub seo_focus: u8,
    pub aio_focus: u8,
}

impl RecommendedBalance {
    /// Weight effort toward the side with the larger gap to 100
    ///
    /// Exact halves round to the even percentage.
    pub fn from_totals(seo_total: f64, aio_total: f64) -> Self {
        let seo_gap = 100.0 - seo_total;
        let total_gap = seo_gap + (100.0 - aio_total);
        let seo_focus = if total_gap <= 0.0 {
            50
        } else {
            (seo_gap / total_gap * 100.0).round_ties_even().clamp(0.0, 100.0) as u8
        };
        Self {
            seo_focus,
            aio_focus: 100 - seo_focus,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegratedResult {
    pub integrated_score: f64,
    pub seo_score: f64,
    pub aio_score: f64,
    pub primary_focus: Focus,
    pub improvements: Vec<Improvement>,
    pub seo_distribution: Vec<ScoreEntry>,
    pub aio_distribution: Vec<ScoreEntry>,
    pub recommended: RecommendedBalance,
}

/// `seo_total * seo_weight + aio_total * aio_weight`
pub fn blend(seo_total: f64, aio_total: f64, balance: Balance) -> f64 {
    seo_total * balance.seo_weight() + aio_total * balance.aio_weight()
}

/// Combines both sides by a fixed balance
#[derive(Debug, Clone, Copy, Default)]
pub struct ResultIntegrator {
    balance: Balance,
}

impl ResultIntegrator {
    pub fn new(balance: Balance) -> Self {
        Self { balance }
    }

    pub fn integrate(&self, seo: &SeoScoreSet, aio: &AioScoreSet) -> IntegratedResult {
        let seo_score = seo.total;
        let aio_score = aio.total;
        let primary_focus = if aio_score < seo_score {
            Focus::Aio
        } else {
            Focus::Seo
        };

        let improvements = improvements(primary_focus, seo, aio);
        let recommended = RecommendedBalance::from_totals(seo_score, aio_score);
        let integrated_score = blend(seo_score, aio_score, self.balance);

        debug!(
            integrated_score,
            seo_score,
            aio_score,
            %primary_focus,
            seo_focus = recommended.seo_focus,
            "integrated scores"
        );

        IntegratedResult {
            integrated_score,
            seo_score,
            aio_score,
            primary_focus,
            improvements,
            seo_distribution: SeoItem::ALL
                .iter()
                .map(|&item| ScoreEntry {
                    key: item.key().to_string(),
                    score: seo.get(item),
                })
                .collect(),
            aio_distribution: aio
                .scores
                .iter()
                .map(|(item, scored)| ScoreEntry {
                    key: item.key().to_string(),
                    score: scored.score,
                })
                .collect(),
            recommended,
        }
    }
}

fn improvements(focus: Focus, seo: &SeoScoreSet, aio: &AioScoreSet) -> Vec<Improvement> {
    let mut list = Vec::new();
    match focus {
        Focus::Aio => {
            list.extend(
                aio.immediate_actions
                    .iter()
                    .take(MAX_AIO_PRIORITIES)
                    .map(|entry| Improvement::AioPriority {
                        action: entry.action.clone(),
                    }),
            );
            if seo.total < SEO_TITLE_NOTE_BELOW {
                list.push(Improvement::SeoTitle { score: seo.title });
            }
        }
        Focus::Seo => {
            list.extend(
                seo.weakest(MAX_SEO_PRIORITIES)
                    .into_iter()
                    .map(|(item, score)| Improvement::SeoItem { item, score }),
            );
            if let Some(first) = aio.immediate_actions.first() {
                list.push(Improvement::AioComplement {
                    action: first.action.clone(),
                });
            }
        }
    }
    list
}
