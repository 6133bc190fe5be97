//! Generative-AI search (AIO) assessment
//!
//! The assessment itself comes from an LLM. This module defines the
//! canonical record it is normalized into, the repair logic that gets it
//! there, and the prompt sent to the model.

pub mod normalizer;
pub mod prompt;

use serde::{Deserialize, Serialize};

pub use normalizer::{AioNormalizer, extract_json_object, scale_to_100};
pub use prompt::{AioPrompt, CONTENT_PREVIEW_CHARS};

/// Advice recorded for score keys the model left out
pub const MISSING_ADVICE: &str = "no data from API";

/// Sends prompts to a language model
pub trait LlmClient {
    /// Return the raw text of the model's reply
    fn complete(&self, prompt: &AioPrompt) -> anyhow::Result<String>;
}

impl<T: LlmClient + ?Sized> LlmClient for &T {
    fn complete(&self, prompt: &AioPrompt) -> anyhow::Result<String> {
        (**self).complete(prompt)
    }
}

impl<T: LlmClient + ?Sized> LlmClient for Box<T> {
    fn complete(&self, prompt: &AioPrompt) -> anyhow::Result<String> {
        (**self).complete(prompt)
    }
}

/// The four groups the sixteen AIO items fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AioCategory {
    Eeat,
    AiSearch,
    UserExperience,
    Technical,
}

impl AioCategory {
    pub const ALL: [AioCategory; 4] = [
        AioCategory::Eeat,
        AioCategory::AiSearch,
        AioCategory::UserExperience,
        AioCategory::Technical,
    ];

    /// Key of the category score in the model's JSON
    pub fn key(self) -> &'static str {
        match self {
            Self::Eeat => "eeat_score",
            Self::AiSearch => "ai_search_score",
            Self::UserExperience => "user_experience_score",
            Self::Technical => "technical_score",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Eeat => "E-E-A-T",
            Self::AiSearch => "AI Search",
            Self::UserExperience => "User Experience",
            Self::Technical => "Technical",
        }
    }
}

/// The sixteen per-item AIO scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AioItem {
    Experience,
    Expertise,
    Authoritativeness,
    Trustworthiness,
    Structure,
    QaCompatibility,
    CitationPotential,
    Multimodal,
    SearchIntent,
    Personalization,
    Uniqueness,
    Completeness,
    Readability,
    MobileFriendly,
    PageSpeed,
    Metadata,
}

impl AioItem {
    pub const ALL: [AioItem; 16] = [
        AioItem::Experience,
        AioItem::Expertise,
        AioItem::Authoritativeness,
        AioItem::Trustworthiness,
        AioItem::Structure,
        AioItem::QaCompatibility,
        AioItem::CitationPotential,
        AioItem::Multimodal,
        AioItem::SearchIntent,
        AioItem::Personalization,
        AioItem::Uniqueness,
        AioItem::Completeness,
        AioItem::Readability,
        AioItem::MobileFriendly,
        AioItem::PageSpeed,
        AioItem::Metadata,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Experience => "experience",
            Self::Expertise => "expertise",
            Self::Authoritativeness => "authoritativeness",
            Self::Trustworthiness => "trustworthiness",
            Self::Structure => "structure",
            Self::QaCompatibility => "qa_compatibility",
            Self::CitationPotential => "citation_potential",
            Self::Multimodal => "multimodal",
            Self::SearchIntent => "search_intent",
            Self::Personalization => "personalization",
            Self::Uniqueness => "uniqueness",
            Self::Completeness => "completeness",
            Self::Readability => "readability",
            Self::MobileFriendly => "mobile_friendly",
            Self::PageSpeed => "page_speed",
            Self::Metadata => "metadata",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Experience => "Experience",
            Self::Expertise => "Expertise",
            Self::Authoritativeness => "Authoritativeness",
            Self::Trustworthiness => "Trustworthiness",
            Self::Structure => "Structure",
            Self::QaCompatibility => "Q&A Compatibility",
            Self::CitationPotential => "Citation Potential",
            Self::Multimodal => "Multimodal",
            Self::SearchIntent => "Search Intent",
            Self::Personalization => "Personalization",
            Self::Uniqueness => "Uniqueness",
            Self::Completeness => "Completeness",
            Self::Readability => "Readability",
            Self::MobileFriendly => "Mobile Friendly",
            Self::PageSpeed => "Page Speed",
            Self::Metadata => "Metadata",
        }
    }

    pub fn category(self) -> AioCategory {
        match self {
            Self::Experience | Self::Expertise | Self::Authoritativeness | Self::Trustworthiness => {
                AioCategory::Eeat
            }
            Self::Structure | Self::QaCompatibility | Self::CitationPotential | Self::Multimodal => {
                AioCategory::AiSearch
            }
            Self::SearchIntent | Self::Personalization | Self::Uniqueness | Self::Completeness => {
                AioCategory::UserExperience
            }
            Self::Readability | Self::MobileFriendly | Self::PageSpeed | Self::Metadata => {
                AioCategory::Technical
            }
        }
    }
}

/// One per-item score (0-10) with the model's advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredAdvice {
    pub score: f64,
    pub advice: String,
}

impl ScoredAdvice {
    pub fn missing() -> Self {
        Self {
            score: 0.0,
            advice: MISSING_ADVICE.to_string(),
        }
    }
}

/// All sixteen item scores; every key is always present
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AioItemScores {
    pub experience: ScoredAdvice,
    pub expertise: ScoredAdvice,
    pub authoritativeness: ScoredAdvice,
    pub trustworthiness: ScoredAdvice,
    pub structure: ScoredAdvice,
    pub qa_compatibility: ScoredAdvice,
    pub citation_potential: ScoredAdvice,
    pub multimodal: ScoredAdvice,
    pub search_intent: ScoredAdvice,
    pub personalization: ScoredAdvice,
    pub uniqueness: ScoredAdvice,
    pub completeness: ScoredAdvice,
    pub readability: ScoredAdvice,
    pub mobile_friendly: ScoredAdvice,
    pub page_speed: ScoredAdvice,
    pub metadata: ScoredAdvice,
}

impl AioItemScores {
    /// Build from a lookup, called once per item in [`AioItem::ALL`] order
    pub fn from_fn(mut lookup: impl FnMut(AioItem) -> ScoredAdvice) -> Self {
        Self {
            experience: lookup(AioItem::Experience),
            expertise: lookup(AioItem::Expertise),
            authoritativeness: lookup(AioItem::Authoritativeness),
            trustworthiness: lookup(AioItem::Trustworthiness),
            structure: lookup(AioItem::Structure),
            qa_compatibility: lookup(AioItem::QaCompatibility),
            citation_potential: lookup(AioItem::CitationPotential),
            multimodal: lookup(AioItem::Multimodal),
            search_intent: lookup(AioItem::SearchIntent),
            personalization: lookup(AioItem::Personalization),
            uniqueness: lookup(AioItem::Uniqueness),
            completeness: lookup(AioItem::Completeness),
            readability: lookup(AioItem::Readability),
            mobile_friendly: lookup(AioItem::MobileFriendly),
            page_speed: lookup(AioItem::PageSpeed),
            metadata: lookup(AioItem::Metadata),
        }
    }

    pub fn get(&self, item: AioItem) -> &ScoredAdvice {
        match item {
            AioItem::Experience => &self.experience,
            AioItem::Expertise => &self.expertise,
            AioItem::Authoritativeness => &self.authoritativeness,
            AioItem::Trustworthiness => &self.trustworthiness,
            AioItem::Structure => &self.structure,
            AioItem::QaCompatibility => &self.qa_compatibility,
            AioItem::CitationPotential => &self.citation_potential,
            AioItem::Multimodal => &self.multimodal,
            AioItem::SearchIntent => &self.search_intent,
            AioItem::Personalization => &self.personalization,
            AioItem::Uniqueness => &self.uniqueness,
            AioItem::Completeness => &self.completeness,
            AioItem::Readability => &self.readability,
            AioItem::MobileFriendly => &self.mobile_friendly,
            AioItem::PageSpeed => &self.page_speed,
            AioItem::Metadata => &self.metadata,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (AioItem, &ScoredAdvice)> + '_ {
        AioItem::ALL.into_iter().map(move |item| (item, self.get(item)))
    }

    /// Mean of the sixteen item scores, times ten
    pub fn observed_total(&self) -> f64 {
        let scores: Vec<f64> = self.iter().map(|(_, item)| item.score).collect();
        crate::seo::aggregate(&scores)
    }
}

/// Category scores, scaled to 0-100
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryScores {
    pub eeat_score: f64,
    pub ai_search_score: f64,
    pub user_experience_score: f64,
    pub technical_score: f64,
}

impl CategoryScores {
    pub fn get(&self, category: AioCategory) -> f64 {
        match category {
            AioCategory::Eeat => self.eeat_score,
            AioCategory::AiSearch => self.ai_search_score,
            AioCategory::UserExperience => self.user_experience_score,
            AioCategory::Technical => self.technical_score,
        }
    }
}

/// Quick win, implementable within a couple of weeks
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImmediateAction {
    pub action: String,
    pub method: String,
    pub expected_impact: String,
}

/// One-to-three month initiative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediumTermStrategy {
    pub strategy: String,
    pub timeline: String,
    pub expected_outcome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitiveAdvantage {
    pub advantage: String,
    pub implementation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketTrendStrategy {
    pub trend: String,
    pub strategy: String,
    pub priority: String,
}

/// Industry narrative returned by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryAnalysis {
    pub industry_fit: String,
    pub specialized_improvements: String,
    pub compliance_check: String,
    pub market_trends: String,
}

/// Identification block echoed back by the model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicInfo {
    pub url: String,
    pub industry: String,
    pub title: String,
}

/// Normalized AIO assessment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AioScoreSet {
    pub basic_info: BasicInfo,
    pub scores: AioItemScores,
    pub category_scores: CategoryScores,
    /// Model-reported total, scaled to 0-100
    pub total: f64,
    pub immediate_actions: Vec<ImmediateAction>,
    pub medium_term_strategies: Vec<MediumTermStrategy>,
    pub competitive_advantages: Vec<CompetitiveAdvantage>,
    pub market_trend_strategies: Vec<MarketTrendStrategy>,
    pub industry_analysis: IndustryAnalysis,
}
