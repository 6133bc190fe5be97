//! Repair and normalization of raw LLM replies

use serde_json::{Map, Value as JsonValue};
use tracing::{debug, warn};

use super::{
    AioCategory, AioItem, AioItemScores, AioScoreSet, BasicInfo, CategoryScores,
    CompetitiveAdvantage, ImmediateAction, IndustryAnalysis, MarketTrendStrategy,
    MediumTermStrategy, ScoredAdvice,
};
use crate::error::{AnalysisError, Result};

/// Bring a score onto the 0-100 scale
///
/// Values in `[0, 10]` are read as a 0-10 scale and multiplied by ten,
/// values above 100 clamp to 100, values in `(10, 100]` pass through.
/// Negative and non-finite values become 0.
pub fn scale_to_100(value: f64) -> f64 {
    if !value.is_finite() || value < 0.0 {
        0.0
    } else if value <= 10.0 {
        value * 10.0
    } else if value > 100.0 {
        100.0
    } else {
        value
    }
}

/// Locate the JSON object inside a raw reply
///
/// Strips a surrounding code fence, then slices from the first `{` to the
/// last `}` so leading and trailing prose is ignored.
pub fn extract_json_object(raw: &str) -> Result<&str> {
    let text = strip_code_fence(raw);
    let start = text.find('{');
    let end = text.rfind('}');
    match (start, end) {
        (Some(start), Some(end)) if start < end => Ok(&text[start..=end]),
        _ => Err(AnalysisError::MalformedResponse(
            "no JSON object found in response".to_string(),
        )),
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let opened = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    let closed = opened.trim_end();
    closed.strip_suffix("```").unwrap_or(closed).trim()
}

/// Turns raw LLM text into an [`AioScoreSet`]
#[derive(Debug, Clone, Default)]
pub struct AioNormalizer {
    fallback_info: BasicInfo,
}

impl AioNormalizer {
    /// `fallback_info` fills `basic_info` fields the model leaves empty
    pub fn new(fallback_info: BasicInfo) -> Self {
        Self { fallback_info }
    }

    pub fn normalize(&self, raw: &str) -> Result<AioScoreSet> {
        let object_text = extract_json_object(raw)?;
        let parsed: JsonValue = serde_json::from_str(object_text)
            .map_err(|err| AnalysisError::MalformedResponse(format!("invalid JSON: {err}")))?;
        let JsonValue::Object(root) = parsed else {
            return Err(AnalysisError::MalformedResponse(
                "top level is not a JSON object".to_string(),
            ));
        };

        let scores = self.item_scores(root.get("scores"));

        let categories = root.get("category_scores").and_then(JsonValue::as_object);
        let category = |category: AioCategory| {
            scale_to_100(number(categories.and_then(|map| map.get(category.key()))))
        };
        let category_scores = CategoryScores {
            eeat_score: category(AioCategory::Eeat),
            ai_search_score: category(AioCategory::AiSearch),
            user_experience_score: category(AioCategory::UserExperience),
            technical_score: category(AioCategory::Technical),
        };

        let raw_total = number(root.get("total_score"));
        let total = scale_to_100(raw_total);
        if raw_total > 100.0 || raw_total < 0.0 {
            warn!(raw_total, total, "clamped AIO total score");
        }

        Ok(AioScoreSet {
            basic_info: self.basic_info(root.get("basic_info")),
            scores,
            category_scores,
            total,
            immediate_actions: records(root.get("immediate_actions"), |fields| ImmediateAction {
                action: fields.text("action"),
                method: fields.text("method"),
                expected_impact: fields.text("expected_impact"),
            }),
            medium_term_strategies: records(root.get("medium_term_strategies"), |fields| {
                MediumTermStrategy {
                    strategy: fields.text("strategy"),
                    timeline: fields.text("timeline"),
                    expected_outcome: fields.text("expected_outcome"),
                }
            }),
            competitive_advantages: records(root.get("competitive_advantages"), |fields| {
                CompetitiveAdvantage {
                    advantage: fields.text("advantage"),
                    implementation: fields.text("implementation"),
                }
            }),
            market_trend_strategies: records(root.get("market_trend_strategies"), |fields| {
                MarketTrendStrategy {
                    trend: fields.text("trend"),
                    strategy: fields.text("strategy"),
                    priority: fields.text("priority"),
                }
            }),
            industry_analysis: industry_analysis(root.get("industry_analysis")),
        })
    }

    fn item_scores(&self, value: Option<&JsonValue>) -> AioItemScores {
        let scores = value.and_then(JsonValue::as_object);
        let mut missing = Vec::new();
        let items = AioItemScores::from_fn(|item| {
            match scores.and_then(|map| map.get(item.key())) {
                Some(JsonValue::Object(entry)) => ScoredAdvice {
                    score: item_score(item, entry.get("score")),
                    advice: text(entry.get("advice")),
                },
                Some(bare @ (JsonValue::Number(_) | JsonValue::String(_))) => ScoredAdvice {
                    score: item_score(item, Some(bare)),
                    advice: String::new(),
                },
                _ => {
                    missing.push(item.key());
                    ScoredAdvice::missing()
                }
            }
        });
        if !missing.is_empty() {
            warn!(?missing, "AIO response lacks score keys, defaulted to zero");
        }
        items
    }

    fn basic_info(&self, value: Option<&JsonValue>) -> BasicInfo {
        let fields = Fields(value.and_then(JsonValue::as_object));
        let or_fallback = |key: &str, fallback: &str| {
            let value = fields.text(key);
            if value.is_empty() {
                fallback.to_string()
            } else {
                value
            }
        };
        BasicInfo {
            url: or_fallback("url", &self.fallback_info.url),
            industry: or_fallback("industry", &self.fallback_info.industry),
            title: or_fallback("title", &self.fallback_info.title),
        }
    }
}

fn item_score(item: AioItem, value: Option<&JsonValue>) -> f64 {
    let score = number(value);
    let clamped = score.clamp(0.0, 10.0);
    if clamped != score {
        debug!(item = item.key(), score, "clamped AIO item score to 0-10");
    }
    clamped
}

fn industry_analysis(value: Option<&JsonValue>) -> IndustryAnalysis {
    let fields = Fields(value.and_then(JsonValue::as_object));
    IndustryAnalysis {
        industry_fit: fields.text("industry_fit"),
        specialized_improvements: fields.text("specialized_improvements"),
        compliance_check: fields.text("compliance_check"),
        market_trends: fields.text("market_trends"),
    }
}

/// Lenient numeric read: numbers and numeric strings, anything else is 0
fn number(value: Option<&JsonValue>) -> f64 {
    let parsed = match value {
        Some(JsonValue::Number(n)) => n.as_f64(),
        Some(JsonValue::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Lenient text read: strings as-is, null/absent empty, others rendered as JSON
fn text(value: Option<&JsonValue>) -> String {
    match value {
        None | Some(JsonValue::Null) => String::new(),
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

struct Fields<'a>(Option<&'a Map<String, JsonValue>>);

impl Fields<'_> {
    fn text(&self, key: &str) -> String {
        text(self.0.and_then(|map| map.get(key)))
    }
}

/// Map a JSON array of objects into records, skipping entries that are not objects
fn records<T>(value: Option<&JsonValue>, build: impl Fn(&Fields<'_>) -> T) -> Vec<T> {
    let Some(entries) = value.and_then(JsonValue::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| entry.as_object())
        .map(|entry| build(&Fields(Some(entry))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aio::MISSING_ADVICE;

    const FULL: &str = r#"{
        "basic_info": {"url": "https://shop.example.com", "industry": "Fashion", "title": "Bags"},
        "scores": {
            "experience": {"score": 7, "advice": "Add customer stories"},
            "expertise": {"score": 6.5, "advice": "Cite material sources"},
            "authoritativeness": {"score": "8", "advice": "Link press mentions"},
            "trustworthiness": {"score": 12, "advice": "Publish return policy"},
            "structure": {"score": "high", "advice": "Use FAQ blocks"},
            "qa_compatibility": 5
        },
        "category_scores": {"eeat_score": 7.5, "ai_search_score": 65, "user_experience_score": 150},
        "total_score": 6.8,
        "immediate_actions": [
            {"action": "Add FAQ schema", "method": "JSON-LD FAQPage", "expected_impact": "Rich answers"},
            "not an object",
            {"action": "Rewrite intro", "method": 3}
        ],
        "medium_term_strategies": [{"strategy": "Buying guides", "timeline": "2 months", "expected_outcome": "Topical depth"}],
        "competitive_advantages": [{"advantage": "Handmade", "implementation": "Workshop videos"}],
        "market_trend_strategies": [{"trend": "Sustainability", "strategy": "Material passports", "priority": "high"}],
        "industry_analysis": {"industry_fit": "Good", "specialized_improvements": "Sizing charts", "compliance_check": "OK", "market_trends": "Slow fashion"}
    }"#;

    fn normalizer() -> AioNormalizer {
        AioNormalizer::new(BasicInfo {
            url: "https://fallback.example".to_string(),
            industry: "fallback industry".to_string(),
            title: "Fallback".to_string(),
        })
    }

    #[test]
    fn scale_to_100_rules() {
        assert_eq!(scale_to_100(5.0), 50.0);
        assert_eq!(scale_to_100(75.0), 75.0);
        assert_eq!(scale_to_100(150.0), 100.0);
        assert_eq!(scale_to_100(0.0), 0.0);
        assert_eq!(scale_to_100(10.0), 100.0);
        assert_eq!(scale_to_100(-3.0), 0.0);
        assert_eq!(scale_to_100(f64::NAN), 0.0);
    }

    #[test]
    fn tolerates_fences_and_surrounding_prose() {
        let raw = "Sure! Here is the analysis:\n```json\n{\"total_score\": 8}\n```\nLet me know if you need more.";
        let set = normalizer().normalize(raw).unwrap();
        assert_eq!(set.total, 80.0);
    }

    #[test]
    fn strips_a_leading_fence() {
        assert_eq!(
            extract_json_object("```json\n{\"a\": 1}\n```").unwrap(),
            "{\"a\": 1}"
        );
        assert_eq!(extract_json_object("```\n{\"a\": 1}\n```").unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn missing_object_is_malformed() {
        let err = normalizer().normalize("I could not analyse this page.").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
        assert!(err.is_incomplete());

        let err = normalizer().normalize("} backwards {").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn unparsable_object_is_malformed() {
        let err = normalizer().normalize("{\"scores\": {\"experience\": }").unwrap_err();
        assert!(matches!(err, AnalysisError::MalformedResponse(_)));
    }

    #[test]
    fn empty_object_yields_complete_defaults() {
        let set = normalizer().normalize("{}").unwrap();
        for (_, item) in set.scores.iter() {
            assert_eq!(item.score, 0.0);
            assert_eq!(item.advice, MISSING_ADVICE);
        }
        assert_eq!(set.total, 0.0);
        assert_eq!(set.category_scores, CategoryScores::default());
        assert!(set.immediate_actions.is_empty());
        assert_eq!(set.basic_info.title, "Fallback");
        assert_eq!(set.industry_analysis, IndustryAnalysis::default());
    }

    #[test]
    fn item_scores_are_not_rescaled() {
        let set = normalizer().normalize(FULL).unwrap();
        assert_eq!(set.scores.experience.score, 7.0);
        assert_eq!(set.scores.expertise.score, 6.5);
        assert_eq!(set.scores.authoritativeness.score, 8.0);
        assert_eq!(set.scores.trustworthiness.score, 10.0);
        assert_eq!(set.scores.structure.score, 0.0);
        assert_eq!(set.scores.structure.advice, "Use FAQ blocks");
        assert_eq!(set.scores.qa_compatibility.score, 5.0);
        assert_eq!(set.scores.metadata, ScoredAdvice::missing());
    }

    #[test]
    fn totals_and_categories_are_scaled() {
        let set = normalizer().normalize(FULL).unwrap();
        assert_eq!(set.total, 68.0);
        assert_eq!(set.category_scores.eeat_score, 75.0);
        assert_eq!(set.category_scores.ai_search_score, 65.0);
        assert_eq!(set.category_scores.user_experience_score, 100.0);
        assert_eq!(set.category_scores.technical_score, 0.0);
    }

    #[test]
    fn action_lists_skip_non_objects() {
        let set = normalizer().normalize(FULL).unwrap();
        assert_eq!(set.immediate_actions.len(), 2);
        assert_eq!(set.immediate_actions[0].action, "Add FAQ schema");
        assert_eq!(set.immediate_actions[1].method, "3");
        assert_eq!(set.immediate_actions[1].expected_impact, "");
        assert_eq!(set.medium_term_strategies[0].timeline, "2 months");
        assert_eq!(set.competitive_advantages[0].advantage, "Handmade");
        assert_eq!(set.market_trend_strategies[0].priority, "high");
        assert_eq!(set.industry_analysis.market_trends, "Slow fashion");
    }

    #[test]
    fn basic_info_prefers_model_values() {
        let set = normalizer().normalize(FULL).unwrap();
        assert_eq!(set.basic_info.industry, "Fashion");
        assert_eq!(set.basic_info.url, "https://shop.example.com");
    }

    #[test]
    fn normalization_is_deterministic() {
        let first = normalizer().normalize(FULL).unwrap();
        let second = normalizer().normalize(FULL).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
