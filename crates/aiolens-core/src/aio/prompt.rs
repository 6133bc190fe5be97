//! Prompt sent to the LLM collaborator

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

use super::{AioCategory, AioItem};
use crate::industry::{DetectedIndustry, IndustryVerdict};

/// Upper bound on the page text included in the prompt, in characters
pub const CONTENT_PREVIEW_CHARS: usize = 7000;

const MAX_SECONDARY_INDUSTRIES: usize = 3;
const MAX_SPECIALIZED_TERMS: usize = 5;
const MISSING_TITLE: &str = "N/A";

const SYSTEM_MESSAGE: &str = "You are an expert in SEO and AIO (optimization for generative-AI search engines).\n\
Include current market trends in your analysis where relevant.\n\n\
Important: reply with a single valid JSON object and nothing else.";

const CATEGORY_GUIDE: &str = "\
### 1. E-E-A-T (40%)
- Experience: first-hand information and the quality of concrete examples
- Expertise: depth of knowledge and how current the information is
- Authoritativeness: citation value, industry recognition, links to reliable sources
- Trustworthiness: verifiability, transparency, absence of bias

### 2. AI search optimization (35%)
- Structure: logical layout and an information hierarchy machines can follow
- Q&A compatibility: how directly the page answers user questions
- Citation potential: how easily an AI answer can quote or summarise it
- Multimodal: quality of images, tables and figures and their descriptions

### 3. User experience (25%)
- Search intent: coverage of the different intents behind a query
- Personalization: adaptability to different audiences
- Uniqueness: original content and perspective
- Completeness: breadth and depth of topic coverage

### 4. Technical
- Readability, mobile friendliness, page speed and metadata quality";

/// System and user messages for one AIO assessment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AioPrompt {
    pub system: String,
    pub user: String,
}

impl AioPrompt {
    pub fn new(
        url: &str,
        title: &str,
        verdict: &IndustryVerdict,
        detected: &DetectedIndustry,
        content: &str,
    ) -> Self {
        let title = if title.trim().is_empty() {
            MISSING_TITLE
        } else {
            title.trim()
        };
        let industry = verdict.primary.as_str();
        let preview: String = content.chars().take(CONTENT_PREVIEW_CHARS).collect();

        let mut user = String::new();
        user.push_str(
            "Analyse the following web page for performance in generative-AI search engines \
             (ChatGPT Search, Claude, Gemini, Perplexity and similar).\n\n",
        );
        let _ = writeln!(user, "**Target:**\nURL: {url}\nTitle: {title}\n");
        let _ = writeln!(user, "**Industry context:**\n{}", industry_block(verdict, detected));
        let _ = writeln!(user, "**Content:**\n{preview}\n");
        let _ = writeln!(user, "## Evaluation items (each scored 0-10)\n\n{CATEGORY_GUIDE}\n");
        let _ = writeln!(
            user,
            "## {industry} industry analysis\n\
             Taking current market trends into account, assess:\n\
             - correct use and explanation of industry terminology\n\
             - how well recent industry trends are reflected\n\
             - fit with the target audience\n\
             - differentiation from competitors\n\
             - industry trust signals (certifications, track record, accreditations)\n\
             - regulatory and compliance coverage\n"
        );
        let _ = writeln!(
            user,
            "## Improvement actions\n\
             1. Immediate actions (implementable within 1-2 weeks), at least three\n\
             2. Medium-term strategies (1-3 months), at least three\n\
             3. Competitive differentiation, at least three\n\
             4. Market-trend strategies grounded in current {industry} trends\n"
        );
        let _ = write!(
            user,
            "## JSON output format\n{}",
            output_schema(url, industry, title)
        );

        Self {
            system: SYSTEM_MESSAGE.to_string(),
            user,
        }
    }
}

fn industry_block(verdict: &IndustryVerdict, detected: &DetectedIndustry) -> String {
    let list_or = |items: &[String], limit: usize, empty: &str| {
        if items.is_empty() {
            empty.to_string()
        } else {
            items.iter().take(limit).cloned().collect::<Vec<_>>().join(", ")
        }
    };

    format!(
        "Primary industry: {} ({})\n\
         Confidence: {:.1}%\n\
         Secondary industries: {}\n\
         Specialized terms: {}\n\
         Target audience: {}\n\
         Regulatory requirements: {}\n",
        verdict.primary,
        verdict.resolution,
        verdict.confidence,
        list_or(&verdict.secondary_detected, MAX_SECONDARY_INDUSTRIES, "none"),
        list_or(&detected.specialized_terms, MAX_SPECIALIZED_TERMS, "none"),
        list_or(&detected.target_audience_clues, usize::MAX, "unknown"),
        list_or(&detected.regulatory_indicators, usize::MAX, "none"),
    )
}

fn output_schema(url: &str, industry: &str, title: &str) -> String {
    let advice = "concrete, actionable advice";
    let scores: Map<String, JsonValue> = AioItem::ALL
        .iter()
        .map(|item| (item.key().to_string(), json!({ "score": 0, "advice": advice })))
        .collect();
    let categories: Map<String, JsonValue> = AioCategory::ALL
        .iter()
        .map(|category| (category.key().to_string(), json!(0.0)))
        .collect();

    let schema = json!({
        "basic_info": { "url": url, "industry": industry, "title": title },
        "scores": scores,
        "category_scores": categories,
        "total_score": 0.0,
        "immediate_actions": [
            { "action": "action", "method": "implementation method", "expected_impact": "expected impact" }
        ],
        "medium_term_strategies": [
            { "strategy": "strategy", "timeline": "timeline", "expected_outcome": "expected outcome" }
        ],
        "competitive_advantages": [
            { "advantage": "differentiator", "implementation": "implementation method" }
        ],
        "market_trend_strategies": [
            { "trend": "trend", "strategy": "response", "priority": "priority" }
        ],
        "industry_analysis": {
            "industry_fit": format!("fit for the {industry} industry"),
            "specialized_improvements": "industry-specific improvements",
            "compliance_check": "regulatory and compliance status",
            "market_trends": "current market trends and how the page addresses them"
        }
    });
    serde_json::to_string_pretty(&schema).unwrap_or_else(|_| schema.to_string())
}
