//! # aiolens-core
//!
//! Scoring core for judging a web page on two fronts: classic SEO
//! heuristics and its suitability for generative-AI search (AIO).
//!
//! This library provides:
//! - Main-content and page-signal extraction over a [`MarkupProvider`]
//! - Seven deterministic SEO sub-scores and their aggregate
//! - Industry verdict resolution from user input and a detector
//! - Repair and normalization of a raw LLM assessment
//! - Balance-weighted integration with a prioritized improvement list
//! - A recomputation-based consistency check
//!
//! Network access, the industry model and the LLM itself stay outside the
//! crate behind the [`IndustryDetector`] and [`LlmClient`] traits.
//!
//! ## Example
//!
//! ```no_run
//! use aiolens_core::{
//!     AioPrompt, AnalysisConfig, AnalysisEngine, Balance, DetectedIndustry, IndustryDetector,
//!     LlmClient,
//! };
//!
//! struct Detector;
//! impl IndustryDetector for Detector {
//!     fn detect(&self, _: &str, _: &str, _: &str) -> anyhow::Result<DetectedIndustry> {
//!         Ok(DetectedIndustry::default())
//!     }
//! }
//!
//! struct Llm;
//! impl LlmClient for Llm {
//!     fn complete(&self, _prompt: &AioPrompt) -> anyhow::Result<String> {
//!         Ok(r#"{"total_score": 7}"#.to_string())
//!     }
//! }
//!
//! # fn example() -> anyhow::Result<()> {
//! let engine = AnalysisEngine::new(Detector, Llm)
//!     .with_config(AnalysisConfig::with_balance(Balance::new(60)?));
//! let report = engine.analyze_html("example.com", "<title>Example</title>", Some("retail"))?;
//! println!("{:.1}", report.integrated.integrated_score);
//! # Ok(())
//! # }
//! ```

pub mod aio;
pub mod config;
pub mod consistency;
pub mod content;
pub mod engine;
pub mod error;
pub mod industry;
pub mod integrate;
pub mod markup;
pub mod report;
pub mod seo;
pub mod signals;
pub mod url_utils;

// Re-export commonly used types
pub use aio::{AioNormalizer, AioPrompt, AioScoreSet, LlmClient};
pub use config::{AnalysisConfig, Balance};
pub use consistency::{ConsistencyCheck, ConsistencyReport, validate};
pub use content::ContentExtractor;
pub use engine::AnalysisEngine;
pub use error::{AnalysisError, Result};
pub use industry::{DetectedIndustry, IndustryDetector, IndustryVerdict, Resolution, resolve_industry};
pub use integrate::{Focus, Improvement, IntegratedResult, ResultIntegrator};
pub use markup::{MarkupProvider, ScraperDocument};
pub use report::{AnalysisReport, ReportRenderer};
pub use seo::{SeoItem, SeoScoreSet, SeoScorer};
pub use signals::{PageSignals, SignalExtractor};
