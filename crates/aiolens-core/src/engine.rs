//! Orchestration of one analysis run

use tracing::{debug, info, warn};

use crate::aio::{AioNormalizer, AioPrompt, BasicInfo, LlmClient};
use crate::config::AnalysisConfig;
use crate::consistency::validate;
use crate::content::ContentExtractor;
use crate::error::{AnalysisError, Result};
use crate::industry::{IndustryDetector, resolve_industry};
use crate::integrate::ResultIntegrator;
use crate::markup::{MarkupProvider, ScraperDocument};
use crate::report::AnalysisReport;
use crate::seo::SeoScorer;
use crate::signals::SignalExtractor;
use crate::url_utils::normalize_target;

/// Runs the full pipeline with injected collaborators
///
/// The SEO and AIO sides are reported together: if the LLM side fails, the
/// whole run fails.
#[derive(Debug, Clone)]
pub struct AnalysisEngine<D, L> {
    detector: D,
    llm: L,
    config: AnalysisConfig,
}

impl<D, L> AnalysisEngine<D, L>
where
    D: IndustryDetector,
    L: LlmClient,
{
    pub fn new(detector: D, llm: L) -> Self {
        Self {
            detector,
            llm,
            config: AnalysisConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Parse `html` and analyse it as the page served at `url`
    pub fn analyze_html(
        &self,
        url: &str,
        html: &str,
        user_industry: Option<&str>,
    ) -> Result<AnalysisReport> {
        let document = ScraperDocument::parse(html);
        self.analyze_document(url, &document, user_industry)
    }

    pub fn analyze_document<M>(
        &self,
        url: &str,
        document: &M,
        user_industry: Option<&str>,
    ) -> Result<AnalysisReport>
    where
        M: MarkupProvider + Clone,
    {
        let url = normalize_target(url);
        let balance = self.config.balance;

        let content = ContentExtractor::new().extract(document);
        let signals = SignalExtractor::new().extract(document, &url, &content);
        debug!(
            content_chars = content.chars().count(),
            word_count = signals.word_count,
            "extracted page signals"
        );

        let detected = self
            .detector
            .detect(&signals.title, &content, &signals.meta_description)
            .map_err(AnalysisError::Detector)?;
        let industry = resolve_industry(user_industry, &detected);
        if industry.is_undetermined() {
            warn!(
                detected = %detected.primary_industry,
                confidence = detected.confidence,
                "industry undetermined"
            );
        }

        let seo = SeoScorer::new().score(&signals);

        let prompt = AioPrompt::new(&url, &signals.title, &industry, &detected, &content);
        let raw = self.llm.complete(&prompt).map_err(AnalysisError::Llm)?;
        let aio = AioNormalizer::new(BasicInfo {
            url: url.clone(),
            industry: industry.primary.clone(),
            title: signals.title.clone(),
        })
        .normalize(&raw)?;

        let integrated = ResultIntegrator::new(balance).integrate(&seo, &aio);
        let consistency = validate(&seo, &aio, &integrated, balance);

        info!(
            %url,
            industry = %industry.primary,
            seo = seo.total,
            aio = aio.total,
            integrated = integrated.integrated_score,
            "analysis complete"
        );

        Ok(AnalysisReport {
            url,
            user_industry: user_industry
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            balance,
            signals,
            detected_industry: detected,
            industry,
            seo,
            aio,
            integrated,
            consistency,
        })
    }
}
