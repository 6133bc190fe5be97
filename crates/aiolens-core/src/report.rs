//! The final analysis bundle and the renderer seam

use serde::{Deserialize, Serialize};

use crate::aio::AioScoreSet;
use crate::config::Balance;
use crate::consistency::{ConsistencyReport, validate};
use crate::industry::{DetectedIndustry, IndustryVerdict};
use crate::integrate::IntegratedResult;
use crate::seo::SeoScoreSet;
use crate::signals::PageSignals;

/// Everything one analysis run produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub url: String,
    #[serde(default)]
    pub user_industry: Option<String>,
    /// Weighting of the integrated score; `recheck` blends with this value
    pub balance: Balance,
    pub signals: PageSignals,
    pub detected_industry: DetectedIndustry,
    pub industry: IndustryVerdict,
    pub seo: SeoScoreSet,
    pub aio: AioScoreSet,
    pub integrated: IntegratedResult,
    pub consistency: ConsistencyReport,
}

impl AnalysisReport {
    /// Recompute the consistency report from the stored scores
    ///
    /// For a report loaded from disk this surfaces any edits made to it
    /// since it was written.
    pub fn recheck(&self) -> ConsistencyReport {
        validate(&self.seo, &self.aio, &self.integrated, self.balance)
    }
}

/// Turns a finished report into human-facing output
pub trait ReportRenderer {
    fn render(&self, report: &AnalysisReport) -> anyhow::Result<String>;
}
