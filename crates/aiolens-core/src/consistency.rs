//! Recomputation of stored aggregates
//!
//! Deltas are informational. An LLM-reported AIO total may legitimately
//! differ from the mean of its own item scores.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::aio::AioScoreSet;
use crate::config::Balance;
use crate::integrate::{IntegratedResult, blend};
use crate::seo::{SeoScoreSet, aggregate};

/// Deltas larger than this are logged at warn level
const NOTABLE_DELTA: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyCheck {
    /// Independently recomputed value
    pub expected: f64,
    /// Value as stored
    pub reported: f64,
    /// `reported - expected`
    pub delta: f64,
}

impl ConsistencyCheck {
    pub fn new(expected: f64, reported: f64) -> Self {
        Self {
            expected,
            reported,
            delta: reported - expected,
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.delta.abs() <= NOTABLE_DELTA
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub seo: ConsistencyCheck,
    pub aio: ConsistencyCheck,
    pub integrated: ConsistencyCheck,
}

/// Recompute all three aggregates and diff them against the stored values
///
/// `balance` is the weighting the integrated score is expected to use.
pub fn validate(
    seo: &SeoScoreSet,
    aio: &AioScoreSet,
    integrated: &IntegratedResult,
    balance: Balance,
) -> ConsistencyReport {
    let report = ConsistencyReport {
        seo: ConsistencyCheck::new(aggregate(&seo.subscores()), seo.total),
        aio: ConsistencyCheck::new(aio.scores.observed_total(), aio.total),
        integrated: ConsistencyCheck::new(
            blend(seo.total, aio.total, balance),
            integrated.integrated_score,
        ),
    };

    if !report.seo.is_consistent() {
        warn!(delta = report.seo.delta, "stored SEO total differs from its sub-scores");
    }
    if !report.integrated.is_consistent() {
        warn!(delta = report.integrated.delta, "stored integrated score differs from blend");
    }
    debug!(
        seo_delta = report.seo.delta,
        aio_delta = report.aio.delta,
        integrated_delta = report.integrated.delta,
        "consistency check"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aio::{AioItemScores, BasicInfo, CategoryScores, IndustryAnalysis, ScoredAdvice};
    use crate::integrate::ResultIntegrator;

    fn aio(item_score: f64, total: f64) -> AioScoreSet {
        AioScoreSet {
            basic_info: BasicInfo::default(),
            scores: AioItemScores::from_fn(|_| ScoredAdvice {
                score: item_score,
                advice: String::new(),
            }),
            category_scores: CategoryScores::default(),
            total,
            immediate_actions: Vec::new(),
            medium_term_strategies: Vec::new(),
            competitive_advantages: Vec::new(),
            market_trend_strategies: Vec::new(),
            industry_analysis: IndustryAnalysis::default(),
        }
    }

    #[test]
    fn freshly_computed_results_are_consistent() {
        let seo = SeoScoreSet::from_subscores([10.0, 8.0, 7.0, 9.4, 8.2, 6.0, 8.333]);
        let aio = aio(6.0, 60.0);
        let balance = Balance::new(30).unwrap();
        let integrated = ResultIntegrator::new(balance).integrate(&seo, &aio);
        let report = validate(&seo, &aio, &integrated, balance);
        assert!(report.seo.is_consistent());
        assert!(report.aio.is_consistent());
        assert!(report.integrated.is_consistent());
    }

    #[test]
    fn reports_llm_self_reporting_drift() {
        let seo = SeoScoreSet::from_subscores([5.0; 7]);
        let aio = aio(5.0, 72.0);
        let integrated = ResultIntegrator::default().integrate(&seo, &aio);
        let report = validate(&seo, &aio, &integrated, Balance::DEFAULT);
        assert_eq!(report.aio.expected, 50.0);
        assert_eq!(report.aio.reported, 72.0);
        assert_eq!(report.aio.delta, 22.0);
        assert!(report.integrated.is_consistent());
    }

    #[test]
    fn detects_tampered_totals() {
        let mut seo = SeoScoreSet::from_subscores([5.0; 7]);
        let aio = aio(5.0, 50.0);
        let mut integrated = ResultIntegrator::default().integrate(&seo, &aio);
        seo.total = 55.0;
        integrated.integrated_score = 40.0;
        let report = validate(&seo, &aio, &integrated, Balance::DEFAULT);
        assert_eq!(report.seo.delta, 5.0);
        // blend uses the stored totals: 55 * 0.5 + 50 * 0.5
        assert_eq!(report.integrated.expected, 52.5);
        assert_eq!(report.integrated.delta, -12.5);
    }

    #[test]
    fn blend_is_recomputed_with_the_given_balance() {
        let seo = SeoScoreSet::from_subscores([8.0; 7]);
        let aio = aio(4.0, 40.0);
        let integrated = ResultIntegrator::default().integrate(&seo, &aio);
        let report = validate(&seo, &aio, &integrated, Balance::new(100).unwrap());
        assert_eq!(report.integrated.expected, 40.0);
        assert!((report.integrated.delta - 20.0).abs() < 1e-9);
    }
}
