//! Combined score: normalized legacy risk, FRC and an advisory weight.
//!
//! ```text
//! combined = 0.4 * normalize(risk) + 0.4 * frc + 0.2 * advisory
//! ```
//!
//! With FRC disabled the legacy risk score is returned unchanged.

use crate::config::{default_advisory_weight, PrioritizerConfig, ScoringWeights};
use crate::core::{round_to, FeedbackEntry, Result, TestCase};
use crate::scoring::frc::FrcScorer;
use crate::scoring::risk::RiskScorer;
use crate::scoring::score_normalizer::normalize_risk;
use serde::{Deserialize, Serialize};

/// Which formula produced a [`ScoredTest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreMode {
    /// Unbounded legacy risk score
    Legacy,
    /// Blended score in [0, 1]
    Combined,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredTest {
    pub score: f64,
    pub reason: String,
    pub mode: ScoreMode,
}

#[derive(Debug, Clone)]
pub struct ScoreCombiner {
    risk: RiskScorer,
    frc: FrcScorer,
    weights: ScoringWeights,
    advisory_weight: f64,
}

impl Default for ScoreCombiner {
    fn default() -> Self {
        Self::new(FrcScorer::default(), ScoringWeights::default())
    }
}

impl ScoreCombiner {
    pub fn new(frc: FrcScorer, weights: ScoringWeights) -> Self {
        Self {
            risk: RiskScorer::new(),
            frc,
            weights,
            advisory_weight: default_advisory_weight(),
        }
    }

    pub fn from_config(config: &PrioritizerConfig) -> Self {
        Self::new(
            FrcScorer::new(config.criticality.clone(), config.frc),
            config.scoring.weights,
        )
        .with_advisory_weight(config.scoring.advisory_weight)
    }

    /// Advisory value used when a call does not supply one.
    pub fn with_advisory_weight(mut self, advisory_weight: f64) -> Self {
        self.advisory_weight = advisory_weight.clamp(0.0, 1.0);
        self
    }

    pub fn compute_combined_score(
        &self,
        testcase: &TestCase,
        change_summary: &str,
        feedback: &[FeedbackEntry],
        use_frc: bool,
    ) -> Result<ScoredTest> {
        self.compute_with_advisory(testcase, change_summary, feedback, use_frc, None)
    }

    /// Like [`Self::compute_combined_score`] with an explicit advisory value
    /// for this test; `None` falls back to the configured neutral value.
    pub fn compute_with_advisory(
        &self,
        testcase: &TestCase,
        change_summary: &str,
        feedback: &[FeedbackEntry],
        use_frc: bool,
        advisory_weight: Option<f64>,
    ) -> Result<ScoredTest> {
        let risk = self
            .risk
            .compute_risk_score(testcase, change_summary, feedback)?;

        if !use_frc {
            return Ok(ScoredTest {
                score: risk.value as f64,
                reason: risk.reason(),
                mode: ScoreMode::Legacy,
            });
        }

        let normalized_risk = normalize_risk(risk.value as f64);
        let frc = self.frc.compute_frc(testcase, change_summary, feedback);
        let advisory = advisory_weight
            .map(|w| w.clamp(0.0, 1.0))
            .unwrap_or(self.advisory_weight);

        let combined = round_to(
            self.weights.risk * normalized_risk
                + self.weights.frc * frc
                + self.weights.advisory * advisory,
            4,
        );

        Ok(ScoredTest {
            score: combined,
            reason: format!(
                "Risk:{:.2} + FRC:{:.2} + LLM:{} = Combined:{:.2}",
                normalized_risk, frc, advisory, combined
            ),
            mode: ScoreMode::Combined,
        })
    }
}
