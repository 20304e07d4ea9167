//! End-to-end prioritization pipeline.
//!
//! Transforms a batch of test records through these stages:
//! 1. **Score** - combined (or legacy risk) score per test, in parallel
//! 2. **Rank** - score descending, advisory position as tie-break
//! 3. **Correct** - critic pass demoting tests unrelated to the change
//!
//! Each stage is a pure function of its inputs; a [`Prioritizer`] holds only
//! configuration and can be shared across threads.

use super::ranking::RankingEngine;
use crate::config::PrioritizerConfig;
use crate::core::{FeedbackEntry, Result, TestCase, TestId};
use crate::scoring::{ScoreCombiner, ScoredTest};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result of one prioritization pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prioritization {
    /// Final order, highest priority first. A permutation of the batch ids.
    pub order: Vec<TestId>,
    pub scores: BTreeMap<TestId, ScoredTest>,
}

impl Prioritization {
    /// Ordered `(id, score)` pairs.
    pub fn ranked(&self) -> impl Iterator<Item = (TestId, Option<&ScoredTest>)> + '_ {
        self.order.iter().map(move |id| (*id, self.scores.get(id)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Prioritizer {
    combiner: ScoreCombiner,
    use_frc: bool,
    parallel: bool,
}

impl Default for Prioritizer {
    fn default() -> Self {
        Self::new(&PrioritizerConfig::default())
    }
}

impl Prioritizer {
    pub fn new(config: &PrioritizerConfig) -> Self {
        Self {
            combiner: ScoreCombiner::from_config(config),
            use_frc: config.scoring.use_frc,
            parallel: config.scoring.parallel,
        }
    }

    /// Switch between the combined score and the legacy risk score.
    pub fn with_frc(mut self, use_frc: bool) -> Self {
        self.use_frc = use_frc;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Score every test in the batch with the configured advisory value.
    ///
    /// Fails on the first test whose record is missing a field the risk
    /// rules need.
    pub fn score_batch(
        &self,
        testcases: &[TestCase],
        change_summary: &str,
        feedback: &[FeedbackEntry],
    ) -> Result<BTreeMap<TestId, ScoredTest>> {
        self.score_batch_with_advisory(testcases, change_summary, feedback, &BTreeMap::new())
    }

    /// Like [`Self::score_batch`], taking per-test advisory values in [0, 1].
    /// Tests without an entry use the configured advisory value.
    pub fn score_batch_with_advisory(
        &self,
        testcases: &[TestCase],
        change_summary: &str,
        feedback: &[FeedbackEntry],
        advisory_weights: &BTreeMap<TestId, f64>,
    ) -> Result<BTreeMap<TestId, ScoredTest>> {
        let score_one = |tc: &TestCase| {
            self.combiner
                .compute_with_advisory(
                    tc,
                    change_summary,
                    feedback,
                    self.use_frc,
                    advisory_weights.get(&tc.id).copied(),
                )
                .map(|scored| (tc.id, scored))
        };

        let scored: Vec<(TestId, ScoredTest)> = if self.parallel {
            testcases.par_iter().map(score_one).collect::<Result<_>>()?
        } else {
            testcases.iter().map(score_one).collect::<Result<_>>()?
        };

        log::debug!("Scored {} tests", scored.len());
        Ok(scored.into_iter().collect())
    }

    /// Score, rank and correct a batch.
    ///
    /// # Examples
    ///
    /// ```
    /// use testprio::core::TestCase;
    /// use testprio::priority::Prioritizer;
    ///
    /// let tests = vec![
    ///     TestCase::new(1, "Footer links")
    ///         .with_component("Footer")
    ///         .with_ui_element("link")
    ///         .with_selector("footer a")
    ///         .with_execution_time(1.0),
    ///     TestCase::new(2, "Login button")
    ///         .with_component("Login")
    ///         .with_ui_element("button")
    ///         .with_selector("#login")
    ///         .with_execution_time(1.0),
    /// ];
    ///
    /// let result = Prioritizer::default()
    ///     .prioritize(&tests, "Login form redesign", &[], &[])
    ///     .unwrap();
    /// assert_eq!(result.order, vec![2, 1]);
    /// ```
    pub fn prioritize(
        &self,
        testcases: &[TestCase],
        change_summary: &str,
        feedback: &[FeedbackEntry],
        advisory_order: &[TestId],
    ) -> Result<Prioritization> {
        self.prioritize_with_advisory(
            testcases,
            change_summary,
            feedback,
            advisory_order,
            &BTreeMap::new(),
        )
    }

    /// [`Self::prioritize`] with per-test advisory values blended into the
    /// combined score. Ignored in legacy mode.
    pub fn prioritize_with_advisory(
        &self,
        testcases: &[TestCase],
        change_summary: &str,
        feedback: &[FeedbackEntry],
        advisory_order: &[TestId],
        advisory_weights: &BTreeMap<TestId, f64>,
    ) -> Result<Prioritization> {
        let engine = RankingEngine::new(testcases)?;
        let scores =
            self.score_batch_with_advisory(testcases, change_summary, feedback, advisory_weights)?;

        let values: BTreeMap<TestId, f64> =
            scores.iter().map(|(id, scored)| (*id, scored.score)).collect();
        let order = engine.rank_and_correct(advisory_order, &values, change_summary)?;

        log::info!(
            "Prioritized {} tests ({} advisory ids supplied)",
            order.len(),
            advisory_order.len()
        );
        Ok(Prioritization { order, scores })
    }
}
