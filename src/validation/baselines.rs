//! Baseline orderings a prioritized order is compared against.
//!
//! Two baselines are randomized (`random` and the tie-break inside
//! `history_based`); both draw from the generator the caller passes in, the
//! shuffle first, so a seeded generator reproduces them exactly.

use crate::core::{TestCase, TestId};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Execution time assumed for records that do not carry one.
pub const DEFAULT_EXECUTION_TIME: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Uniform shuffle
    Random,
    /// Batch order
    Fifo,
    /// Batch order reversed
    Reverse,
    /// Last-run failures first, random tie-break
    HistoryBased,
    /// Fastest tests first
    RiskBased,
    /// Flaky tests first, then last-run failures
    FlakyAware,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::Random,
        Strategy::Fifo,
        Strategy::Reverse,
        Strategy::HistoryBased,
        Strategy::RiskBased,
        Strategy::FlakyAware,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Random => "random",
            Strategy::Fifo => "fifo",
            Strategy::Reverse => "reverse",
            Strategy::HistoryBased => "history_based",
            Strategy::RiskBased => "risk_based",
            Strategy::FlakyAware => "flaky_aware",
        }
    }

    /// Key used in APFD comparison maps, e.g. `random_apfd`.
    pub fn apfd_key(&self) -> String {
        format!("{}_apfd", self.name())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One ordering per [`Strategy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaselineOrderings {
    pub random: Vec<TestId>,
    pub fifo: Vec<TestId>,
    pub reverse: Vec<TestId>,
    pub history_based: Vec<TestId>,
    pub risk_based: Vec<TestId>,
    pub flaky_aware: Vec<TestId>,
}

impl BaselineOrderings {
    pub fn generate<R: Rng>(testcases: &[TestCase], rng: &mut R) -> Self {
        let ids: Vec<TestId> = testcases.iter().map(|tc| tc.id).collect();

        let mut random = ids.clone();
        random.shuffle(rng);

        let reverse: Vec<TestId> = ids.iter().rev().copied().collect();

        Self {
            random,
            fifo: ids,
            reverse,
            history_based: history_order(testcases, rng),
            risk_based: fastest_first(testcases),
            flaky_aware: flaky_first(testcases),
        }
    }

    pub fn get(&self, strategy: Strategy) -> &[TestId] {
        match strategy {
            Strategy::Random => &self.random,
            Strategy::Fifo => &self.fifo,
            Strategy::Reverse => &self.reverse,
            Strategy::HistoryBased => &self.history_based,
            Strategy::RiskBased => &self.risk_based,
            Strategy::FlakyAware => &self.flaky_aware,
        }
    }

    /// Orderings in [`Strategy::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Strategy, &[TestId])> + '_ {
        Strategy::ALL.into_iter().map(move |s| (s, self.get(s)))
    }
}

// Only the pass/fail flag of the last run is used; recency beyond that is
// not modelled.
fn history_order<R: Rng>(testcases: &[TestCase], rng: &mut R) -> Vec<TestId> {
    let mut keyed: Vec<(bool, f64, TestId)> = testcases
        .iter()
        .map(|tc| (!tc.has_failed_last(), rng.random::<f64>(), tc.id))
        .collect();
    keyed.sort_by(|a, b| {
        a.0.cmp(&b.0)
            .then(a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal))
    });
    keyed.into_iter().map(|(_, _, id)| id).collect()
}

fn fastest_first(testcases: &[TestCase]) -> Vec<TestId> {
    let mut sorted: Vec<&TestCase> = testcases.iter().collect();
    sorted.sort_by(|a, b| {
        let a_time = a.execution_time.unwrap_or(DEFAULT_EXECUTION_TIME);
        let b_time = b.execution_time.unwrap_or(DEFAULT_EXECUTION_TIME);
        a_time.partial_cmp(&b_time).unwrap_or(Ordering::Equal)
    });
    sorted.into_iter().map(|tc| tc.id).collect()
}

fn flaky_first(testcases: &[TestCase]) -> Vec<TestId> {
    let mut sorted: Vec<&TestCase> = testcases.iter().collect();
    sorted.sort_by_key(|tc| (!tc.flaky, !tc.has_failed_last()));
    sorted.into_iter().map(|tc| tc.id).collect()
}
