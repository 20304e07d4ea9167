//! APFD validation against baseline orderings.

use super::apfd;
use super::baselines::{BaselineOrderings, Strategy, DEFAULT_EXECUTION_TIME};
use crate::core::{round_to, Error, Result, TestCase, TestId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Fraction of the batch inspected by the "found earlier" comparison.
pub const EARLY_WINDOW_FRACTION: f64 = 0.2;

/// Floor for the random APFD when computing the lift factor.
const MIN_RANDOM_APFD: f64 = 0.001;

pub const AGENTIC_APFD_KEY: &str = "agentic_apfd";

/// Failing tests found inside the early window by each ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarlyFaultCounts {
    pub agentic: usize,
    pub random: usize,
}

/// Outcome of one validation call. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// APFD per ordering, keyed `agentic_apfd`, `random_apfd`, ...
    pub apfd_scores: BTreeMap<String, f64>,
    pub early_fault_detection: BTreeMap<usize, f64>,
    pub precision_at_k: BTreeMap<usize, f64>,
    pub wasted_effort: usize,
    /// Seconds saved against the random baseline; negative when slower.
    pub time_saved: f64,
    pub lift_factor: f64,
    pub failing_tests_found_earlier_top_20_percent: EarlyFaultCounts,
    pub total_tests: usize,
    pub failing_tests: usize,
    pub agentic_apfd: f64,
    pub random_apfd: f64,
    pub improvement_over_random: f64,
}

/// Scores orderings of a fixed batch.
///
/// Randomized baselines come from a generator seeded per call: with a seed
/// every call reproduces the same baselines, without one each call draws
/// fresh entropy.
#[derive(Debug, Clone)]
pub struct ApfdValidator {
    testcases: Vec<TestCase>,
    by_id: HashMap<TestId, usize>,
    seed: Option<u64>,
}

impl ApfdValidator {
    pub fn new(testcases: &[TestCase]) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(testcases.len());
        for (index, tc) in testcases.iter().enumerate() {
            if by_id.insert(tc.id, index).is_some() {
                return Err(Error::DuplicateTestId(tc.id));
            }
        }
        Ok(Self {
            testcases: testcases.to_vec(),
            by_id,
            seed: None,
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn total_tests(&self) -> usize {
        self.testcases.len()
    }

    pub fn get(&self, id: TestId) -> Option<&TestCase> {
        self.by_id.get(&id).map(|&index| &self.testcases[index])
    }

    pub fn compute_apfd(&self, order: &[TestId], failing: &BTreeSet<TestId>) -> f64 {
        apfd::compute_apfd(order, failing)
    }

    pub fn early_fault_detection(
        &self,
        order: &[TestId],
        failing: &BTreeSet<TestId>,
        k_values: &[usize],
    ) -> BTreeMap<usize, f64> {
        apfd::early_fault_detection(order, failing, k_values)
    }

    pub fn precision_at_k(
        &self,
        order: &[TestId],
        failing: &BTreeSet<TestId>,
        k_values: &[usize],
    ) -> BTreeMap<usize, f64> {
        apfd::precision_at_k(order, failing, k_values)
    }

    pub fn wasted_effort(&self, order: &[TestId], failing: &BTreeSet<TestId>) -> usize {
        apfd::wasted_effort(order, failing)
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }

    /// Fresh baselines from this validator's seed.
    pub fn generate_baseline_orderings(&self) -> BaselineOrderings {
        self.generate_baseline_orderings_with(&mut self.rng())
    }

    /// Baselines drawn from a caller-supplied generator.
    pub fn generate_baseline_orderings_with<R: Rng>(&self, rng: &mut R) -> BaselineOrderings {
        BaselineOrderings::generate(&self.testcases, rng)
    }

    /// Seconds for `id`; ids unknown to the batch, or records without a
    /// time, count as one second.
    pub fn execution_time(&self, id: TestId) -> f64 {
        self.get(id)
            .and_then(|tc| tc.execution_time)
            .unwrap_or(DEFAULT_EXECUTION_TIME)
    }

    /// Cumulative execution time until every failing test has run. When the
    /// ordering never covers the whole failing set, the time for the whole
    /// ordering.
    pub fn time_to_find_all_faults(&self, order: &[TestId], failing: &BTreeSet<TestId>) -> f64 {
        if failing.is_empty() {
            return 0.0;
        }

        let mut elapsed = 0.0;
        let mut found = BTreeSet::new();
        for id in order {
            elapsed += self.execution_time(*id);
            if failing.contains(id) {
                found.insert(*id);
            }
            if found.len() == failing.len() {
                break;
            }
        }
        elapsed
    }

    /// Random-order time minus agentic-order time, rounded to 2 places.
    pub fn time_saved(
        &self,
        agentic_order: &[TestId],
        random_order: &[TestId],
        failing: &BTreeSet<TestId>,
    ) -> f64 {
        let agentic = self.time_to_find_all_faults(agentic_order, failing);
        let random = self.time_to_find_all_faults(random_order, failing);
        round_to(random - agentic, 2)
    }

    /// Failing tests within the first 20% of the batch, per ordering.
    pub fn failing_tests_found_earlier(
        &self,
        agentic_order: &[TestId],
        random_order: &[TestId],
        failing: &BTreeSet<TestId>,
    ) -> EarlyFaultCounts {
        let window = (self.testcases.len() as f64 * EARLY_WINDOW_FRACTION).floor() as usize;
        if window == 0 {
            return EarlyFaultCounts::default();
        }

        let found_within = |order: &[TestId]| {
            order
                .iter()
                .take(window)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|id| failing.contains(*id))
                .count()
        };

        EarlyFaultCounts {
            agentic: found_within(agentic_order),
            random: found_within(random_order),
        }
    }

    /// APFD of the agentic order and of six freshly generated baselines.
    pub fn compare_against_baselines(
        &self,
        agentic_order: &[TestId],
        failing: &BTreeSet<TestId>,
    ) -> BTreeMap<String, f64> {
        let baselines = self.generate_baseline_orderings();
        self.apfd_scores(agentic_order, failing, &baselines)
    }

    fn apfd_scores(
        &self,
        agentic_order: &[TestId],
        failing: &BTreeSet<TestId>,
        baselines: &BaselineOrderings,
    ) -> BTreeMap<String, f64> {
        let mut scores = BTreeMap::new();
        scores.insert(
            AGENTIC_APFD_KEY.to_string(),
            apfd::compute_apfd(agentic_order, failing),
        );
        for (strategy, order) in baselines.iter() {
            scores.insert(strategy.apfd_key(), apfd::compute_apfd(order, failing));
        }
        scores
    }

    /// 10%, 20% and 30% of the batch size, rounded down; zeros and repeats
    /// are dropped and an empty result becomes `[1]`.
    pub fn default_k_values(&self) -> Vec<usize> {
        let n = self.testcases.len();
        let mut ks: Vec<usize> = [0.1, 0.2, 0.3]
            .iter()
            .map(|fraction| (n as f64 * fraction).floor() as usize)
            .filter(|k| *k > 0)
            .collect();
        ks.dedup();
        if ks.is_empty() {
            vec![1]
        } else {
            ks
        }
    }

    pub fn generate_report(
        &self,
        agentic_order: &[TestId],
        failing: &BTreeSet<TestId>,
    ) -> ValidationReport {
        self.generate_report_with_k(agentic_order, failing, &self.default_k_values())
    }

    /// Full report. One set of baselines is generated and shared by the APFD
    /// comparison, the time saved and the early-window counts.
    pub fn generate_report_with_k(
        &self,
        agentic_order: &[TestId],
        failing: &BTreeSet<TestId>,
        k_values: &[usize],
    ) -> ValidationReport {
        let baselines = self.generate_baseline_orderings();
        let random_order = baselines.get(Strategy::Random);
        let apfd_scores = self.apfd_scores(agentic_order, failing, &baselines);

        let agentic_apfd = apfd_scores
            .get(AGENTIC_APFD_KEY)
            .copied()
            .unwrap_or_default();
        let random_apfd = apfd_scores
            .get(&Strategy::Random.apfd_key())
            .copied()
            .unwrap_or_default();
        let lift_factor = round_to(agentic_apfd / random_apfd.max(MIN_RANDOM_APFD), 2);

        let report = ValidationReport {
            early_fault_detection: apfd::early_fault_detection(agentic_order, failing, k_values),
            precision_at_k: apfd::precision_at_k(agentic_order, failing, k_values),
            wasted_effort: apfd::wasted_effort(agentic_order, failing),
            time_saved: self.time_saved(agentic_order, random_order, failing),
            lift_factor,
            failing_tests_found_earlier_top_20_percent: self.failing_tests_found_earlier(
                agentic_order,
                random_order,
                failing,
            ),
            total_tests: self.testcases.len(),
            failing_tests: failing.len(),
            agentic_apfd,
            random_apfd,
            improvement_over_random: round_to(agentic_apfd - random_apfd, 4),
            apfd_scores,
        };

        log::debug!(
            "APFD agentic={:.4} random={:.4} lift={:.2}",
            report.agentic_apfd,
            report.random_apfd,
            report.lift_factor
        );
        report
    }
}
