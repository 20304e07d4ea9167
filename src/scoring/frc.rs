//! Failure Risk Coverage (FRC) scoring.
//!
//! FRC folds four signals into a single score in [0, 1]:
//!
//! | Signal               | Default weight | Source                              |
//! |----------------------|----------------|-------------------------------------|
//! | Failure history      | 0.4            | feedback log, recency weighted      |
//! | Component criticality| 0.3            | [`CriticalityTable`]                |
//! | Selector fragility   | 0.2            | CSS / XPath shape heuristics        |
//! | Flakiness            | 0.1            | explicit `flaky` flag               |
//!
//! The scorer is lenient: missing fields degrade to neutral defaults and no
//! input makes it fail.

use crate::config::{CriticalityTable, FrcWeights};
use crate::core::{round_to, FeedbackEntry, TestCase, TestId, TestStatus};
use crate::scoring::history::StatusHistory;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Number of most recent runs considered by the recency term.
const RECENCY_WINDOW: usize = 5;
const FAILURE_RATE_SHARE: f64 = 0.7;
const RECENCY_SHARE: f64 = 0.3;

/// Fragility reported for tests without a selector.
pub const EMPTY_SELECTOR_FRAGILITY: f64 = 0.5;

static XPATH_POSITION_PREDICATE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[\d+\]").unwrap());
static CSS_CONTAINS_MATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*\*=").unwrap());
static CSS_PREFIX_MATCH: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[.*\^=").unwrap());

/// The weighted sub-scores behind one FRC value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrcBreakdown {
    pub failure_history: f64,
    pub criticality: f64,
    pub fragility: f64,
    pub flakiness: f64,
    /// Weighted sum, capped at 1.0 and rounded to 4 places.
    pub score: f64,
}

#[derive(Debug, Clone, Default)]
pub struct FrcScorer {
    criticality: CriticalityTable,
    weights: FrcWeights,
}

impl FrcScorer {
    pub fn new(criticality: CriticalityTable, weights: FrcWeights) -> Self {
        Self {
            criticality,
            weights,
        }
    }

    /// FRC score in [0, 1]. The change summary does not influence FRC; it is
    /// accepted so that every scorer shares one call shape.
    pub fn compute_frc(
        &self,
        testcase: &TestCase,
        _change_summary: &str,
        feedback: &[FeedbackEntry],
    ) -> f64 {
        self.breakdown(testcase, feedback).score
    }

    pub fn breakdown(&self, testcase: &TestCase, feedback: &[FeedbackEntry]) -> FrcBreakdown {
        let failure_history = failure_history_score(testcase.id, feedback);
        let criticality = self.criticality.lookup(testcase.component_or_empty());
        let fragility = selector_fragility(testcase.selector_or_empty());
        let flakiness = if testcase.flaky { 1.0 } else { 0.0 };

        let weighted = self.weights.failure_history * failure_history
            + self.weights.criticality * criticality
            + self.weights.fragility * fragility
            + self.weights.flakiness * flakiness;

        FrcBreakdown {
            failure_history,
            criticality,
            fragility,
            flakiness,
            score: round_to(weighted.min(1.0), 4),
        }
    }

    pub fn compute_frc_batch(
        &self,
        testcases: &[TestCase],
        change_summary: &str,
        feedback: &[FeedbackEntry],
    ) -> BTreeMap<TestId, f64> {
        testcases
            .iter()
            .map(|tc| (tc.id, self.compute_frc(tc, change_summary, feedback)))
            .collect()
    }
}

/// Failure-rate and recency blend in [0, 1]; 0 when the test has no history.
pub fn failure_history_score(test_id: TestId, feedback: &[FeedbackEntry]) -> f64 {
    let history = StatusHistory::for_test(test_id, feedback);
    if history.is_empty() {
        return 0.0;
    }

    let recency = recency_weighted_failures(history.recent(RECENCY_WINDOW));
    let score = FAILURE_RATE_SHARE * history.failure_rate()
        + RECENCY_SHARE * (recency / RECENCY_WINDOW as f64).min(1.0);
    score.min(1.0)
}

// The most recent run weighs 1, the one before 0.5, then 0.25, ...
fn recency_weighted_failures(window: &[TestStatus]) -> f64 {
    let len = window.len();
    window
        .iter()
        .enumerate()
        .filter(|(_, status)| **status == TestStatus::Fail)
        .map(|(i, _)| 0.5f64.powi((len - i - 1) as i32))
        .sum()
}

/// How likely a selector is to break under UI change, in [0, 1].
pub fn selector_fragility(selector: &str) -> f64 {
    if selector.is_empty() {
        return EMPTY_SELECTOR_FRAGILITY;
    }

    let fragility = if is_xpath(selector) {
        xpath_fragility(selector)
    } else {
        css_fragility(selector)
    };

    fragility.min(1.0)
}

fn is_xpath(selector: &str) -> bool {
    selector.starts_with("//") || selector.starts_with(".//") || selector.starts_with('/')
}

fn xpath_fragility(selector: &str) -> f64 {
    let mut fragility = 0.3;
    if XPATH_POSITION_PREDICATE.is_match(selector) {
        fragility += 0.4;
    }
    if selector.matches('[').count() > 1 {
        fragility += 0.2;
    }
    fragility
}

fn css_fragility(selector: &str) -> f64 {
    let nesting_depth = selector.matches(' ').count().max(selector.matches('>').count());
    let mut fragility = (nesting_depth as f64 * 0.05).min(0.2);

    if CSS_CONTAINS_MATCH.is_match(selector) {
        fragility += 0.15;
    }
    if CSS_PREFIX_MATCH.is_match(selector) {
        fragility += 0.1;
    }

    // ID selectors are the most robust
    if selector.starts_with('#') {
        fragility = (fragility - 0.2).max(0.0);
    }

    fragility
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_no_history_scores_zero() {
        assert_eq!(failure_history_score(1, &[]), 0.0);
        assert_eq!(failure_history_score(1, &[FeedbackEntry::fail(2)]), 0.0);
    }

    #[test]
    fn test_single_recent_failure() {
        // rate 1.0, recency 1.0 / 5
        let score = failure_history_score(1, &[FeedbackEntry::fail(1)]);
        assert!(approx(score, 0.7 + 0.3 * 0.2));
    }

    #[test]
    fn test_recency_decays_with_distance() {
        let old_failure = [
            FeedbackEntry::fail(1),
            FeedbackEntry::pass(1),
            FeedbackEntry::pass(1),
        ];
        let new_failure = [
            FeedbackEntry::pass(1),
            FeedbackEntry::pass(1),
            FeedbackEntry::fail(1),
        ];
        let old = failure_history_score(1, &old_failure);
        let new = failure_history_score(1, &new_failure);
        assert!(approx(old, 0.7 / 3.0 + 0.3 * 0.25 / 5.0));
        assert!(approx(new, 0.7 / 3.0 + 0.3 * 1.0 / 5.0));
        assert!(new > old);
    }

    #[test]
    fn test_recency_window_is_last_five() {
        let mut feedback = vec![FeedbackEntry::fail(1); 3];
        feedback.extend(vec![FeedbackEntry::pass(1); 5]);
        // rate 3/8, recency window holds only passes
        assert!(approx(failure_history_score(1, &feedback), 0.7 * 3.0 / 8.0));
    }

    #[test]
    fn test_all_failures_caps_at_one() {
        let feedback = vec![FeedbackEntry::fail(1); 10];
        let recency = 1.0 + 0.5 + 0.25 + 0.125 + 0.0625;
        let expected = 0.7 + 0.3 * recency / 5.0;
        assert!(approx(failure_history_score(1, &feedback), expected));
    }

    #[test]
    fn test_empty_selector_is_neutral() {
        assert_eq!(selector_fragility(""), 0.5);
    }

    #[test]
    fn test_xpath_with_position_predicate() {
        assert!(approx(selector_fragility("//div[2]"), 0.7));
        assert!(approx(selector_fragility("//ul/li[3]/a[1]"), 0.9));
        assert!(approx(selector_fragility("/html/body"), 0.3));
        assert!(approx(selector_fragility(".//input[@name='q'][@type='text']"), 0.5));
    }

    #[test]
    fn test_css_nesting_and_attribute_matches() {
        assert!(approx(selector_fragility(".btn"), 0.0));
        assert!(approx(selector_fragility("form > div > input"), 0.2));
        assert!(approx(selector_fragility("[class*='btn']"), 0.15));
        assert!(approx(selector_fragility("[id^='user']"), 0.1));
        assert!(approx(selector_fragility("div [data-x*='a'][data-y^='b']"), 0.3));
    }

    #[test]
    fn test_id_selector_discount_floors_at_zero() {
        assert_eq!(selector_fragility("#login-button"), 0.0);
        assert!(approx(selector_fragility("#cart [href*='item']"), 0.0));
        assert!(approx(selector_fragility("#main > div > ul > li > a [href*='x']"), 0.15));
    }

    #[test]
    fn test_compute_frc_combines_subscores() {
        let scorer = FrcScorer::default();
        let tc = TestCase::new(1, "Login works")
            .with_component("Login")
            .with_selector("#login")
            .with_flaky(true);
        let feedback = [FeedbackEntry::fail(1)];
        // 0.4 * 0.76 + 0.3 * 1.0 + 0.2 * 0.0 + 0.1 * 1.0
        assert_eq!(scorer.compute_frc(&tc, "", &feedback), 0.704);
    }

    #[test]
    fn test_compute_frc_missing_fields_use_defaults() {
        let scorer = FrcScorer::default();
        let tc = TestCase::new(3, "Bare");
        // 0.3 * 0.5 + 0.2 * 0.5
        assert_eq!(scorer.compute_frc(&tc, "anything", &[]), 0.25);
    }

    #[test]
    fn test_breakdown_reports_subscores() {
        let scorer = FrcScorer::default();
        let tc = TestCase::new(5, "Footer links")
            .with_component("Footer")
            .with_selector("//footer/a[2]");
        let breakdown = scorer.breakdown(&tc, &[]);
        assert_eq!(breakdown.failure_history, 0.0);
        assert_eq!(breakdown.criticality, 0.2);
        assert!(approx(breakdown.fragility, 0.7));
        assert_eq!(breakdown.flakiness, 0.0);
        assert_eq!(breakdown.score, 0.2);
    }

    #[test]
    fn test_repeated_calls_agree() {
        let scorer = FrcScorer::default();
        let tc = TestCase::new(3, "Cart badge")
            .with_component("Cart")
            .with_selector("div.cart > span:nth-child(2)")
            .with_flaky(true);
        let feedback = [
            FeedbackEntry::pass(3),
            FeedbackEntry::fail(3),
            FeedbackEntry::fail(3),
        ];
        let first = scorer.compute_frc(&tc, "Cart", &feedback);
        let second = scorer.compute_frc(&tc, "Cart", &feedback);
        assert_eq!(first, second);
        assert_eq!(scorer.breakdown(&tc, &feedback), scorer.breakdown(&tc, &feedback));
    }

    #[test]
    fn test_batch_is_keyed_by_id() {
        let scorer = FrcScorer::default();
        let tcs = vec![
            TestCase::new(1, "a").with_component("cart"),
            TestCase::new(2, "b").with_component("footer"),
        ];
        let scores = scorer.compute_frc_batch(&tcs, "", &[]);
        assert_eq!(scores.len(), 2);
        assert!(scores[&1] > scores[&2]);
    }
}
