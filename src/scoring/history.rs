//! Per-test run history extracted from the feedback log.

use crate::core::{FeedbackEntry, TestId, TestStatus};

/// Chronological statuses (oldest first) recorded for a single test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusHistory {
    statuses: Vec<TestStatus>,
}

impl StatusHistory {
    pub fn for_test(test_id: TestId, feedback: &[FeedbackEntry]) -> Self {
        Self {
            statuses: feedback
                .iter()
                .filter(|entry| entry.test_id == test_id)
                .map(|entry| entry.status)
                .collect(),
        }
    }

    pub fn statuses(&self) -> &[TestStatus] {
        &self.statuses
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn failures(&self) -> usize {
        self.count(TestStatus::Fail)
    }

    pub fn passes(&self) -> usize {
        self.count(TestStatus::Pass)
    }

    fn count(&self, status: TestStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }

    /// The last `n` runs, oldest first.
    pub fn recent(&self, n: usize) -> &[TestStatus] {
        let start = self.statuses.len().saturating_sub(n);
        &self.statuses[start..]
    }

    /// Failures over all recorded runs, unknown runs included in the total.
    pub fn failure_rate(&self) -> f64 {
        if self.statuses.is_empty() {
            0.0
        } else {
            self.failures() as f64 / self.statuses.len() as f64
        }
    }

    /// Both a pass and a fail appear somewhere in the history.
    pub fn has_mixed_outcomes(&self) -> bool {
        self.failures() > 0 && self.passes() > 0
    }
}
