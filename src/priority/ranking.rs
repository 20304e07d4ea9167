//! Score ranking with advisory tie-breaks and critic correction.
//!
//! Ranking is a composition of two stable sorts:
//!
//! 1. **Score sort** - score descending, ties broken by position in the
//!    advisory order (ascending). Ids the advisory order does not mention
//!    share a sentinel rank after every mentioned id.
//! 2. **Critic correction** - tests whose component does not appear in the
//!    change description take a fixed penalty and sink below every related
//!    test. Tests sharing a penalty keep their stage-1 order.
//!
//! Because both sorts are stable, the effective precedence is
//! score → advisory position → penalty → input order.

use crate::core::{Error, Result, TestCase, TestId};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Advisory rank assigned to ids missing from the advisory order.
pub const ABSENT_ADVISORY_RANK: usize = 999;

/// Penalty the critic assigns to tests unrelated to the change.
pub const UNRELATED_PENALTY: i32 = -5;

pub struct RankingEngine<'a> {
    testcases: &'a [TestCase],
    by_id: HashMap<TestId, &'a TestCase>,
}

impl<'a> RankingEngine<'a> {
    /// Index the batch. Ids must be unique.
    pub fn new(testcases: &'a [TestCase]) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(testcases.len());
        for tc in testcases {
            if by_id.insert(tc.id, tc).is_some() {
                return Err(Error::DuplicateTestId(tc.id));
            }
        }
        Ok(Self { testcases, by_id })
    }

    /// Order every test in the batch by score, then advisory position.
    ///
    /// Tests without an entry in `scores` rank as 0.0.
    pub fn rank(&self, advisory_order: &[TestId], scores: &BTreeMap<TestId, f64>) -> Vec<TestId> {
        let positions = advisory_positions(advisory_order, &self.by_id);
        let sentinel = ABSENT_ADVISORY_RANK.max(advisory_order.len());

        let mut keyed: Vec<(TestId, f64, usize)> = self
            .testcases
            .iter()
            .map(|tc| {
                let score = scores.get(&tc.id).copied().unwrap_or_else(|| {
                    log::debug!("No score for test {}, ranking as 0.0", tc.id);
                    0.0
                });
                let position = positions.get(&tc.id).copied().unwrap_or(sentinel);
                (tc.id, score, position)
            })
            .collect();

        keyed.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then(a.2.cmp(&b.2))
        });

        keyed.into_iter().map(|(id, _, _)| id).collect()
    }

    /// Demote tests whose component is not mentioned in the change
    /// description. Matching is a case-insensitive substring test.
    pub fn critique(&self, ranked: &[TestId], change_summary: &str) -> Result<Vec<TestId>> {
        let change = change_summary.to_lowercase();

        let mut penalized = ranked
            .iter()
            .map(|id| {
                let tc = self.by_id.get(id).ok_or(Error::UnknownTestId(*id))?;
                Ok((*id, critic_penalty(tc, &change)))
            })
            .collect::<Result<Vec<_>>>()?;

        penalized.sort_by(|a, b| b.1.cmp(&a.1));
        Ok(penalized.into_iter().map(|(id, _)| id).collect())
    }

    /// [`Self::rank`] followed by [`Self::critique`].
    pub fn rank_and_correct(
        &self,
        advisory_order: &[TestId],
        scores: &BTreeMap<TestId, f64>,
        change_summary: &str,
    ) -> Result<Vec<TestId>> {
        let ranked = self.rank(advisory_order, scores);
        self.critique(&ranked, change_summary)
    }
}

// First occurrence wins; ids outside the batch are ignored
fn advisory_positions(
    advisory_order: &[TestId],
    known: &HashMap<TestId, &TestCase>,
) -> HashMap<TestId, usize> {
    let mut positions = HashMap::with_capacity(advisory_order.len());
    for (position, id) in advisory_order.iter().enumerate() {
        if !known.contains_key(id) {
            log::debug!("Ignoring unknown test id {} in advisory order", id);
            continue;
        }
        positions.entry(*id).or_insert(position);
    }
    positions
}

fn critic_penalty(testcase: &TestCase, change_lower: &str) -> i32 {
    if change_lower.contains(&testcase.component_or_empty().to_lowercase()) {
        0
    } else {
        UNRELATED_PENALTY
    }
}
