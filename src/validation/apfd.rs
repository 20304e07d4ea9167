//! Ordering quality metrics.
//!
//! All functions are pure over an ordering and the ground-truth failing set.
//! An empty failing set is a success sentinel, not an error: with nothing to
//! find, every ordering is perfect (APFD 1.0, detection 100%).

use crate::core::{round_to, TestId};
use std::collections::{BTreeMap, BTreeSet};

/// Average Percentage of Faults Detected over `order`.
///
/// ```text
/// APFD = 1 - sum(TF_i) / (n * m) + 1 / (2n)
/// ```
///
/// where `TF_i` is the 1-indexed rank of the i-th failing test, `n` the
/// ordering length and `m` the number of failing tests. Rounded to 4 places.
/// Failing ids absent from `order` contribute nothing to the rank sum.
///
/// # Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use testprio::validation::apfd::compute_apfd;
///
/// let failing: BTreeSet<u64> = [1, 2].into_iter().collect();
/// assert_eq!(compute_apfd(&[1, 2, 3, 4, 5], &failing), 0.8);
/// ```
pub fn compute_apfd(order: &[TestId], failing: &BTreeSet<TestId>) -> f64 {
    compute_apfd_with_total(order, failing, order.len())
}

/// APFD with an explicit batch size, for orderings that only cover part of
/// the batch.
pub fn compute_apfd_with_total(
    order: &[TestId],
    failing: &BTreeSet<TestId>,
    total_tests: usize,
) -> f64 {
    if failing.is_empty() || total_tests == 0 {
        return 1.0;
    }

    let n = total_tests as f64;
    let m = failing.len() as f64;
    let rank_sum: usize = order
        .iter()
        .enumerate()
        .filter(|(_, id)| failing.contains(*id))
        .map(|(index, _)| index + 1)
        .sum();

    round_to(1.0 - rank_sum as f64 / (n * m) + 1.0 / (2.0 * n), 4)
}

fn failures_in_prefix(order: &[TestId], failing: &BTreeSet<TestId>, k: usize) -> usize {
    order
        .iter()
        .take(k)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .filter(|id| failing.contains(*id))
        .count()
}

/// Percentage of the failing set found within the first `k` positions.
pub fn early_fault_detection_at(order: &[TestId], failing: &BTreeSet<TestId>, k: usize) -> f64 {
    if failing.is_empty() {
        return 100.0;
    }
    let found = failures_in_prefix(order, failing, k);
    round_to(found as f64 / failing.len() as f64 * 100.0, 2)
}

/// [`early_fault_detection_at`] for each k.
pub fn early_fault_detection(
    order: &[TestId],
    failing: &BTreeSet<TestId>,
    k_values: &[usize],
) -> BTreeMap<usize, f64> {
    k_values
        .iter()
        .map(|&k| (k, early_fault_detection_at(order, failing, k)))
        .collect()
}

/// Share of the first `k` positions occupied by failing tests, as a
/// percentage rounded to 2 places. `k == 0` yields 0.0.
pub fn precision_at_k(
    order: &[TestId],
    failing: &BTreeSet<TestId>,
    k_values: &[usize],
) -> BTreeMap<usize, f64> {
    k_values
        .iter()
        .map(|&k| {
            let precision = if k == 0 {
                0.0
            } else {
                let found = failures_in_prefix(order, failing, k);
                round_to(found as f64 / k as f64 * 100.0, 2)
            };
            (k, precision)
        })
        .collect()
}

/// Passing tests executed before the whole failing set has been seen.
///
/// When the ordering never covers every failing test, all passing tests in
/// it count as wasted.
pub fn wasted_effort(order: &[TestId], failing: &BTreeSet<TestId>) -> usize {
    if failing.is_empty() {
        return 0;
    }

    let mut wasted = 0;
    let mut found = 0;
    for id in order {
        if failing.contains(id) {
            found += 1;
        } else {
            wasted += 1;
        }
        if found == failing.len() {
            break;
        }
    }
    wasted
}
