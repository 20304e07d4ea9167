use pretty_assertions::assert_eq;
use std::collections::BTreeSet;
use testprio::core::{LastResult, TestCase, TestId};
use testprio::validation::{
    compute_apfd, extract_ground_truth, validate_dataset, wasted_effort, ApfdValidator, Strategy,
    ValidationRun, NO_FAILING_TESTS,
};

fn dataset(failing: &[TestId]) -> Vec<TestCase> {
    (1..=10)
        .map(|id| {
            let last_result = if failing.contains(&id) {
                LastResult::Fail
            } else {
                LastResult::Pass
            };
            TestCase::new(id, format!("test {}", id))
                .with_component("Cart")
                .with_ui_element("button")
                .with_selector(format!("#t{}", id))
                .with_execution_time(1.0 + (id % 3) as f64)
                .with_last_result(last_result)
        })
        .collect()
}

#[test]
fn test_literal_metric_examples() {
    let failing: BTreeSet<TestId> = [1, 2].into_iter().collect();
    assert_eq!(compute_apfd(&[1, 2, 3, 4, 5], &failing), 0.8);

    let failing: BTreeSet<TestId> = [3].into_iter().collect();
    assert_eq!(wasted_effort(&[1, 2, 3], &failing), 2);

    let tests = vec![
        TestCase::new(1, "a").with_execution_time(1.0),
        TestCase::new(2, "b").with_execution_time(2.0),
        TestCase::new(3, "c").with_execution_time(3.0),
    ];
    let validator = ApfdValidator::new(&tests).unwrap();
    let failing: BTreeSet<TestId> = [1].into_iter().collect();
    assert_eq!(validator.time_saved(&[1, 2, 3], &[2, 3, 1], &failing), 5.0);
}

#[test]
fn test_report_for_ideal_ordering() {
    let tests = dataset(&[9, 10]);
    let order: Vec<TestId> = vec![9, 10, 1, 2, 3, 4, 5, 6, 7, 8];

    let result = validate_dataset("cart", &tests, &order, Some(7), None).unwrap();
    let report = result.report.unwrap();

    assert_eq!(result.total_tests, 10);
    assert_eq!(result.failing_tests, 2);
    assert_eq!(report.agentic_apfd, 0.9);
    assert_eq!(report.wasted_effort, 0);
    assert_eq!(report.apfd_scores.len(), 1 + Strategy::ALL.len());
    assert_eq!(
        report.precision_at_k.keys().copied().collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
    assert_eq!(report.precision_at_k[&3], 66.67);
    assert_eq!(report.early_fault_detection[&1], 50.0);
    assert_eq!(report.early_fault_detection[&2], 100.0);
    assert_eq!(report.failing_tests_found_earlier_top_20_percent.agentic, 2);
    assert!(report.agentic_apfd >= report.random_apfd);
}

#[test]
fn test_seeded_reports_are_reproducible() {
    let tests = dataset(&[2, 5, 8]);
    let order: Vec<TestId> = (1..=10).rev().collect();

    let first = validate_dataset("d", &tests, &order, Some(1234), Some(&[2, 4][..])).unwrap();
    let second = validate_dataset("d", &tests, &order, Some(1234), Some(&[2, 4][..])).unwrap();

    let first = first.report.unwrap();
    let second = second.report.unwrap();
    assert_eq!(first.apfd_scores, second.apfd_scores);
    assert_eq!(first.time_saved, second.time_saved);
    assert_eq!(first.lift_factor, second.lift_factor);
    assert_eq!(
        first.early_fault_detection.keys().copied().collect::<Vec<_>>(),
        vec![2, 4]
    );
}

#[test]
fn test_deterministic_baselines_ignore_seed() {
    let tests = dataset(&[4]);
    let validator = ApfdValidator::new(&tests).unwrap();
    let a = validator.clone().with_seed(1).generate_baseline_orderings();
    let b = validator.with_seed(2).generate_baseline_orderings();

    assert_eq!(a.get(Strategy::Fifo), b.get(Strategy::Fifo));
    assert_eq!(a.get(Strategy::Reverse), b.get(Strategy::Reverse));
    assert_eq!(a.get(Strategy::RiskBased), b.get(Strategy::RiskBased));
    assert_eq!(a.get(Strategy::Fifo), &(1..=10).collect::<Vec<TestId>>()[..]);
}

#[test]
fn test_dataset_without_failures_is_skipped() {
    let tests = dataset(&[]);
    assert!(extract_ground_truth(&tests).is_empty());

    let order: Vec<TestId> = (1..=10).collect();
    let result = validate_dataset("green", &tests, &order, Some(3), None).unwrap();
    assert!(result.is_skipped());
    assert_eq!(result.error.as_deref(), Some(NO_FAILING_TESTS));

    let run = ValidationRun::new(vec![result]);
    assert_eq!(run.validated().count(), 0);
    let json = serde_json::to_value(&run).unwrap();
    assert!(json["datasets"][0].get("report").is_none());
}
