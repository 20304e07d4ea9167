//! Benchmarks for batch scoring and validation.
//!
//! Compares parallel and sequential scoring across batch sizes and measures
//! a full validation report, which regenerates all six baselines.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use testprio::core::{FeedbackEntry, LastResult, TestCase, TestId};
use testprio::priority::Prioritizer;
use testprio::validation::{extract_ground_truth, ApfdValidator};

const COMPONENTS: [&str; 6] = ["Login", "Cart", "Checkout", "Search", "Footer", "Profile"];

fn create_batch(size: usize) -> Vec<TestCase> {
    (0..size)
        .map(|i| {
            let component = COMPONENTS[i % COMPONENTS.len()];
            let last_result = if i % 11 == 0 {
                LastResult::Fail
            } else {
                LastResult::Pass
            };
            TestCase::new(i as TestId, format!("{} case {}", component, i))
                .with_component(component)
                .with_ui_element(if i % 2 == 0 { "button" } else { "link" })
                .with_selector(format!("div.{} > ul li:nth-child({})", component, i % 5))
                .with_execution_time((i % 9) as f64 * 0.75)
                .with_last_result(last_result)
                .with_flaky(i % 13 == 0)
        })
        .collect()
}

fn create_feedback(size: usize) -> Vec<FeedbackEntry> {
    (0..size * 3)
        .map(|i| {
            let id = (i % size) as TestId;
            if i % 4 == 0 {
                FeedbackEntry::fail(id)
            } else {
                FeedbackEntry::pass(id)
            }
        })
        .collect()
}

fn bench_prioritize(c: &mut Criterion) {
    let mut group = c.benchmark_group("prioritize");
    let change = "Checkout flow and login form redesign";

    for size in [50, 500, 2000] {
        let batch = create_batch(size);
        let feedback = create_feedback(size);

        group.bench_with_input(BenchmarkId::new("parallel", size), &size, |b, _| {
            let prioritizer = Prioritizer::default().with_parallel(true);
            b.iter(|| {
                black_box(prioritizer.prioritize(
                    black_box(&batch),
                    change,
                    &feedback,
                    &[],
                ))
            });
        });

        group.bench_with_input(BenchmarkId::new("sequential", size), &size, |b, _| {
            let prioritizer = Prioritizer::default().with_parallel(false);
            b.iter(|| {
                black_box(prioritizer.prioritize(
                    black_box(&batch),
                    change,
                    &feedback,
                    &[],
                ))
            });
        });
    }

    group.finish();
}

fn bench_validation_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation_report");

    for size in [100, 1000] {
        let batch = create_batch(size);
        let failing = extract_ground_truth(&batch);
        let order: Vec<TestId> = batch.iter().rev().map(|tc| tc.id).collect();
        let validator = ApfdValidator::new(&batch)
            .map(|v| v.with_seed(42))
            .unwrap();

        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.iter(|| black_box(validator.generate_report(black_box(&order), &failing)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_prioritize, bench_validation_report);
criterion_main!(benches);
