pub mod apfd;
pub mod baselines;
pub mod validator;

pub use apfd::{
    compute_apfd, compute_apfd_with_total, early_fault_detection, early_fault_detection_at,
    precision_at_k, wasted_effort,
};
pub use baselines::{BaselineOrderings, Strategy};
pub use validator::{ApfdValidator, EarlyFaultCounts, ValidationReport};

use crate::core::{Result, TestCase, TestId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub const NO_FAILING_TESTS: &str = "No failing tests";

/// Ids whose most recent run failed.
pub fn extract_ground_truth(testcases: &[TestCase]) -> BTreeSet<TestId> {
    testcases
        .iter()
        .filter(|tc| tc.has_failed_last())
        .map(|tc| tc.id)
        .collect()
}

/// Validation outcome for one named dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetValidation {
    pub dataset: String,
    pub total_tests: usize,
    pub failing_tests: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ValidationReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DatasetValidation {
    pub fn is_skipped(&self) -> bool {
        self.report.is_none()
    }
}

/// Results for every dataset validated in one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationRun {
    pub generated_at: DateTime<Utc>,
    pub datasets: Vec<DatasetValidation>,
}

impl ValidationRun {
    pub fn new(datasets: Vec<DatasetValidation>) -> Self {
        Self {
            generated_at: Utc::now(),
            datasets,
        }
    }

    /// Datasets that produced a report.
    pub fn validated(&self) -> impl Iterator<Item = &DatasetValidation> {
        self.datasets.iter().filter(|d| !d.is_skipped())
    }
}

/// Validate `agentic_order` against the failures recorded in the dataset.
///
/// A dataset without failures is skipped: there is nothing to detect, so
/// the result carries an error message instead of a report.
pub fn validate_dataset(
    dataset: &str,
    testcases: &[TestCase],
    agentic_order: &[TestId],
    seed: Option<u64>,
    k_values: Option<&[usize]>,
) -> Result<DatasetValidation> {
    let failing = extract_ground_truth(testcases);

    if failing.is_empty() {
        log::warn!("Dataset {} has no failing tests, skipping validation", dataset);
        return Ok(DatasetValidation {
            dataset: dataset.to_string(),
            total_tests: testcases.len(),
            failing_tests: 0,
            report: None,
            error: Some(NO_FAILING_TESTS.to_string()),
        });
    }

    let mut validator = ApfdValidator::new(testcases)?;
    if let Some(seed) = seed {
        validator = validator.with_seed(seed);
    }

    let report = match k_values {
        Some(ks) if !ks.is_empty() => validator.generate_report_with_k(agentic_order, &failing, ks),
        _ => validator.generate_report(agentic_order, &failing),
    };

    log::info!(
        "Dataset {}: {} tests, {} failing, APFD {:.4}",
        dataset,
        testcases.len(),
        failing.len(),
        report.agentic_apfd
    );

    Ok(DatasetValidation {
        dataset: dataset.to_string(),
        total_tests: testcases.len(),
        failing_tests: failing.len(),
        report: Some(report),
        error: None,
    })
}
