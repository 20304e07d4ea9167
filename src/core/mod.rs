//! Core data model shared by the scorers, the ranking engine and the validator.
//!
//! Test records and feedback entries are immutable for the duration of a
//! scoring pass. Feedback results arrive in two shapes (a bare status string or
//! an object carrying a `status` field); both are folded into [`TestStatus`] by
//! [`crate::io::loader`] before they reach any scorer.

pub mod errors;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use errors::{Error, Result, ResultExt};

/// Identifier of a test case. Unique within a batch.
pub type TestId = u64;

/// A GUI regression test case as produced by the extraction pipeline.
///
/// Fields the risk scorer depends on are optional here so that their absence
/// can be reported as a contract violation instead of being silently
/// defaulted at deserialization time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: TestId,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui_element: Option<String>,
    /// Seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<f64>,
    #[serde(default)]
    pub last_result: LastResult,
    #[serde(default)]
    pub flaky: bool,
}

impl TestCase {
    /// Minimal record, mostly useful for tests and fixtures.
    pub fn new(id: TestId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            component: None,
            selector: None,
            ui_element: None,
            execution_time: None,
            last_result: LastResult::Unknown,
            flaky: false,
        }
    }

    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.selector = Some(selector.into());
        self
    }

    pub fn with_ui_element(mut self, ui_element: impl Into<String>) -> Self {
        self.ui_element = Some(ui_element.into());
        self
    }

    pub fn with_execution_time(mut self, seconds: f64) -> Self {
        self.execution_time = Some(seconds);
        self
    }

    pub fn with_last_result(mut self, last_result: LastResult) -> Self {
        self.last_result = last_result;
        self
    }

    pub fn with_flaky(mut self, flaky: bool) -> Self {
        self.flaky = flaky;
        self
    }

    pub fn component_or_empty(&self) -> &str {
        self.component.as_deref().unwrap_or("")
    }

    pub fn selector_or_empty(&self) -> &str {
        self.selector.as_deref().unwrap_or("")
    }

    pub fn has_failed_last(&self) -> bool {
        self.last_result == LastResult::Fail
    }
}

/// Outcome of the most recent run recorded on the test case itself.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LastResult {
    Pass,
    Fail,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Normalized status of one historical run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestStatus {
    Pass,
    Fail,
    /// Malformed or unrecognized result; counts toward neither pass nor fail.
    Unknown,
}

impl TestStatus {
    /// Status strings are matched exactly; anything else is `Unknown`.
    pub fn from_status_str(status: &str) -> Self {
        match status {
            "pass" => Self::Pass,
            "fail" => Self::Fail,
            _ => Self::Unknown,
        }
    }

    /// Fold either result shape (`"fail"` or `{"status": "fail"}`) into a status.
    pub fn from_result_value(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(s) => Self::from_status_str(s),
            serde_json::Value::Object(map) => map
                .get("status")
                .and_then(serde_json::Value::as_str)
                .map(Self::from_status_str)
                .unwrap_or(Self::Unknown),
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded run of a test. Entries are kept oldest first; position in the
/// history sequence is the only recency signal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub test_id: TestId,
    #[serde(rename = "result")]
    pub status: TestStatus,
}

impl FeedbackEntry {
    pub fn new(test_id: TestId, status: TestStatus) -> Self {
        Self { test_id, status }
    }

    pub fn pass(test_id: TestId) -> Self {
        Self::new(test_id, TestStatus::Pass)
    }

    pub fn fail(test_id: TestId) -> Self {
        Self::new(test_id, TestStatus::Fail)
    }
}

/// Round to `places` decimal places; exact halves go to the even digit.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round_ties_even() / factor
}
