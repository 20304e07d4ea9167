//! Legacy additive risk score.
//!
//! Each triggered rule adds (or subtracts) a fixed amount and appends a reason
//! phrase. The phrases and their order are part of the observable output:
//! reports and explanation consumers match on them verbatim.

use crate::core::{Error, FeedbackEntry, Result, TestCase, TestStatus};
use crate::scoring::history::StatusHistory;
use serde::{Deserialize, Serialize};

/// UI element kinds that users interact with directly.
pub const IMPORTANT_UI_ELEMENTS: [&str; 3] = ["textbox", "button", "dropdown"];

/// Tests slower than this many seconds are nudged down.
pub const SLOW_TEST_SECONDS: f64 = 4.0;

pub const NO_RISK_FACTORS: &str = "No major risk factors";

const RECENT_TREND_WINDOW: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskScore {
    pub value: i64,
    pub reasons: Vec<String>,
}

impl RiskScore {
    /// Reasons joined with ", ", or the fixed phrase when nothing triggered.
    pub fn reason(&self) -> String {
        if self.reasons.is_empty() {
            NO_RISK_FACTORS.to_string()
        } else {
            self.reasons.join(", ")
        }
    }

    fn add(&mut self, amount: i64, reason: impl Into<String>) {
        self.value = self.value.saturating_add(amount);
        self.reasons.push(reason.into());
    }
}

/// Risk label shown in the terminal priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

impl RiskLevel {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 8.0 => Self::High,
            s if s >= 4.0 => Self::Medium,
            _ => Self::Low,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

/// Borrowed view of the fields the risk rules require.
struct RequiredFields<'a> {
    component: &'a str,
    ui_element: &'a str,
    selector: &'a str,
    execution_time: f64,
}

impl<'a> RequiredFields<'a> {
    fn extract(testcase: &'a TestCase) -> Result<Self> {
        let missing = |field| Error::missing_field(testcase.id, field);
        Ok(Self {
            component: testcase.component.as_deref().ok_or_else(|| missing("component"))?,
            ui_element: testcase
                .ui_element
                .as_deref()
                .ok_or_else(|| missing("ui_element"))?,
            selector: testcase.selector.as_deref().ok_or_else(|| missing("selector"))?,
            execution_time: testcase.execution_time.ok_or_else(|| missing("execution_time"))?,
        })
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RiskScorer;

impl RiskScorer {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every rule against the test record.
    ///
    /// `component`, `ui_element`, `selector` and `execution_time` must be
    /// present; a missing one is reported as [`Error::MissingField`].
    pub fn compute_risk_score(
        &self,
        testcase: &TestCase,
        change_summary: &str,
        feedback: &[FeedbackEntry],
    ) -> Result<RiskScore> {
        let fields = RequiredFields::extract(testcase)?;
        let mut risk = RiskScore {
            value: 0,
            reasons: Vec::new(),
        };

        if change_summary
            .to_lowercase()
            .contains(&fields.component.to_lowercase())
        {
            risk.add(5, "Component changed");
        }

        if IMPORTANT_UI_ELEMENTS.contains(&fields.ui_element) {
            risk.add(2, "Important UI element");
        }

        if change_summary.contains(fields.selector) {
            risk.add(3, "Selector match");
        }

        apply_history_rules(&mut risk, &StatusHistory::for_test(testcase.id, feedback));

        if fields.execution_time > SLOW_TEST_SECONDS {
            risk.add(-1, "Slow test penalty");
        }

        log::trace!("risk score for test {}: {}", testcase.id, risk.value);
        Ok(risk)
    }
}

fn apply_history_rules(risk: &mut RiskScore, history: &StatusHistory) {
    let failures = history.failures();
    let passes = history.passes();

    if failures > 0 {
        let exponent = u32::try_from(failures).unwrap_or(u32::MAX);
        risk.add(
            2i64.saturating_pow(exponent),
            format!("{} historical failures", failures),
        );
    }

    if history.has_mixed_outcomes() {
        risk.add(3, "Flaky behavior detected");
    }

    if passes >= 3 && failures == 0 {
        risk.add(-2, "Consistently stable test");
    }

    let recent_failures = history
        .recent(RECENT_TREND_WINDOW)
        .iter()
        .filter(|s| **s == TestStatus::Fail)
        .count();
    if recent_failures >= 2 {
        risk.add(4, "Recent failure trend");
    }
}
