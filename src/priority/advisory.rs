//! Advisory priority lists produced outside the core.
//!
//! The producer (typically a language-model service) answers with free text
//! that should contain a list of test ids such as `[3, 1, 2]`. Parsing is
//! tolerant: code fences and surrounding whitespace are stripped, quoted
//! digit strings are accepted, other items are dropped. Text that is not a
//! list at all yields an empty advisory order, which the ranking engine
//! treats as "no opinion".

use crate::core::{Result, TestCase, TestId};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static CODE_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)^```[A-Za-z]*\s*(.*?)\s*```$").unwrap());

/// Source of an advisory ordering for a batch.
pub trait AdvisoryProvider {
    fn advisory_order(&self, testcases: &[TestCase], change_summary: &str) -> Result<Vec<TestId>>;
}

/// Serves the same advisory list for every batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticAdvisory {
    order: Vec<TestId>,
}

impl StaticAdvisory {
    pub fn new(order: Vec<TestId>) -> Self {
        Self { order }
    }

    /// Build from raw producer output; see [`parse_advisory_list`].
    pub fn from_text(text: &str) -> Self {
        Self::new(parse_advisory_list(text))
    }

    pub fn order(&self) -> &[TestId] {
        &self.order
    }
}

impl AdvisoryProvider for StaticAdvisory {
    fn advisory_order(&self, _testcases: &[TestCase], _change_summary: &str) -> Result<Vec<TestId>> {
        Ok(self.order.clone())
    }
}

/// Extract an ordered id list from raw advisory text.
///
/// # Examples
///
/// ```
/// use testprio::priority::advisory::parse_advisory_list;
///
/// assert_eq!(parse_advisory_list("[3, 1, \"2\"]"), vec![3, 1, 2]);
/// assert_eq!(parse_advisory_list("I cannot rank these."), Vec::<u64>::new());
/// ```
pub fn parse_advisory_list(text: &str) -> Vec<TestId> {
    let trimmed = text.trim();
    let body = CODE_FENCE
        .captures(trimmed)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(trimmed);

    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(items)) => items.iter().filter_map(advisory_item).collect(),
        Ok(_) => {
            log::warn!("Advisory output is not a list, ignoring it");
            Vec::new()
        }
        Err(e) => {
            log::warn!("Could not parse advisory output: {}", e);
            Vec::new()
        }
    }
}

fn advisory_item(item: &Value) -> Option<TestId> {
    match item {
        Value::Number(n) => n.as_u64(),
        Value::String(s) if !s.is_empty() && s.chars().all(|c| c.is_ascii_digit()) => {
            s.parse().ok()
        }
        _ => None,
    }
}
