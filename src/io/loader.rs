//! JSON loading for test batches, feedback history and advisory lists.
//!
//! This is the normalization boundary: both feedback result shapes are folded
//! into [`TestStatus`] here, so nothing downstream branches on JSON shape.

use crate::core::{Error, FeedbackEntry, Result, ResultExt, TestCase, TestId, TestStatus};
use crate::priority::advisory::parse_advisory_list;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;

/// Load a batch of test cases from a JSON list.
pub fn load_testcases(path: &Path) -> Result<Vec<TestCase>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read test cases", path, e))?;
    parse_testcases(&content).context(format!("Loading {}", path.display()))
}

pub fn parse_testcases(content: &str) -> Result<Vec<TestCase>> {
    let value: Value = serde_json::from_str(content)?;
    if !value.is_array() {
        return Err(Error::Validation(
            "expected a JSON list of test cases".to_string(),
        ));
    }
    let testcases: Vec<TestCase> = serde_json::from_value(value)?;
    log::debug!("Loaded {} test cases", testcases.len());
    Ok(testcases)
}

/// Load feedback history. A missing or unreadable file is an empty history.
pub fn load_feedback(path: &Path) -> Vec<FeedbackEntry> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No feedback file at {}", path.display());
            return Vec::new();
        }
        Err(e) => {
            log::warn!("Failed to read feedback file {}: {}", path.display(), e);
            return Vec::new();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(value) => parse_feedback_value(&value),
        Err(e) => {
            log::warn!("Ignoring malformed feedback file {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Accepts a top-level list of entries or an object with a `feedback` list.
/// Entries without a usable `test_id` are dropped; unrecognized results
/// become [`TestStatus::Unknown`].
pub fn parse_feedback_value(value: &Value) -> Vec<FeedbackEntry> {
    let Some(entries) = feedback_list(value) else {
        log::warn!("Feedback history has an unexpected shape, ignoring it");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let test_id = entry.get("test_id").and_then(parse_test_id)?;
            let status = entry
                .get("result")
                .map(TestStatus::from_result_value)
                .unwrap_or(TestStatus::Unknown);
            Some(FeedbackEntry::new(test_id, status))
        })
        .collect()
}

fn feedback_list(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(entries) => Some(entries),
        Value::Object(map) => map.get("feedback").and_then(Value::as_array),
        _ => None,
    }
}

fn parse_test_id(value: &Value) -> Option<TestId> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Append one run to the feedback file, keeping its existing shape. A
/// missing or malformed file is replaced by a fresh list.
pub fn append_feedback(path: &Path, entry: FeedbackEntry) -> Result<()> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str::<Value>(&content).unwrap_or_else(|e| {
            log::warn!("Replacing malformed feedback file {}: {}", path.display(), e);
            Value::Array(Vec::new())
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Value::Array(Vec::new()),
        Err(e) => return Err(Error::file_system("Failed to read feedback", path, e)),
    };

    let record = json!({ "test_id": entry.test_id, "result": entry.status.as_str() });
    let updated = match existing {
        Value::Array(mut entries) => {
            entries.push(record);
            Value::Array(entries)
        }
        Value::Object(mut map) if map.get("feedback").is_some_and(Value::is_array) => {
            if let Some(Value::Array(entries)) = map.get_mut("feedback") {
                entries.push(record);
            }
            Value::Object(map)
        }
        _ => Value::Array(vec![record]),
    };

    let content = serde_json::to_string_pretty(&updated)?;
    fs::write(path, content).map_err(|e| Error::file_system("Failed to write feedback", path, e))
}

/// Read raw advisory output and extract its id list.
pub fn load_advisory(path: &Path) -> Result<Vec<TestId>> {
    let content = fs::read_to_string(path)
        .map_err(|e| Error::file_system("Failed to read advisory list", path, e))?;
    Ok(parse_advisory_list(&content))
}
