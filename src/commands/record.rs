use crate::core::{FeedbackEntry, TestId, TestStatus};
use crate::io;
use anyhow::{Context, Result};
use std::path::Path;

pub fn record_result(feedback: &Path, test_id: TestId, status: TestStatus) -> Result<()> {
    io::append_feedback(feedback, FeedbackEntry::new(test_id, status))
        .with_context(|| format!("Failed to record result in {}", feedback.display()))?;
    log::info!("Recorded {} for test {}", status, test_id);
    Ok(())
}
