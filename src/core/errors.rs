//! Shared error types for the library

use super::TestId;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for prioritization and validation operations
#[derive(Debug, Error)]
pub enum Error {
    /// A field the legacy risk scorer requires is absent from a test record
    #[error("Test {test_id} is missing required field `{field}`")]
    MissingField { test_id: TestId, field: &'static str },

    /// Two records in one batch share an id
    #[error("Duplicate test id {0} in batch")]
    DuplicateTestId(TestId),

    /// An ordering references an id that is not part of the batch
    #[error("Unknown test id {0}")]
    UnknownTestId(TestId),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Generic errors with context
    #[error("{context}: {message}")]
    WithContext { context: String, message: String },

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// TOML errors
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

impl Error {
    pub fn missing_field(test_id: TestId, field: &'static str) -> Self {
        Self::MissingField { test_id, field }
    }

    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            message: self.to_string(),
        }
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_message() {
        let err = Error::missing_field(7, "selector");
        assert_eq!(err.to_string(), "Test 7 is missing required field `selector`");
    }

    #[test]
    fn test_with_context_wraps_message() {
        let result: Result<()> = Err(Error::Validation("empty order".into()));
        let err = result.context("Scoring batch").unwrap_err();
        assert_eq!(err.to_string(), "Scoring batch: Validation error: empty order");
    }
}
