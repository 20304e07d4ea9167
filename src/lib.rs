// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod formatting;
pub mod io;
pub mod priority;
pub mod scoring;
pub mod validation;

// Re-export commonly used types
pub use crate::core::{
    Error, FeedbackEntry, LastResult, Result, TestCase, TestId, TestStatus,
};

pub use crate::config::{load_config, PrioritizerConfig};

pub use crate::scoring::{FrcScorer, RiskScorer, ScoreCombiner, ScoredTest};

pub use crate::priority::{
    parse_advisory_list, AdvisoryProvider, Prioritization, Prioritizer, RankingEngine,
    StaticAdvisory,
};

pub use crate::validation::{
    extract_ground_truth, validate_dataset, ApfdValidator, BaselineOrderings, Strategy,
    ValidationReport,
};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
