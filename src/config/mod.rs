//! Configuration for scoring, ranking and validation.
//!
//! Configuration is read from `.testprio.toml`, searched for in the current
//! directory and up to nine of its ancestors. Every section is optional.

mod core;
pub mod criticality;
mod loader;
mod scoring;

pub use core::{PrioritizerConfig, ScoringSettings, ValidationSettings};
pub use criticality::{CriticalityEntry, CriticalityTable, DEFAULT_CRITICALITY};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from,
    parse_and_validate_config, CONFIG_FILE_NAME,
};
pub use scoring::{default_advisory_weight, FrcWeights, ScoringWeights};

/// Default contents written by `testprio init`
pub const DEFAULT_CONFIG_TOML: &str = r#"# testprio configuration

[scoring]
# Blend risk, FRC and the advisory signal; false keeps the legacy risk score
use_frc = true
# Advisory value used when no external signal is supplied
advisory_weight = 0.5
parallel = true

[scoring.weights]
risk = 0.4
frc = 0.4
advisory = 0.2

[frc]
failure_history = 0.4
criticality = 0.3
fragility = 0.2
flakiness = 0.1

[criticality]
default_weight = 0.5

# Entries are matched in order; the first substring match wins.
[[criticality.entries]]
fragment = "login"
weight = 1.0

[[criticality.entries]]
fragment = "checkout"
weight = 0.95

[[criticality.entries]]
fragment = "cart"
weight = 0.9

[validation]
# seed = 42
"#;
