//! CLI command implementations.
//!
//! Available commands:
//! - **rank**: score and order a test batch for a change
//! - **validate**: measure ranking quality against recorded failures
//! - **record**: append a run outcome to the feedback history
//! - **init**: write a default `.testprio.toml`

pub mod init;
pub mod rank;
pub mod record;
pub mod validate;

pub use init::init_config;
pub use rank::{run_rank, RankConfig};
pub use record::record_result;
pub use validate::{run_validate, ValidateConfig};

use crate::config::{self, PrioritizerConfig};
use crate::formatting::{FormattingConfig, Styler};
use crate::io;
use crate::priority::StaticAdvisory;
use anyhow::{Context, Result};
use std::path::Path;

/// Explicit config file, or the nearest `.testprio.toml`.
fn resolve_config(path: Option<&Path>) -> Result<PrioritizerConfig> {
    match path {
        Some(path) => config::load_config_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(config::load_config()),
    }
}

fn resolve_styler(plain: bool) -> Styler {
    if plain {
        Styler::new(FormattingConfig::plain())
    } else {
        Styler::new(FormattingConfig::from_env())
    }
}

/// Advisory list read from a file; without one every batch gets no advice.
fn resolve_advisory(path: Option<&Path>) -> Result<StaticAdvisory> {
    match path {
        Some(path) => io::load_advisory(path)
            .map(StaticAdvisory::new)
            .with_context(|| format!("Failed to load advisory list from {}", path.display())),
        None => Ok(StaticAdvisory::default()),
    }
}
