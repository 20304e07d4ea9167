use super::{resolve_advisory, resolve_config, resolve_styler};
use crate::io::{self, output::OutputFormat};
use crate::priority::{AdvisoryProvider, Prioritizer};
use anyhow::{Context, Result};
use std::path::PathBuf;

pub struct RankConfig {
    pub testcases: PathBuf,
    pub change: String,
    pub feedback: PathBuf,
    pub advisory: Option<PathBuf>,
    pub no_frc: bool,
    pub no_parallel: bool,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

pub fn run_rank(config: RankConfig) -> Result<()> {
    let settings = resolve_config(config.config.as_deref())?;
    let testcases = io::load_testcases(&config.testcases)
        .with_context(|| format!("Failed to load test cases from {}", config.testcases.display()))?;
    let feedback = io::load_feedback(&config.feedback);
    let advisory = resolve_advisory(config.advisory.as_deref())?
        .advisory_order(&testcases, &config.change)?;

    log::info!(
        "Ranking {} tests with {} feedback entries",
        testcases.len(),
        feedback.len()
    );

    let mut prioritizer = Prioritizer::new(&settings);
    if config.no_frc {
        prioritizer = prioritizer.with_frc(false);
    }
    if config.no_parallel {
        prioritizer = prioritizer.with_parallel(false);
    }

    let prioritization = prioritizer
        .prioritize(&testcases, &config.change, &feedback, &advisory)
        .context("Failed to prioritize test cases")?;

    let mut writer = io::create_writer(config.format, resolve_styler(config.plain));
    writer.write_prioritization(&prioritization, &testcases)?;
    Ok(())
}
