use super::{resolve_advisory, resolve_config, resolve_styler};
use crate::config::PrioritizerConfig;
use crate::core::{FeedbackEntry, TestCase, TestId};
use crate::io::{self, output::OutputFormat};
use crate::priority::{AdvisoryProvider, Prioritizer, StaticAdvisory};
use crate::validation::{validate_dataset, DatasetValidation, ValidationRun};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub struct ValidateConfig {
    pub datasets: Vec<PathBuf>,
    pub change: String,
    pub feedback: PathBuf,
    pub advisory: Option<PathBuf>,
    pub order: Option<PathBuf>,
    pub seed: Option<u64>,
    pub k_values: Option<Vec<usize>>,
    pub no_frc: bool,
    pub format: OutputFormat,
    pub config: Option<PathBuf>,
    pub plain: bool,
}

/// Inputs shared by every dataset in one run.
struct RunContext<'a> {
    prioritizer: Prioritizer,
    change: &'a str,
    feedback: Vec<FeedbackEntry>,
    advisory: StaticAdvisory,
    fixed_order: Option<Vec<TestId>>,
    seed: Option<u64>,
    k_values: Option<Vec<usize>>,
}

pub fn run_validate(config: ValidateConfig) -> Result<()> {
    let settings = resolve_config(config.config.as_deref())?;
    let context = build_context(&config, &settings)?;

    let results = config
        .datasets
        .iter()
        .map(|path| validate_file(path, &context))
        .collect::<Result<Vec<_>>>()?;
    let run = ValidationRun::new(results);

    if run.validated().count() == 0 {
        log::warn!("No dataset had failing tests; nothing was validated");
    }

    let mut writer = io::create_writer(config.format, resolve_styler(config.plain));
    writer.write_validation(&run)?;
    Ok(())
}

fn build_context<'a>(
    config: &'a ValidateConfig,
    settings: &PrioritizerConfig,
) -> Result<RunContext<'a>> {
    let mut prioritizer = Prioritizer::new(settings);
    if config.no_frc {
        prioritizer = prioritizer.with_frc(false);
    }

    // A fixed order uses the same id list format as advisory output
    let fixed_order = match &config.order {
        Some(path) => Some(
            io::load_advisory(path)
                .with_context(|| format!("Failed to load order from {}", path.display()))?,
        ),
        None => None,
    };

    Ok(RunContext {
        prioritizer,
        change: &config.change,
        feedback: io::load_feedback(&config.feedback),
        advisory: resolve_advisory(config.advisory.as_deref())?,
        fixed_order,
        seed: config.seed.or(settings.validation.seed),
        k_values: config
            .k_values
            .clone()
            .or_else(|| settings.validation.k_values.clone()),
    })
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn validate_file(path: &Path, context: &RunContext<'_>) -> Result<DatasetValidation> {
    let name = dataset_name(path);
    let testcases = io::load_testcases(path)
        .with_context(|| format!("Failed to load dataset {}", path.display()))?;
    log::info!("Loaded {} test cases from {}", testcases.len(), name);

    let order = match &context.fixed_order {
        Some(order) => order.clone(),
        None => agentic_order(&testcases, context),
    };

    validate_dataset(
        &name,
        &testcases,
        &order,
        context.seed,
        context.k_values.as_deref(),
    )
    .with_context(|| format!("Failed to validate dataset {}", name))
}

/// Rank the dataset; incomplete records fall back to batch order so the
/// remaining metrics can still be reported.
fn agentic_order(testcases: &[TestCase], context: &RunContext<'_>) -> Vec<TestId> {
    let advisory = match context.advisory.advisory_order(testcases, context.change) {
        Ok(order) => order,
        Err(e) => {
            log::warn!("Advisory order unavailable ({}), ranking without it", e);
            Vec::new()
        }
    };

    match context
        .prioritizer
        .prioritize(testcases, context.change, &context.feedback, &advisory)
    {
        Ok(prioritization) if !prioritization.is_empty() => prioritization.order,
        Ok(_) => testcases.iter().map(|tc| tc.id).collect(),
        Err(e) => {
            log::warn!("Prioritization failed ({}), using batch order", e);
            testcases.iter().map(|tc| tc.id).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_name_from_stem() {
        assert_eq!(dataset_name(Path::new("data/small_testcases.json")), "small_testcases");
        assert_eq!(dataset_name(Path::new("large")), "large");
    }
}
