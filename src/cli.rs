use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "testprio")]
#[command(about = "Risk-based GUI regression test prioritization", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rank a batch of test cases for a change
    Rank {
        /// JSON file with the test case list
        testcases: PathBuf,

        /// Description of the code change
        #[arg(short, long)]
        change: String,

        /// Feedback history file
        #[arg(long, default_value = "memory.json")]
        feedback: PathBuf,

        /// File holding the advisory priority list, e.g. `[3, 1, 2]`
        #[arg(long)]
        advisory: Option<PathBuf>,

        /// Use the legacy risk score instead of the combined score
        #[arg(long = "no-frc")]
        no_frc: bool,

        /// Score tests on a single thread
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Measure ranking quality on datasets with recorded failures
    Validate {
        /// JSON test case files; each file is one dataset named after its stem
        #[arg(required = true)]
        datasets: Vec<PathBuf>,

        /// Change description used to rank each dataset
        #[arg(short, long, default_value = "Generic code change for validation.")]
        change: String,

        /// Feedback history file
        #[arg(long, default_value = "memory.json")]
        feedback: PathBuf,

        /// File holding the advisory priority list
        #[arg(long)]
        advisory: Option<PathBuf>,

        /// Validate this fixed order instead of ranking each dataset
        #[arg(long)]
        order: Option<PathBuf>,

        /// Seed for the randomized baselines
        #[arg(long, env = "TESTPRIO_SEED")]
        seed: Option<u64>,

        /// Positions for early fault detection and precision (comma-separated)
        #[arg(short = 'k', long = "k-values", value_delimiter = ',')]
        k_values: Option<Vec<usize>>,

        /// Use the legacy risk score instead of the combined score
        #[arg(long = "no-frc")]
        no_frc: bool,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Disable colored output
        #[arg(long)]
        plain: bool,
    },

    /// Record the outcome of a test run in the feedback history
    Record {
        /// Test id
        test_id: u64,

        /// Outcome of the run
        #[arg(value_enum)]
        result: RunResult,

        /// Feedback history file
        #[arg(long, default_value = "memory.json")]
        feedback: PathBuf,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

impl From<OutputFormat> for crate::io::output::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Json => crate::io::output::OutputFormat::Json,
            OutputFormat::Markdown => crate::io::output::OutputFormat::Markdown,
            OutputFormat::Terminal => crate::io::output::OutputFormat::Terminal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunResult {
    Pass,
    Fail,
}

impl From<RunResult> for crate::core::TestStatus {
    fn from(result: RunResult) -> Self {
        match result {
            RunResult::Pass => crate::core::TestStatus::Pass,
            RunResult::Fail => crate::core::TestStatus::Fail,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_validate_with_k_values() {
        let cli = Cli::parse_from([
            "testprio", "-vv", "validate", "small.json", "large.json", "--seed", "7", "-k", "1,5",
        ]);
        assert_eq!(cli.verbosity, 2);
        match cli.command {
            Commands::Validate {
                datasets,
                seed,
                k_values,
                ..
            } => {
                assert_eq!(datasets.len(), 2);
                assert_eq!(seed, Some(7));
                assert_eq!(k_values, Some(vec![1, 5]));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_record() {
        let cli = Cli::parse_from(["testprio", "record", "4", "fail"]);
        match cli.command {
            Commands::Record {
                test_id, result, ..
            } => {
                assert_eq!(test_id, 4);
                assert_eq!(result, RunResult::Fail);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
