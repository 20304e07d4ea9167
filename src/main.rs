use anyhow::Result;
use clap::Parser;
use testprio::cli::{Cli, Commands};
use testprio::commands::{self, RankConfig, ValidateConfig};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match cli.command {
        Commands::Rank {
            testcases,
            change,
            feedback,
            advisory,
            no_frc,
            no_parallel,
            format,
            config,
            plain,
        } => commands::run_rank(RankConfig {
            testcases,
            change,
            feedback,
            advisory,
            no_frc,
            no_parallel,
            format: format.into(),
            config,
            plain,
        }),
        Commands::Validate {
            datasets,
            change,
            feedback,
            advisory,
            order,
            seed,
            k_values,
            no_frc,
            format,
            config,
            plain,
        } => commands::run_validate(ValidateConfig {
            datasets,
            change,
            feedback,
            advisory,
            order,
            seed,
            k_values,
            no_frc,
            format: format.into(),
            config,
            plain,
        }),
        Commands::Record {
            test_id,
            result,
            feedback,
        } => commands::record_result(&feedback, test_id, result.into()),
        Commands::Init { force } => commands::init_config(force),
    }
}

// RUST_LOG takes precedence over -v
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}
