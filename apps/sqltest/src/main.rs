//! Command-line runner for stored-procedure integration tests.
//!
//! Loads test files, runs every listed procedure against the database named
//! in each file and reports whether all of them returned 0.

mod cli;
mod report;

use std::fs;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use sqltest_core::loader::discover_test_files;
use sqltest_core::postgres::PostgresConnector;
use sqltest_core::{run_suite, TracingObserver};
use tracing::Level;

use crate::cli::{Cli, Commands, RunArgs};

/// Some tests or files failed.
const EXIT_TESTS_FAILED: u8 = 1;
/// The run could not be set up or reported.
const EXIT_USAGE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so a report on stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(log_level(&cli))
        .with_target(false)
        .init();

    let outcome = match &cli.command {
        Commands::Run(args) => run(args),
    };

    if let Err(e) = &outcome {
        tracing::error!("{:#}", e);
    }
    ExitCode::from(exit_status(&outcome))
}

/// Process exit status for the outcome of a command.
fn exit_status(outcome: &anyhow::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => EXIT_TESTS_FAILED,
        Err(_) => EXIT_USAGE,
    }
}

fn log_level(cli: &Cli) -> Level {
    if cli.quiet {
        return Level::ERROR;
    }
    match cli.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Runs all test files, returns whether the whole run succeeded.
fn run(args: &RunArgs) -> anyhow::Result<bool> {
    let paths = discover_test_files(&args.paths).context("Failed to collect test files")?;
    if paths.is_empty() {
        anyhow::bail!("No test files found");
    }

    let config = args.runner_config();
    let connector = PostgresConnector::from_config(&config);
    let suite = run_suite(&connector, &paths, &config, &mut TracingObserver);

    let rendered = report::render(&suite, args.format)?;
    match &args.output {
        Some(path) => {
            let message = format!("Failed to write report to {}", path.display());
            fs::write(path, rendered).context(message)?;
        }
        None => print!("{}", rendered),
    }

    Ok(suite.succeeded())
}
