//! Runs a list of test files one after another.

use std::path::{Path, PathBuf};

use crate::aggregate::{aggregate, RunResultSet};
use crate::config::{RunOptions, RunnerConfig};
use crate::connection::Connector;
use crate::engine;
use crate::error::{Result, SqlTestError};
use crate::loader::load_test_file;
use crate::model::TestResult;
use crate::observer::ProgressObserver;

/// A file that produced no results because it failed to load or connect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: SqlTestError,
}

/// Outcome of a whole run over several files.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuiteReport {
    pub results: RunResultSet,
    pub file_failures: Vec<FileFailure>,
}

impl SuiteReport {
    /// True only if every test passed and no file failed.
    pub fn succeeded(&self) -> bool {
        self.results.overall_success() && self.file_failures.is_empty()
    }
}

/// Loads and runs each file in order, each over its own connection.
///
/// A file's connection is closed before the next file's is opened. File
/// level failures are collected; with `continue_after_file_error` unset the
/// run stops at the first one.
pub fn run_suite(
    connector: &dyn Connector,
    paths: &[PathBuf],
    config: &RunnerConfig,
    observer: &mut dyn ProgressObserver,
) -> SuiteReport {
    let options = config.run_options();
    let mut per_file = Vec::with_capacity(paths.len());
    let mut file_failures = Vec::new();

    for path in paths {
        match run_file(connector, path, &options, observer) {
            Ok(results) => per_file.push(results),
            Err(error) => {
                tracing::error!("{}", error);
                file_failures.push(FileFailure {
                    path: path.clone(),
                    error,
                });
                if !config.continue_after_file_error {
                    tracing::warn!("Stopping after file failure, remaining files skipped");
                    break;
                }
            }
        }
    }

    SuiteReport {
        results: aggregate(per_file),
        file_failures,
    }
}

fn run_file(
    connector: &dyn Connector,
    path: &Path,
    options: &RunOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<TestResult>> {
    let file = load_test_file(path)?;
    observer.file_started(path, file.tests.len());
    engine::run(connector, &file, options, observer)
}
