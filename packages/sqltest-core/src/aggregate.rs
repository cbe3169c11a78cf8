//! Combines per-file results into one run.

use serde::Serialize;

use crate::model::TestResult;

/// All results of a run, in execution order across files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunResultSet {
    results: Vec<TestResult>,
}

impl RunResultSet {
    /// True when every result succeeded. An empty set succeeds.
    pub fn overall_success(&self) -> bool {
        self.results.iter().all(TestResult::succeeded)
    }

    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results.iter().filter(|r| !r.succeeded())
    }

    pub fn passed_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.passed_count()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn into_results(self) -> Vec<TestResult> {
        self.results
    }
}

/// Concatenates per-file result lists in the order the files ran.
pub fn aggregate<I>(per_file: I) -> RunResultSet
where
    I: IntoIterator<Item = Vec<TestResult>>,
{
    RunResultSet {
        results: per_file.into_iter().flatten().collect(),
    }
}
