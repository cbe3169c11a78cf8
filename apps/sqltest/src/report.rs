//! Text and JSON rendering of a finished run.

use std::fmt::Write as _;

use serde::Serialize;
use sqltest_core::{SuiteReport, TestResult};

use crate::cli::Format;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    success: bool,
    total: usize,
    passed: usize,
    failed: usize,
    results: &'a [TestResult],
    file_errors: Vec<JsonFileError>,
}

#[derive(Serialize)]
struct JsonFileError {
    path: String,
    error: String,
}

pub fn render(report: &SuiteReport, format: Format) -> anyhow::Result<String> {
    match format {
        Format::Text => Ok(render_text(report)),
        Format::Json => render_json(report),
    }
}

/// Failures first, then the summary line.
pub fn render_text(report: &SuiteReport) -> String {
    let mut out = String::new();

    for result in report.results.failures() {
        let _ = writeln!(
            out,
            "FAILED {}: {}",
            result.procedure(),
            result.failure_detail().unwrap_or_default()
        );
    }
    for failure in &report.file_failures {
        let path = failure.path.display();
        let _ = writeln!(out, "FAILED FILE {}: {}", path, failure.error);
    }

    let results = &report.results;
    if report.succeeded() {
        let passed = results.passed_count();
        let _ = writeln!(out, "Tests succeeded. ({} passed)", passed);
    } else {
        let _ = write!(
            out,
            "Some tests failed. ({} of {} failed",
            results.failed_count(),
            results.len()
        );
        if !report.file_failures.is_empty() {
            let _ = write!(out, ", {} file(s) not run", report.file_failures.len());
        }
        let _ = writeln!(out, ")");
    }
    out
}

pub fn render_json(report: &SuiteReport) -> anyhow::Result<String> {
    let results = &report.results;
    let json = JsonReport {
        success: report.succeeded(),
        total: results.len(),
        passed: results.passed_count(),
        failed: results.failed_count(),
        results: results.results(),
        file_errors: report
            .file_failures
            .iter()
            .map(|f| JsonFileError {
                path: f.path.display().to_string(),
                error: f.error.to_string(),
            })
            .collect(),
    };
    Ok(serde_json::to_string_pretty(&json)?)
}
