//! Test file definitions and per-test results.

use serde::{Deserialize, Serialize};

/// One test file: where to connect and which procedures to call, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestFileDefinition {
    #[serde(rename = "connectionString", alias = "ConnectionString")]
    pub connection_string: String,
    #[serde(default, alias = "Tests")]
    pub tests: Vec<TestCaseDefinition>,
}

/// A single stored-procedure invocation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TestCaseDefinition {
    /// Unqualified procedure name
    #[serde(rename = "proc", alias = "Proc", alias = "procedure")]
    pub procedure: String,
}

impl TestCaseDefinition {
    pub fn new(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
        }
    }

    /// Name to execute under `schema`. The stored name is left untouched.
    pub fn qualified_name(&self, schema: &str) -> String {
        crate::engine::qualify_name(schema, &self.procedure)
    }
}

/// Outcome of a single procedure call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestOutcome {
    /// Call completed and returned 0
    Passed,
    /// Call raised an error or returned a non-zero code
    Failed { detail: String },
}

impl TestOutcome {
    /// Classifies a return code: 0 passes, anything else fails.
    pub fn from_return_code(code: i32) -> Self {
        if code == 0 {
            TestOutcome::Passed
        } else {
            TestOutcome::Failed {
                detail: format!("non-zero return code: {}", code),
            }
        }
    }

    pub fn is_passed(&self) -> bool {
        matches!(self, TestOutcome::Passed)
    }
}

/// Recorded result of one executed test case.
///
/// `failure_detail` is present exactly when the test did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    procedure: String,
    succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    failure_detail: Option<String>,
}

impl TestResult {
    pub fn passed(procedure: impl Into<String>) -> Self {
        Self {
            procedure: procedure.into(),
            succeeded: true,
            failure_detail: None,
        }
    }

    /// Creates a failed result. An empty detail is replaced by a generic one.
    pub fn failed(procedure: impl Into<String>, detail: impl Into<String>) -> Self {
        let mut detail = detail.into();
        if detail.trim().is_empty() {
            detail = "test failed without an error message".to_string();
        }
        Self {
            procedure: procedure.into(),
            succeeded: false,
            failure_detail: Some(detail),
        }
    }

    pub fn from_outcome(procedure: impl Into<String>, outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Passed => Self::passed(procedure),
            TestOutcome::Failed { detail } => Self::failed(procedure, detail),
        }
    }

    /// Qualified name that was executed.
    pub fn procedure(&self) -> &str {
        &self.procedure
    }

    pub fn succeeded(&self) -> bool {
        self.succeeded
    }

    pub fn failure_detail(&self) -> Option<&str> {
        self.failure_detail.as_deref()
    }
}
