//! Sequential execution of the test cases of one file.
//!
//! Every test case yields exactly one [`TestResult`], in file order. Errors
//! from a single call are recorded as failures and never stop the loop; only
//! an unusable connection makes [`execute`] itself fail.

use crate::config::RunOptions;
use crate::connection::{acquire, Connection, ConnectionSettings, Connector};
use crate::error::{Result, SqlTestError};
use crate::model::{TestFileDefinition, TestOutcome, TestResult};
use crate::observer::ProgressObserver;

/// Prefixes `procedure` with `schema` and a dot, unless `schema` is empty.
pub fn qualify_name(schema: &str, procedure: &str) -> String {
    if schema.is_empty() {
        procedure.to_string()
    } else {
        format!("{}.{}", schema, procedure)
    }
}

/// Calls one procedure and classifies the outcome.
///
/// A data-access error and a non-zero return code both become
/// [`TestOutcome::Failed`].
pub fn run_test_case(connection: &mut dyn Connection, qualified_name: &str) -> TestOutcome {
    match connection.call_procedure(qualified_name) {
        Ok(code) => {
            tracing::debug!("{} returned {}", qualified_name, code);
            TestOutcome::from_return_code(code)
        }
        Err(e) => TestOutcome::Failed {
            detail: e.to_string(),
        },
    }
}

/// Runs every test case of `file` over `connection`, in order.
///
/// # Errors
/// Returns [`SqlTestError::ConnectionClosed`] if the connection is closed
/// before the first test. Per-test failures never produce an error.
pub fn execute(
    connection: &mut dyn Connection,
    file: &TestFileDefinition,
    schema: &str,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<TestResult>> {
    if connection.is_closed() {
        return Err(SqlTestError::ConnectionClosed);
    }

    let total = file.tests.len();
    let mut results = Vec::with_capacity(total);

    for (i, test) in file.tests.iter().enumerate() {
        let index = i + 1;
        let qualified_name = test.qualified_name(schema);

        observer.test_started(index, total, &qualified_name);
        let outcome = run_test_case(connection, &qualified_name);
        let result = TestResult::from_outcome(qualified_name, outcome);
        observer.test_finished(index, total, &result);

        results.push(result);
    }

    Ok(results)
}

/// Opens a connection for `file`, executes it and closes the connection.
///
/// Credential overrides in `options` are applied to the connection only.
/// Returns this file's results in order. [`aggregate`](fn@crate::aggregate)
/// turns the results of one or more files into a [`crate::RunResultSet`].
///
/// # Errors
/// Fails with a connection-level error before any test runs if the
/// connection cannot be established.
pub fn run(
    connector: &dyn Connector,
    file: &TestFileDefinition,
    options: &RunOptions,
    observer: &mut dyn ProgressObserver,
) -> Result<Vec<TestResult>> {
    let settings = ConnectionSettings::for_file(file, options);
    let mut connection = acquire(connector, &settings)?;
    let results = execute(&mut *connection, file, &options.schema, observer);
    connection.release();
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualify_with_schema() {
        assert_eq!(qualify_name("dbo", "CheckInventory"), "dbo.CheckInventory");
    }

    #[test]
    fn test_qualify_without_schema() {
        assert_eq!(qualify_name("", "CheckInventory"), "CheckInventory");
    }
}
