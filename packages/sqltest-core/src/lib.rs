//! Test execution engine for stored-procedure integration tests.
//!
//! Loads declarative test files, runs each listed procedure over a single
//! connection per file, classifies outcomes by return code and aggregates
//! the results of a whole run.

pub mod aggregate;
pub mod config;
pub mod connection;
pub mod engine;
pub mod error;
pub mod loader;
pub mod memory;
pub mod model;
pub mod observer;
pub mod postgres;
pub mod suite;

pub use aggregate::{aggregate, RunResultSet};
pub use config::{CallStyle, RunOptions, RunnerConfig};
pub use connection::{acquire, Connection, ConnectionGuard, ConnectionSettings, Connector};
pub use engine::{execute, qualify_name, run, run_test_case};
pub use error::{Result, SqlTestError};
pub use model::{TestCaseDefinition, TestFileDefinition, TestOutcome, TestResult};
pub use observer::{NoopObserver, ProgressObserver, TracingObserver};
pub use suite::{run_suite, FileFailure, SuiteReport};
