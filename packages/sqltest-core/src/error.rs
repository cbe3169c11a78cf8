//! Error types for test loading, connections and procedure calls.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading test files, connecting or calling procedures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SqlTestError {
    /// Connection string could not be parsed
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),

    /// Target unreachable or authentication rejected
    #[error("Failed to connect: {0}")]
    Connection(String),

    /// Connection was closed before execution started
    #[error("Connection is closed")]
    ConnectionClosed,

    /// Error raised by a single procedure call
    #[error("{0}")]
    DataAccess(String),

    /// Test file could not be read
    #[error("Failed to read test file '{}': {message}", path.display())]
    TestFileRead { path: PathBuf, message: String },

    /// Test file is not a valid test definition
    #[error("Failed to parse test file '{}': {message}", path.display())]
    TestFileParse { path: PathBuf, message: String },
}

impl SqlTestError {
    /// Returns true for connection-level errors that abort a whole file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SqlTestError::InvalidConnectionString(_)
                | SqlTestError::Connection(_)
                | SqlTestError::ConnectionClosed
        )
    }

    /// Builds a [`SqlTestError::DataAccess`] from any message.
    pub fn data_access(message: impl Into<String>) -> Self {
        SqlTestError::DataAccess(message.into())
    }
}

/// Result type for test runner operations.
pub type Result<T> = std::result::Result<T, SqlTestError>;
