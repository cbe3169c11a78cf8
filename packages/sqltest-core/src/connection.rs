//! Connection lifecycle: one connection per file-level run.
//!
//! [`acquire`] opens a connection through a [`Connector`] and hands back a
//! [`ConnectionGuard`]. The guard closes the connection on
//! [`ConnectionGuard::release`] or, if it is never released, when dropped.

use std::ops::{Deref, DerefMut};

use crate::config::RunOptions;
use crate::error::Result;
use crate::model::TestFileDefinition;

/// Open database session used to call procedures.
pub trait Connection {
    /// Calls `qualified_name` with no input parameters and returns its
    /// integer return code.
    fn call_procedure(&mut self, qualified_name: &str) -> Result<i32>;

    /// Returns true once the session can no longer be used.
    fn is_closed(&self) -> bool;

    /// Closes the session. Calling it on a closed connection is a no-op.
    fn close(&mut self) -> Result<()>;
}

/// Factory for connections.
pub trait Connector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>>;
}

/// Everything needed to open a connection for one file.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    pub connection_string: String,
    /// User override, `None` keeps the connection string's user
    pub user: Option<String>,
    /// Password override, `None` keeps the connection string's password
    pub password: Option<String>,
}

impl ConnectionSettings {
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            user: None,
            password: None,
        }
    }

    /// Builds settings for `file`, applying non-empty credential overrides.
    pub fn for_file(file: &TestFileDefinition, options: &RunOptions) -> Self {
        Self {
            connection_string: file.connection_string.clone(),
            user: non_empty(&options.user),
            password: non_empty(&options.password),
        }
    }
}

// Keeps passwords out of debug logs.
impl std::fmt::Debug for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSettings")
            .field("connection_string", &"<redacted>")
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Opens a connection for the duration of a file-level run.
pub fn acquire(
    connector: &dyn Connector,
    settings: &ConnectionSettings,
) -> Result<ConnectionGuard> {
    let connection = connector.connect(settings)?;
    tracing::debug!("Connection opened");
    Ok(ConnectionGuard { connection })
}

/// Owns an open connection and closes it when released or dropped.
pub struct ConnectionGuard {
    connection: Box<dyn Connection>,
}

impl ConnectionGuard {
    /// Closes the connection. Close errors are logged, not returned, so they
    /// never hide results that were already produced.
    pub fn release(self) {
        drop(self);
    }
}

impl Deref for ConnectionGuard {
    type Target = dyn Connection;

    fn deref(&self) -> &Self::Target {
        self.connection.as_ref()
    }
}

impl DerefMut for ConnectionGuard {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection.as_mut()
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        // `close` is idempotent, a connection dropped mid-run may already be closed.
        match self.connection.close() {
            Ok(()) => tracing::debug!("Connection closed"),
            Err(e) => tracing::warn!("Failed to close connection cleanly: {}", e),
        }
    }
}
