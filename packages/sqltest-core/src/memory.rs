//! In-memory connector with scripted procedures (for testing).
//!
//! Every connection opened by a [`MemoryConnector`] shares one state record,
//! so tests can check how many sessions are open and which procedures were
//! called in which order.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::connection::{Connection, ConnectionSettings, Connector};
use crate::error::{Result, SqlTestError};

/// Scripted behaviour of one procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedCall {
    /// Completes and returns this code
    Return(i32),
    /// Raises a data-access error with this message
    Error(String),
    /// Drops the session during the call
    Disconnect,
}

#[derive(Debug, Default)]
struct MemoryState {
    open: usize,
    opened: usize,
    calls: Vec<String>,
    last_settings: Option<ConnectionSettings>,
}

/// Connector whose procedures are scripted by qualified name.
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    procedures: HashMap<String, ScriptedCall>,
    reject: Option<String>,
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts `name` to behave as `call`.
    pub fn with_procedure(mut self, name: impl Into<String>, call: ScriptedCall) -> Self {
        self.procedures.insert(name.into(), call);
        self
    }

    /// Scripts `name` to return `code`.
    pub fn returning(self, name: impl Into<String>, code: i32) -> Self {
        self.with_procedure(name, ScriptedCall::Return(code))
    }

    /// Makes every connection attempt fail with `message`.
    pub fn reject_connections(mut self, message: impl Into<String>) -> Self {
        self.reject = Some(message.into());
        self
    }

    /// Number of connections currently open.
    pub fn open_connections(&self) -> usize {
        self.state.lock().open
    }

    /// Number of connections opened so far.
    pub fn connections_opened(&self) -> usize {
        self.state.lock().opened
    }

    /// Qualified names called so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    /// Settings of the most recent successful connection.
    pub fn last_settings(&self) -> Option<ConnectionSettings> {
        self.state.lock().last_settings.clone()
    }
}

impl Connector for MemoryConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>> {
        if settings.connection_string.trim().is_empty() {
            let message = "connection string is empty".to_string();
            return Err(SqlTestError::InvalidConnectionString(message));
        }
        if let Some(message) = &self.reject {
            return Err(SqlTestError::Connection(message.clone()));
        }

        let mut state = self.state.lock();
        state.open += 1;
        state.opened += 1;
        state.last_settings = Some(settings.clone());

        Ok(Box::new(MemoryConnection {
            procedures: self.procedures.clone(),
            state: Arc::clone(&self.state),
            closed: false,
        }))
    }
}

/// Session opened by [`MemoryConnector`].
struct MemoryConnection {
    procedures: HashMap<String, ScriptedCall>,
    state: Arc<Mutex<MemoryState>>,
    closed: bool,
}

impl MemoryConnection {
    fn mark_closed(&mut self) {
        if !self.closed {
            self.closed = true;
            self.state.lock().open -= 1;
        }
    }
}

impl Connection for MemoryConnection {
    fn call_procedure(&mut self, qualified_name: &str) -> Result<i32> {
        if self.closed {
            return Err(SqlTestError::data_access("connection is closed"));
        }
        self.state.lock().calls.push(qualified_name.to_string());

        match self.procedures.get(qualified_name).cloned() {
            Some(ScriptedCall::Return(code)) => Ok(code),
            Some(ScriptedCall::Error(message)) => Err(SqlTestError::DataAccess(message)),
            Some(ScriptedCall::Disconnect) => {
                self.mark_closed();
                Err(SqlTestError::data_access("connection lost during call"))
            }
            None => Err(not_found(qualified_name)),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> Result<()> {
        self.mark_closed();
        Ok(())
    }
}

fn not_found(qualified_name: &str) -> SqlTestError {
    SqlTestError::DataAccess(format!("procedure '{}' not found", qualified_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ConnectionSettings {
        ConnectionSettings::new("memory")
    }

    #[test]
    fn test_scripted_calls() {
        let deadlock = ScriptedCall::Error("deadlock".to_string());
        let connector = MemoryConnector::new()
            .returning("dbo.Ok", 0)
            .returning("dbo.Bad", 7)
            .with_procedure("dbo.Boom", deadlock);
        let mut conn = connector.connect(&settings()).unwrap();

        assert_eq!(conn.call_procedure("dbo.Ok").unwrap(), 0);
        assert_eq!(conn.call_procedure("dbo.Bad").unwrap(), 7);
        let err = conn.call_procedure("dbo.Boom").unwrap_err();
        assert_eq!(err, SqlTestError::data_access("deadlock"));
        assert!(conn.call_procedure("dbo.Missing").is_err());

        let expected = vec!["dbo.Ok", "dbo.Bad", "dbo.Boom", "dbo.Missing"];
        assert_eq!(connector.calls(), expected);
    }

    #[test]
    fn test_disconnect_closes_session() {
        let connector = MemoryConnector::new().with_procedure("drop", ScriptedCall::Disconnect);
        let mut conn = connector.connect(&settings()).unwrap();
        assert!(conn.call_procedure("drop").is_err());
        assert!(conn.is_closed());
        assert_eq!(connector.open_connections(), 0);

        // Closing again must not underflow the counter.
        conn.close().unwrap();
        assert_eq!(connector.open_connections(), 0);
    }

    #[test]
    fn test_empty_connection_string_is_invalid() {
        let connector = MemoryConnector::new();
        let blank = ConnectionSettings::new("  ");
        let err = connector.connect(&blank).err().unwrap();
        assert!(matches!(err, SqlTestError::InvalidConnectionString(_)));
    }
}
