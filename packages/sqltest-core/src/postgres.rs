//! PostgreSQL connector built on the blocking `postgres` client.

use std::time::Duration;

use postgres::{Client, Config, NoTls};

use crate::config::{CallStyle, RunnerConfig};
use crate::connection::{Connection, ConnectionSettings, Connector};
use crate::error::{Result, SqlTestError};

const APPLICATION_NAME: &str = "sqltest";

/// Opens PostgreSQL sessions.
#[derive(Debug, Clone)]
pub struct PostgresConnector {
    call_style: CallStyle,
    connect_timeout: Duration,
}

impl PostgresConnector {
    pub fn new(call_style: CallStyle, connect_timeout: Duration) -> Self {
        Self {
            call_style,
            connect_timeout,
        }
    }

    pub fn from_config(config: &RunnerConfig) -> Self {
        Self::new(
            config.call_style,
            Duration::from_millis(config.connect_timeout_ms),
        )
    }

    /// Parses the connection string and applies overrides.
    ///
    /// Accepts both `key=value` and `postgresql://` URL forms.
    pub fn build_config(&self, settings: &ConnectionSettings) -> Result<Config> {
        let mut config: Config = settings
            .connection_string
            .parse()
            .map_err(invalid_connection_string)?;

        if let Some(user) = &settings.user {
            config.user(user);
        }
        if let Some(password) = &settings.password {
            config.password(password);
        }
        if config.get_connect_timeout().is_none() && !self.connect_timeout.is_zero() {
            config.connect_timeout(self.connect_timeout);
        }
        if config.get_application_name().is_none() {
            config.application_name(APPLICATION_NAME);
        }
        Ok(config)
    }
}

impl Connector for PostgresConnector {
    fn connect(&self, settings: &ConnectionSettings) -> Result<Box<dyn Connection>> {
        let config = self.build_config(settings)?;
        let client = config
            .connect(NoTls)
            .map_err(|e| SqlTestError::Connection(describe(&e)))?;
        Ok(Box::new(PostgresConnection {
            client: Some(client),
            call_style: self.call_style,
        }))
    }
}

/// Statement that invokes `qualified_name` for `style`.
///
/// The name is inserted verbatim.
pub fn call_statement(style: CallStyle, qualified_name: &str) -> String {
    match style {
        CallStyle::Function => format!("SELECT {}() AS \"return\"", qualified_name),
        CallStyle::Procedure => format!("CALL {}(NULL)", qualified_name),
    }
}

struct PostgresConnection {
    client: Option<Client>,
    call_style: CallStyle,
}

impl Connection for PostgresConnection {
    fn call_procedure(&mut self, qualified_name: &str) -> Result<i32> {
        let client = self
            .client
            .as_mut()
            .ok_or_else(|| SqlTestError::data_access("connection is closed"))?;

        let statement = call_statement(self.call_style, qualified_name);
        tracing::trace!("Executing: {}", statement);

        let rows = client
            .query(statement.as_str(), &[])
            .map_err(|e| SqlTestError::DataAccess(describe(&e)))?;
        let row = rows.first().ok_or_else(no_return_code)?;
        let code: Option<i32> = row.try_get(0).map_err(unreadable_return_code)?;
        code.ok_or_else(no_return_code)
    }

    fn is_closed(&self) -> bool {
        self.client.as_ref().map_or(true, Client::is_closed)
    }

    fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client
                .close()
                .map_err(|e| SqlTestError::DataAccess(describe(&e)))?;
        }
        Ok(())
    }
}

fn no_return_code() -> SqlTestError {
    SqlTestError::data_access("procedure returned no return code")
}

fn unreadable_return_code(error: postgres::Error) -> SqlTestError {
    SqlTestError::DataAccess(format!("failed to read return code: {}", error))
}

fn invalid_connection_string(error: postgres::Error) -> SqlTestError {
    SqlTestError::InvalidConnectionString(error.to_string())
}

/// Server errors carry the SQLSTATE, which is more useful than "db error".
fn describe(error: &postgres::Error) -> String {
    match error.as_db_error() {
        Some(db) => format!("{} {}: {}", db.severity(), db.code().code(), db.message()),
        None => error.to_string(),
    }
}
