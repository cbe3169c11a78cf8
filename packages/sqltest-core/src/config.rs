//! Runner configuration.

/// How a procedure is invoked on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallStyle {
    /// `SELECT name() AS "return"`
    #[default]
    Function,
    /// `CALL name(NULL)`, the single INOUT parameter carries the return code
    Procedure,
}

/// Runner configuration.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Schema prefix for every procedure (empty = unqualified)
    pub schema: String,
    /// User override (empty = use the connection string)
    pub user: String,
    /// Password override (empty = use the connection string)
    pub password: String,
    /// Invocation style for procedures
    pub call_style: CallStyle,
    /// Connect timeout in milliseconds
    pub connect_timeout_ms: u64,
    /// Keep running remaining files after a file fails to load or connect
    pub continue_after_file_error: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            schema: String::new(),
            user: String::new(),
            password: String::new(),
            call_style: CallStyle::Function,
            connect_timeout_ms: 15000, // 15 seconds default
            continue_after_file_error: true,
        }
    }
}

impl RunnerConfig {
    /// Returns the per-run options consumed by [`crate::engine::run`].
    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            schema: self.schema.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}

/// Schema prefix and credential overrides for one file-level run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    pub schema: String,
    pub user: String,
    pub password: String,
}

impl RunOptions {
    /// Options with only a schema prefix.
    pub fn with_schema(schema: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            ..Default::default()
        }
    }
}
