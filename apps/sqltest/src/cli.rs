//! Command-line arguments for the sqltest runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use sqltest_core::{CallStyle, RunnerConfig};

/// A test runner for sql databases.
#[derive(Parser, Debug)]
#[command(name = "sqltest", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the stored procedures listed in one or more test files
    Run(RunArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Test files or directories containing *.json test files
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Schema prefix applied to every procedure
    #[arg(short, long, default_value = "")]
    pub schema: String,

    /// User name overriding the connection string
    #[arg(short, long, default_value = "")]
    pub user: String,

    /// Password overriding the connection string
    #[arg(
        short,
        long,
        env = "SQLTEST_PASSWORD",
        default_value = "",
        hide_env_values = true
    )]
    pub password: String,

    /// How procedures are invoked
    #[arg(long, value_enum, default_value_t = CallStyleArg::Function)]
    pub call_style: CallStyleArg,

    /// Connect timeout in milliseconds
    #[arg(long, default_value_t = 15000)]
    pub connect_timeout_ms: u64,

    /// Stop at the first file that fails to load or connect
    #[arg(long)]
    pub stop_on_file_error: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallStyleArg {
    /// SELECT name() AS "return"
    Function,
    /// CALL name(NULL)
    Procedure,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

impl RunArgs {
    pub fn runner_config(&self) -> RunnerConfig {
        RunnerConfig {
            schema: self.schema.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
            call_style: match self.call_style {
                CallStyleArg::Function => CallStyle::Function,
                CallStyleArg::Procedure => CallStyle::Procedure,
            },
            connect_timeout_ms: self.connect_timeout_ms,
            continue_after_file_error: !self.stop_on_file_error,
        }
    }
}
