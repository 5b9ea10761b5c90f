// src/cli.rs

//! CLI argument parsing using `clap`.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `taskshift`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskshift",
    version,
    about = "Keep task start dates consistent across dependency links.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the project file (TOML).
    ///
    /// Default: `$TASKSHIFT_PROJECT`, else `Taskshift.toml` in the current
    /// working directory. A missing file is created as an empty project.
    #[arg(long, global = true, value_name = "PATH")]
    pub project: Option<String>,

    /// Owner of the project.
    ///
    /// Used when a new project file is created; when given for an existing
    /// file, it must match the recorded owner.
    #[arg(long, global = true, value_name = "ID")]
    pub owner: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKSHIFT_LOG` or a default level will be used.
    #[arg(long, global = true, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List tasks in creation order.
    List,

    /// Create a task.
    Add {
        title: String,

        /// Start date (YYYY-MM-DD). Default: today.
        #[arg(long, value_parser = parse_date, value_name = "DATE")]
        start: Option<NaiveDate>,

        /// Duration in whole days. Default: 1.
        #[arg(long, value_name = "DAYS")]
        duration: Option<u32>,

        /// Explicit id. Default: derived from the title.
        #[arg(long, value_name = "ID")]
        id: Option<String>,
    },

    /// Move a task's start date; every dependent moves by the same number of days.
    Shift {
        id: String,

        #[arg(value_parser = parse_date, value_name = "DATE")]
        date: NaiveDate,

        /// Print the planned moves without writing them.
        #[arg(long)]
        dry_run: bool,
    },

    /// Make ID depend on PARENT. Dates are not moved.
    Depend { id: String, parent: String },

    /// Remove PARENT from ID's dependencies.
    Undepend { id: String, parent: String },

    /// Change a task's title.
    Rename { id: String, title: String },

    /// Change a task's duration. Dependents are not moved.
    Duration { id: String, days: u32 },

    /// Delete a task. Dependents keep a reference to it.
    Delete { id: String },

    /// Report dependency cycles and references to deleted tasks.
    Check,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse an ISO calendar date (`YYYY-MM-DD`).
pub fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
