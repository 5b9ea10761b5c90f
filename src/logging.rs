// src/logging.rs

//! Logging setup for `taskshift` using `tracing` + `tracing-subscriber`.
//!
//! Level resolution: `--log-level`, then `TASKSHIFT_LOG`, then `warn`.
//! Output goes to stderr; stdout is reserved for command output.

use anyhow::{Result, anyhow};
use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "TASKSHIFT_LOG";

/// Install the global subscriber. A second call returns an error.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = resolve_level(cli_level, std::env::var(LOG_ENV).ok().as_deref());

    fmt()
        .with_max_level(level)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

fn resolve_level(cli_level: Option<LogLevel>, env_value: Option<&str>) -> Level {
    cli_level
        .or_else(|| {
            let raw = env_value?.trim();
            // "warning" is accepted alongside clap's own spelling.
            let raw = if raw.eq_ignore_ascii_case("warning") { "warn" } else { raw };
            LogLevel::from_str(raw, true).ok()
        })
        .map(Level::from)
        .unwrap_or(Level::WARN)
}

impl From<LogLevel> for Level {
    fn from(lvl: LogLevel) -> Self {
        match lvl {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}
