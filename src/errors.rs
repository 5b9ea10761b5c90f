// src/errors.rs

//! Library error type. Filesystem failures arrive as `anyhow` errors from
//! [`crate::fs`] and are carried in [`TaskshiftError::Other`].

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskshiftError {
    #[error("Project file error: {0}")]
    ProjectError(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Dependency cycle: {0}")]
    DependencyCycle(String),

    #[error("Invalid edit: {0}")]
    Validation(String),

    #[error("Shifting task '{task}' from {start} by {delta} days leaves the supported date range")]
    DateOutOfRange {
        task: String,
        start: NaiveDate,
        delta: i64,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerError(#[from] toml::ser::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
pub type Result<T> = std::result::Result<T, TaskshiftError>;
