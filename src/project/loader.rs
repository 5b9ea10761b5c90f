// src/project/loader.rs

use std::path::{Path, PathBuf};

use crate::fs::FileSystem;
use crate::project::model::{ProjectFile, RawProjectFile};
use crate::errors::Result;

/// Environment variable that overrides the default project file location.
pub const PROJECT_ENV: &str = "TASKSHIFT_PROJECT";

/// Parse a project file from TOML text without semantic validation.
pub fn parse_raw(contents: &str) -> Result<RawProjectFile> {
    let raw: RawProjectFile = toml::from_str(contents)?;
    Ok(raw)
}

/// Parse and validate a project file from TOML text.
pub fn parse_and_validate(contents: &str) -> Result<ProjectFile> {
    let raw = parse_raw(contents)?;
    ProjectFile::try_from(raw)
}

/// Load a project file from a given path and return the raw `RawProjectFile`.
///
/// This only performs TOML deserialization (malformed dates and missing
/// required fields fail here); use [`load_and_validate`] for the semantic
/// checks.
pub fn load_from_path(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<RawProjectFile> {
    let contents = fs.read_to_string(path.as_ref())?;
    parse_raw(&contents)
}

/// Load a project file from path and run validation.
///
/// This is the recommended entry point for the rest of the application:
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - a non-empty owner,
///   - valid task ids and non-empty titles,
///   - `duration_days >= 1`,
///   - self-dependencies.
pub fn load_and_validate(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<ProjectFile> {
    let raw = load_from_path(fs, path)?;
    ProjectFile::try_from(raw)
}

/// Render a project file back to TOML.
pub fn to_toml_string(project: &ProjectFile) -> Result<String> {
    Ok(toml::to_string_pretty(project)?)
}

/// Resolve the default project path.
///
/// `$TASKSHIFT_PROJECT` if set and non-empty, otherwise `Taskshift.toml` in
/// the current working directory.
pub fn default_project_path() -> PathBuf {
    std::env::var(PROJECT_ENV)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("Taskshift.toml"))
}
