// src/project/mod.rs

//! Project file model, loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a project file through a [`crate::fs::FileSystem`] (`loader.rs`).
//! - Validate write-time invariants like durations and self-dependencies
//!   (`validate.rs`).
//! - Task id rules (`ids.rs`).
//! - Date fields in either TOML spelling (`dates.rs`).

pub mod dates;
pub mod ids;
pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_project_path, load_and_validate, load_from_path, to_toml_string};
pub use model::{ProjectFile, ProjectSection, RawProjectFile, SettingsSection, TaskRecord};
