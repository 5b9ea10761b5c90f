// src/project/model.rs

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::project::dates;
use crate::types::{CyclePolicy, TaskId};

/// Top-level project file as read from TOML.
///
/// ```toml
/// [project]
/// name = "My Project"
/// owner = "alice"
/// created_at = "2024-01-01T09:00:00Z"
///
/// [settings]
/// cycle_policy = "warn"
///
/// [task.design]
/// title = "Design"
/// start = "2024-01-01"
/// duration_days = 3
/// depends_on = []
/// created_at = "2024-01-01T09:00:00Z"
/// updated_at = "2024-01-01T09:00:00Z"
/// ```
///
/// Dates may also be written as native TOML dates (`start = 2024-01-01`).
///
/// This is the unvalidated form; convert it with `ProjectFile::try_from`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawProjectFile {
    pub project: ProjectSection,

    #[serde(default)]
    pub settings: SettingsSection,

    /// All tasks from `[task.<id>]`, keyed by task id.
    #[serde(default)]
    pub task: BTreeMap<TaskId, TaskRecord>,
}

/// A project file that passed validation.
///
/// Only constructed through `TryFrom<RawProjectFile>` (see `validate.rs`) or
/// by the store after applying already-validated edits.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectFile {
    pub project: ProjectSection,
    pub settings: SettingsSection,
    pub task: BTreeMap<TaskId, TaskRecord>,
}

impl ProjectFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        settings: SettingsSection,
        task: BTreeMap<TaskId, TaskRecord>,
    ) -> Self {
        Self {
            project,
            settings,
            task,
        }
    }

    /// A fresh, empty project owned by `owner`.
    pub fn empty(owner: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self::new_unchecked(
            ProjectSection {
                name: default_project_name(),
                owner: owner.into(),
                created_at: now,
            },
            SettingsSection::default(),
            BTreeMap::new(),
        )
    }
}

/// `[project]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProjectSection {
    #[serde(default = "default_project_name")]
    pub name: String,

    /// Identifier of the single user owning this project.
    pub owner: String,

    #[serde(deserialize_with = "dates::utc_datetime")]
    pub created_at: DateTime<Utc>,
}

fn default_project_name() -> String {
    "My Project".to_string()
}

/// `[settings]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub struct SettingsSection {
    /// `"warn"` (default) or `"reject"`; applies to dependency edits only.
    #[serde(default)]
    pub cycle_policy: CyclePolicy,
}

/// `[task.<id>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskRecord {
    pub title: String,

    /// Calendar date, `YYYY-MM-DD`.
    #[serde(deserialize_with = "dates::naive_date")]
    pub start: NaiveDate,

    #[serde(default = "default_duration_days")]
    pub duration_days: u32,

    /// Parent task ids. Ids that no longer exist are tolerated and skipped
    /// during propagation.
    #[serde(default)]
    pub depends_on: Vec<TaskId>,

    #[serde(deserialize_with = "dates::utc_datetime")]
    pub created_at: DateTime<Utc>,

    #[serde(deserialize_with = "dates::utc_datetime")]
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn default_duration_days() -> u32 {
    1
}
