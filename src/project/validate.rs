// src/project/validate.rs

use crate::errors::{Result, TaskshiftError};
use crate::project::ids::validate_task_id;
use crate::project::model::{ProjectFile, RawProjectFile, TaskRecord};

impl TryFrom<RawProjectFile> for ProjectFile {
    type Error = crate::errors::TaskshiftError;

    fn try_from(raw: RawProjectFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_project(&raw)?;
        Ok(ProjectFile::new_unchecked(raw.project, raw.settings, raw.task))
    }
}

fn validate_raw_project(raw: &RawProjectFile) -> Result<()> {
    validate_project_section(raw)?;
    validate_tasks(raw)?;
    Ok(())
}

fn validate_project_section(raw: &RawProjectFile) -> Result<()> {
    if raw.project.owner.trim().is_empty() {
        return Err(TaskshiftError::ProjectError(
            "[project].owner must not be empty".to_string(),
        ));
    }
    Ok(())
}

// Dangling `depends_on` entries and cycles load fine; traversal skips the
// former and visits each task once.
fn validate_tasks(raw: &RawProjectFile) -> Result<()> {
    for (id, task) in raw.task.iter() {
        validate_task_record(id, task)?;
    }
    Ok(())
}

/// Write-time checks for a single task record.
///
/// Shared with the store so a batch can never persist a record that would
/// fail to load again.
pub(crate) fn validate_task_record(id: &str, task: &TaskRecord) -> Result<()> {
    validate_task_id(id).map_err(|e| TaskshiftError::ProjectError(format!("[task.{id}]: {e}")))?;

    if task.title.trim().is_empty() {
        return Err(TaskshiftError::ProjectError(format!(
            "task '{id}' has an empty title"
        )));
    }
    if task.duration_days == 0 {
        return Err(TaskshiftError::ProjectError(format!(
            "task '{id}' has duration_days = 0 (must be >= 1)"
        )));
    }
    if task.depends_on.iter().any(|parent| parent == id) {
        return Err(TaskshiftError::ProjectError(format!(
            "task '{id}' cannot depend on itself in `depends_on`"
        )));
    }
    Ok(())
}
