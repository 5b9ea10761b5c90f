// src/store/mod.rs

//! Persistence contract for a project's tasks.
//!
//! A store must be able to:
//! - load every task of the project as one consistent [`Snapshot`],
//! - apply a batch of [`TaskMutation`]s all-or-nothing.
//!
//! The store stamps `created_at` / `updated_at`; callers never supply them.

use chrono::NaiveDate;

use crate::dag::Snapshot;
use crate::errors::Result;
use crate::project::model::{ProjectFile, SettingsSection};
use crate::types::TaskId;

pub mod file;

pub use file::FileStore;

/// A task to be inserted. Timestamps are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub id: TaskId,
    pub title: String,
    pub start: NaiveDate,
    pub duration_days: u32,
    pub depends_on: Vec<TaskId>,
}

/// A single field change on an existing task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskChange {
    Start(NaiveDate),
    Title(String),
    Duration(u32),
    DependsOn(Vec<TaskId>),
}

/// One entry in an atomic write batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskMutation {
    Insert(NewTask),
    Update { id: TaskId, change: TaskChange },
    Remove { id: TaskId },
}

impl TaskMutation {
    /// Id of the task this mutation touches.
    pub fn task_id(&self) -> &str {
        match self {
            TaskMutation::Insert(task) => &task.id,
            TaskMutation::Update { id, .. } | TaskMutation::Remove { id } => id,
        }
    }
}

/// Storage collaborator for the edit session.
pub trait TaskStore {
    /// Read the whole validated project in one go.
    fn load_project(&self) -> Result<ProjectFile>;

    /// Load every task of the project.
    fn load_snapshot(&self) -> Result<Snapshot> {
        Snapshot::from_project(&self.load_project()?)
    }

    /// Project-level settings (cycle policy, ...).
    fn settings(&self) -> Result<SettingsSection> {
        Ok(self.load_project()?.settings)
    }

    /// Apply `batch` atomically: either every mutation is persisted or none
    /// is. Returns the number of mutations written.
    fn apply_batch(&self, batch: &[TaskMutation]) -> Result<usize>;
}
