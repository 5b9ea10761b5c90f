// src/store/file.rs

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::errors::{Result, TaskshiftError};
use crate::fs::FileSystem;
use crate::project::loader::{load_and_validate, to_toml_string};
use crate::project::model::{ProjectFile, TaskRecord};
use crate::project::validate::validate_task_record;
use crate::store::{TaskChange, TaskMutation, TaskStore};

/// Project store backed by a single TOML file.
///
/// A batch is applied to an in-memory copy of the file, which then replaces
/// the original through [`FileSystem::replace`], so readers either see the old
/// file or the fully updated one.
#[derive(Debug)]
pub struct FileStore<F: FileSystem> {
    fs: F,
    path: PathBuf,
    clock: fn() -> DateTime<Utc>,
}

impl<F: FileSystem> FileStore<F> {
    /// Open an existing project file.
    pub fn open(fs: F, path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            fs,
            path: path.into(),
            clock: Utc::now,
        };
        // Fail early on a missing or malformed file.
        store.load_project()?;
        Ok(store)
    }

    /// Open the project file, creating an empty project for `owner` if it does
    /// not exist yet.
    pub fn open_or_create(fs: F, path: impl Into<PathBuf>, owner: &str) -> Result<Self> {
        let path = path.into();
        if fs.exists(&path) {
            return Self::open(fs, path);
        }

        let store = Self {
            fs,
            path,
            clock: Utc::now,
        };
        let project = ProjectFile::empty(owner, (store.clock)());
        store.write_project(&project)?;
        info!(path = ?store.path, owner = %owner, "created new project file");
        Ok(store)
    }

    /// Replace the timestamp source (tests use this for deterministic order).
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn filesystem(&self) -> &F {
        &self.fs
    }

    fn write_project(&self, project: &ProjectFile) -> Result<()> {
        let rendered = to_toml_string(project)?;
        self.fs.replace(&self.path, rendered.as_bytes())?;
        debug!(path = ?self.path, bytes = rendered.len(), "project file written");
        Ok(())
    }
}

impl<F: FileSystem> TaskStore for FileStore<F> {
    /// Read and validate the current project file.
    fn load_project(&self) -> Result<ProjectFile> {
        load_and_validate(&self.fs, &self.path)
    }

    fn apply_batch(&self, batch: &[TaskMutation]) -> Result<usize> {
        if batch.is_empty() {
            debug!("empty batch; nothing to write");
            return Ok(0);
        }

        let mut project = self.load_project()?;
        let now = (self.clock)();

        for mutation in batch {
            apply_mutation(&mut project, mutation, now)?;
        }

        self.write_project(&project)?;
        info!(
            path = ?self.path,
            mutations = batch.len(),
            "applied batch"
        );
        Ok(batch.len())
    }
}

/// Apply one mutation to the in-memory project. Any error aborts the whole
/// batch before anything is written.
fn apply_mutation(
    project: &mut ProjectFile,
    mutation: &TaskMutation,
    now: DateTime<Utc>,
) -> Result<()> {
    match mutation {
        TaskMutation::Insert(task) => {
            if project.task.contains_key(&task.id) {
                return Err(TaskshiftError::Validation(format!(
                    "task id '{}' already exists",
                    task.id
                )));
            }
            let record = TaskRecord {
                title: task.title.clone(),
                start: task.start,
                duration_days: task.duration_days,
                depends_on: task.depends_on.clone(),
                created_at: now,
                updated_at: now,
            };
            validate_task_record(&task.id, &record)?;
            project.task.insert(task.id.clone(), record);
        }
        TaskMutation::Update { id, change } => {
            let record = project
                .task
                .get_mut(id)
                .ok_or_else(|| TaskshiftError::TaskNotFound(id.clone()))?;
            match change {
                TaskChange::Start(start) => record.start = *start,
                TaskChange::Title(title) => record.title = title.clone(),
                TaskChange::Duration(days) => record.duration_days = *days,
                TaskChange::DependsOn(parents) => record.depends_on = parents.clone(),
            }
            record.updated_at = now;
            validate_task_record(id, record)?;
        }
        TaskMutation::Remove { id } => {
            if project.task.remove(id).is_none() {
                return Err(TaskshiftError::TaskNotFound(id.clone()));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::store::NewTask;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn new_task(id: &str, start: &str, deps: &[&str]) -> TaskMutation {
        TaskMutation::Insert(NewTask {
            id: id.to_string(),
            title: id.to_uppercase(),
            start: date(start),
            duration_days: 1,
            depends_on: deps.iter().map(|d| d.to_string()).collect(),
        })
    }

    fn store() -> (MockFileSystem, FileStore<MockFileSystem>) {
        let fs = MockFileSystem::new();
        let store = FileStore::open_or_create(fs.clone(), "p/Taskshift.toml", "alice").unwrap();
        (fs, store)
    }

    #[test]
    fn creates_missing_project_for_owner() {
        let (fs, store) = store();
        let project = store.load_project().unwrap();
        assert_eq!(project.project.owner, "alice");
        assert_eq!(project.project.name, "My Project");
        assert!(project.task.is_empty());
        assert_eq!(fs.paths(), vec![PathBuf::from("p/Taskshift.toml")]);
    }

    #[test]
    fn open_requires_existing_file() {
        let fs = MockFileSystem::new();
        assert!(FileStore::open(fs, "nope.toml").is_err());
    }

    #[test]
    fn applies_batch_and_stamps_updated_at() {
        let (_fs, store) = store();
        store
            .apply_batch(&[new_task("a", "2024-01-01", &[]), new_task("b", "2024-01-02", &["a"])])
            .unwrap();

        let written = store
            .apply_batch(&[
                TaskMutation::Update {
                    id: "a".to_string(),
                    change: TaskChange::Start(date("2024-01-05")),
                },
                TaskMutation::Update {
                    id: "b".to_string(),
                    change: TaskChange::Start(date("2024-01-06")),
                },
            ])
            .unwrap();
        assert_eq!(written, 2);

        let snap = store.load_snapshot().unwrap();
        let a = snap.get("a").unwrap();
        assert_eq!(a.start, date("2024-01-05"));
        assert!(a.updated_at >= a.created_at);
        assert_eq!(snap.get("b").unwrap().start, date("2024-01-06"));
    }

    #[test]
    fn batch_with_unknown_task_writes_nothing() {
        let (fs, store) = store();
        store.apply_batch(&[new_task("a", "2024-01-01", &[])]).unwrap();
        let before = fs.read_to_string(store.path()).unwrap();

        let result = store.apply_batch(&[
            TaskMutation::Update {
                id: "a".to_string(),
                change: TaskChange::Start(date("2024-02-01")),
            },
            TaskMutation::Update {
                id: "ghost".to_string(),
                change: TaskChange::Start(date("2024-02-01")),
            },
        ]);

        assert!(matches!(result, Err(TaskshiftError::TaskNotFound(id)) if id == "ghost"));
        assert_eq!(fs.read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn failed_write_leaves_original_intact() {
        let (fs, store) = store();
        store.apply_batch(&[new_task("a", "2024-01-01", &[])]).unwrap();
        let before = fs.read_to_string(store.path()).unwrap();

        fs.fail_writes_to("p/Taskshift.toml");
        let result = store.apply_batch(&[TaskMutation::Remove {
            id: "a".to_string(),
        }]);

        assert!(result.is_err());
        assert_eq!(fs.read_to_string(store.path()).unwrap(), before);
        assert_eq!(fs.paths(), vec![PathBuf::from("p/Taskshift.toml")]);
    }

    #[test]
    fn rejects_invalid_records() {
        let (_fs, store) = store();
        store.apply_batch(&[new_task("a", "2024-01-01", &[])]).unwrap();

        let zero = store.apply_batch(&[TaskMutation::Update {
            id: "a".to_string(),
            change: TaskChange::Duration(0),
        }]);
        assert!(zero.is_err());

        let dup = store.apply_batch(&[new_task("a", "2024-01-01", &[])]);
        assert!(matches!(dup, Err(TaskshiftError::Validation(_))));

        let selfdep = store.apply_batch(&[new_task("b", "2024-01-01", &["b"])]);
        assert!(selfdep.is_err());
    }

    #[test]
    fn empty_batch_is_not_written() {
        let (_fs, store) = store();
        assert_eq!(store.apply_batch(&[]).unwrap(), 0);
    }
}
