// src/dag/snapshot.rs

//! In-memory task snapshot consumed by the dependency index and the
//! propagation engine.

use std::collections::HashMap;

use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::errors::{Result, TaskshiftError};
use crate::project::model::{ProjectFile, TaskRecord};
use crate::types::TaskId;

/// A schedulable unit with a start date, duration and dependency set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub start: NaiveDate,
    pub duration_days: u32,
    /// Parent task ids (the tasks this one depends on).
    pub depends_on: Vec<TaskId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn from_record(id: TaskId, record: &TaskRecord) -> Self {
        Self {
            id,
            title: record.title.clone(),
            start: record.start,
            duration_days: record.duration_days,
            depends_on: record.depends_on.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }

    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            title: self.title.clone(),
            start: self.start,
            duration_days: self.duration_days,
            depends_on: self.depends_on.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Last day the task occupies (inclusive), or `None` past the calendar's end.
    pub fn finish(&self) -> Option<NaiveDate> {
        let extra = u64::from(self.duration_days.saturating_sub(1));
        self.start.checked_add_days(Days::new(extra))
    }
}

/// All tasks of one project, fully loaded, in creation order.
///
/// The engine never works on partial graphs; every operation takes the whole
/// snapshot.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    tasks: Vec<Task>,
    positions: HashMap<TaskId, usize>,
}

impl Snapshot {
    /// Build a snapshot from an arbitrary task list.
    ///
    /// Tasks are ordered by `(created_at, id)`. Duplicate ids are a malformed
    /// snapshot and return an error.
    pub fn new(tasks: Vec<Task>) -> Result<Self> {
        let mut tasks = tasks;
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

        let mut positions = HashMap::with_capacity(tasks.len());
        for (pos, task) in tasks.iter().enumerate() {
            if positions.insert(task.id.clone(), pos).is_some() {
                return Err(TaskshiftError::ProjectError(format!(
                    "duplicate task id '{}' in snapshot",
                    task.id
                )));
            }
        }

        Ok(Self { tasks, positions })
    }

    /// Snapshot of a validated project file.
    pub fn from_project(project: &ProjectFile) -> Result<Self> {
        let tasks = project
            .task
            .iter()
            .map(|(id, record)| Task::from_record(id.clone(), record))
            .collect();
        Self::new(tasks)
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.positions.get(id).map(|&pos| &self.tasks[pos])
    }

    /// Mutate one task in place. Returns `false` for unknown ids.
    ///
    /// The id itself must not be changed by `f`.
    pub fn update(&mut self, id: &str, f: impl FnOnce(&mut Task)) -> bool {
        match self.positions.get(id) {
            Some(&pos) => {
                f(&mut self.tasks[pos]);
                true
            }
            None => false,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.positions.contains_key(id)
    }

    /// Tasks in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(id: &str, created_secs: i64) -> Task {
        let ts = Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap();
        Task {
            id: id.to_string(),
            title: id.to_uppercase(),
            start: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            duration_days: 1,
            depends_on: Vec::new(),
            created_at: ts,
            updated_at: ts,
        }
    }

    #[test]
    fn orders_by_creation_then_id() {
        let snap = Snapshot::new(vec![task("c", 5), task("b", 1), task("a", 5)]).unwrap();
        let ids: Vec<&str> = snap.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert_eq!(snap.get("a").unwrap().title, "A");
        assert!(snap.get("zzz").is_none());
    }

    #[test]
    fn duplicate_ids_are_an_error() {
        let err = Snapshot::new(vec![task("a", 0), task("a", 1)]).unwrap_err();
        assert!(matches!(err, TaskshiftError::ProjectError(_)));
    }

    #[test]
    fn finish_counts_start_day() {
        let mut t = task("a", 0);
        t.duration_days = 3;
        assert_eq!(t.finish(), NaiveDate::from_ymd_opt(2024, 1, 3));
    }

    #[test]
    fn project_snapshot_uses_creation_order() {
        let mut project = ProjectFile::empty("alice", Utc.timestamp_opt(1_700_000_000, 0).unwrap());
        for t in [task("c", 5), task("b", 1), task("a", 5)] {
            project.task.insert(t.id.clone(), t.to_record());
        }

        let snap = Snapshot::from_project(&project).unwrap();
        let ids: Vec<&str> = snap.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
        assert!(snap.contains("c"));
    }
}
