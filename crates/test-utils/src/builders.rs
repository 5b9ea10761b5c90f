#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use taskshift::dag::{Snapshot, Task};

use crate::date;

fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0)
        .single()
        .expect("valid base timestamp")
}

/// Builder for `Snapshot` to simplify test setup.
///
/// Tasks get increasing `created_at` stamps in the order they are added, so
/// the snapshot's creation order matches insertion order.
pub struct SnapshotBuilder {
    tasks: Vec<Task>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn with_task(mut self, mut task: Task) -> Self {
        let stamp = base_time() + chrono::Duration::seconds(self.tasks.len() as i64);
        task.created_at = stamp;
        task.updated_at = stamp;
        self.tasks.push(task);
        self
    }

    /// Task without dependencies.
    pub fn task(self, id: &str, start: &str) -> Self {
        self.with_task(TaskBuilder::new(id, start).build())
    }

    /// Task depending on every id in `deps`.
    pub fn task_after(self, id: &str, start: &str, deps: &[&str]) -> Self {
        let builder = deps
            .iter()
            .fold(TaskBuilder::new(id, start), |b, dep| b.after(dep));
        self.with_task(builder.build())
    }

    pub fn build(self) -> Snapshot {
        Snapshot::new(self.tasks).expect("Failed to build valid snapshot from builder")
    }
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Task`.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: &str, start: &str) -> Self {
        Self {
            task: Task {
                id: id.to_string(),
                title: id.to_string(),
                start: date(start),
                duration_days: 1,
                depends_on: vec![],
                created_at: base_time(),
                updated_at: base_time(),
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.task.title = title.to_string();
        self
    }

    pub fn duration(mut self, days: u32) -> Self {
        self.task.duration_days = days;
        self
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.depends_on.push(dep.to_string());
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}
