// src/engine/session.rs

//! IO shell around the pure planner.
//!
//! One call = one edit: load a snapshot, plan against it, write the batch once.
//! There is no conflict detection between load and write; if two sessions race,
//! the later write wins.

use chrono::{Local, NaiveDate};
use tracing::{debug, info, warn};

use crate::dag::{DependencyIndex, Snapshot};
use crate::engine::core::{integrity_report, plan_edit};
use crate::engine::{Edit, EditPlan, IntegrityReport, IntegrityWarning, PlanContext};
use crate::errors::Result;
use crate::project::model::SettingsSection;
use crate::store::TaskStore;

/// What an applied edit did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub plan: EditPlan,
    /// Number of mutations persisted (0 for a no-op).
    pub written: usize,
}

/// Edit session over a [`TaskStore`].
#[derive(Debug)]
pub struct Session<S: TaskStore> {
    store: S,
    today: Option<NaiveDate>,
}

impl<S: TaskStore> Session<S> {
    pub fn new(store: S) -> Self {
        Self { store, today: None }
    }

    /// Pin the default start date for new tasks instead of using the local date.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Full snapshot of the project, in creation order.
    pub fn snapshot(&self) -> Result<Snapshot> {
        self.store.load_snapshot()
    }

    /// Plan `edit` without writing anything.
    ///
    /// Tasks and settings come from a single read of the project.
    pub fn preview(&self, edit: &Edit) -> Result<EditPlan> {
        let project = self.store.load_project()?;
        let snapshot = Snapshot::from_project(&project)?;
        let index = DependencyIndex::build(&snapshot);
        let ctx = self.context(project.settings);
        plan_edit(&snapshot, &index, edit, &ctx)
    }

    /// Plan `edit` and write the resulting batch atomically.
    pub fn apply(&self, edit: &Edit) -> Result<EditOutcome> {
        let plan = self.preview(edit)?;
        log_warnings(&plan.warnings);

        if plan.is_noop() {
            debug!(?edit, "edit is a no-op; nothing written");
            return Ok(EditOutcome { plan, written: 0 });
        }

        let written = self.store.apply_batch(&plan.mutations)?;
        info!(written, "edit applied");
        Ok(EditOutcome { plan, written })
    }

    /// Report cycles and dangling references without writing.
    pub fn check(&self) -> Result<IntegrityReport> {
        let snapshot = self.store.load_snapshot()?;
        let index = DependencyIndex::build(&snapshot);
        let report = integrity_report(&snapshot, &index);

        for cycle in report.cycles.iter() {
            warn!(tasks = ?cycle, "dependency cycle");
        }
        for d in report.dangling.iter() {
            warn!(task = %d.task, missing_parent = %d.missing_parent, "dangling dependency");
        }
        Ok(report)
    }

    fn context(&self, settings: SettingsSection) -> PlanContext {
        PlanContext {
            today: self.today.unwrap_or_else(|| Local::now().date_naive()),
            cycle_policy: settings.cycle_policy,
        }
    }
}

fn log_warnings(warnings: &[IntegrityWarning]) {
    for w in warnings {
        match w {
            IntegrityWarning::CycleClosed { task, parent } => {
                warn!(task = %task, parent = %parent, "new dependency closes a cycle")
            }
            IntegrityWarning::ShiftThroughCycle { tasks } => {
                warn!(tasks = ?tasks, "shift reached tasks on a dependency cycle; each moved once")
            }
            IntegrityWarning::Dangling(d) => {
                warn!(
                    task = %d.task,
                    missing_parent = %d.missing_parent,
                    "shifted task lists a parent that no longer exists"
                )
            }
            IntegrityWarning::LeavesDangling { task, dependents } => {
                warn!(task = %task, dependents = ?dependents, "deleted task still listed as a parent")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::mock::MockFileSystem;
    use crate::store::FileStore;
    use crate::types::CyclePolicy;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn session() -> Session<FileStore<MockFileSystem>> {
        let store = FileStore::open_or_create(MockFileSystem::new(), "Taskshift.toml", "bob").unwrap();
        Session::new(store).with_today(date("2024-05-01"))
    }

    fn create(session: &Session<FileStore<MockFileSystem>>, id: &str, start: &str) {
        session
            .apply(&Edit::Create {
                title: id.to_uppercase(),
                start: Some(date(start)),
                duration_days: None,
                id: Some(id.to_string()),
            })
            .unwrap();
    }

    fn depend(session: &Session<FileStore<MockFileSystem>>, id: &str, parent: &str) {
        session
            .apply(&Edit::AddDependency {
                id: id.to_string(),
                parent: parent.to_string(),
            })
            .unwrap();
    }

    #[test]
    fn shift_persists_whole_plan() {
        let s = session();
        create(&s, "a", "2024-01-01");
        create(&s, "b", "2024-01-02");
        create(&s, "c", "2024-01-03");
        depend(&s, "b", "a");
        depend(&s, "c", "b");

        let outcome = s
            .apply(&Edit::Shift {
                id: "a".to_string(),
                start: date("2024-01-03"),
            })
            .unwrap();
        assert_eq!(outcome.written, 3);

        let snap = s.snapshot().unwrap();
        assert_eq!(snap.get("a").unwrap().start, date("2024-01-03"));
        assert_eq!(snap.get("b").unwrap().start, date("2024-01-04"));
        assert_eq!(snap.get("c").unwrap().start, date("2024-01-05"));

        // Same target again: nothing left to do.
        let again = s
            .apply(&Edit::Shift {
                id: "a".to_string(),
                start: date("2024-01-03"),
            })
            .unwrap();
        assert_eq!(again.written, 0);
    }

    #[test]
    fn new_tasks_default_to_today() {
        let s = session();
        s.apply(&Edit::Create {
            title: "Kickoff".to_string(),
            start: None,
            duration_days: None,
            id: None,
        })
        .unwrap();

        let snap = s.snapshot().unwrap();
        let task = snap.get("kickoff").unwrap();
        assert_eq!(task.start, date("2024-05-01"));
        assert_eq!(task.duration_days, 1);
        assert!(task.depends_on.is_empty());
    }

    #[test]
    fn preview_does_not_write() {
        let s = session();
        create(&s, "a", "2024-01-01");

        let plan = s
            .preview(&Edit::Shift {
                id: "a".to_string(),
                start: date("2024-02-01"),
            })
            .unwrap();
        assert_eq!(plan.mutations.len(), 1);
        assert_eq!(s.snapshot().unwrap().get("a").unwrap().start, date("2024-01-01"));
    }

    #[test]
    fn delete_leaves_dangling_reference_that_check_reports() {
        let s = session();
        create(&s, "a", "2024-01-01");
        create(&s, "b", "2024-01-02");
        depend(&s, "b", "a");

        s.apply(&Edit::Delete { id: "a".to_string() }).unwrap();

        let snap = s.snapshot().unwrap();
        assert_eq!(snap.get("b").unwrap().depends_on, vec!["a".to_string()]);

        let report = s.check().unwrap();
        assert!(!report.is_clean());
        assert_eq!(report.dangling.len(), 1);
        assert_eq!(report.dangling[0].missing_parent, "a");

        // b can still be shifted; the missing parent is simply skipped.
        let outcome = s
            .apply(&Edit::Shift {
                id: "b".to_string(),
                start: date("2024-01-09"),
            })
            .unwrap();
        assert_eq!(outcome.written, 1);
    }

    #[test]
    fn check_reports_cycles_accepted_under_warn_policy() {
        let s = session();
        create(&s, "a", "2024-01-01");
        create(&s, "b", "2024-01-02");
        depend(&s, "b", "a");
        depend(&s, "a", "b");

        let report = s.check().unwrap();
        assert_eq!(report.cycles, vec![vec!["a".to_string(), "b".to_string()]]);
        assert_eq!(report.task_count, 2);
        assert_eq!(report.edge_count, 2);
        assert_eq!(s.store().settings().unwrap().cycle_policy, CyclePolicy::Warn);
    }

    #[derive(Debug)]
    struct CountingStore {
        inner: FileStore<MockFileSystem>,
        loads: std::cell::Cell<usize>,
    }

    impl TaskStore for CountingStore {
        fn load_project(&self) -> Result<crate::project::ProjectFile> {
            self.loads.set(self.loads.get() + 1);
            self.inner.load_project()
        }

        fn apply_batch(&self, batch: &[crate::store::TaskMutation]) -> Result<usize> {
            self.inner.apply_batch(batch)
        }
    }

    #[test]
    fn preview_reads_project_once() {
        let seeded = session();
        create(&seeded, "a", "2024-01-01");
        create(&seeded, "b", "2024-01-02");
        depend(&seeded, "b", "a");

        let counting = Session::new(CountingStore {
            inner: FileStore::open(seeded.store().filesystem().clone(), "Taskshift.toml").unwrap(),
            loads: std::cell::Cell::new(0),
        })
        .with_today(date("2024-05-01"));

        let plan = counting
            .preview(&Edit::Shift {
                id: "a".to_string(),
                start: date("2024-01-04"),
            })
            .unwrap();

        assert_eq!(plan.mutations.len(), 2);
        assert_eq!(counting.store().loads.get(), 1);
    }
}
