// src/engine/mod.rs

//! Edit engine for taskshift.
//!
//! Every user edit follows the same read -> compute -> write contract:
//! - load a full snapshot from the store,
//! - plan the edit purely against that snapshot ([`core`], [`edits`]),
//! - hand the resulting batch to the store in one atomic write ([`session`]).
//!
//! Planning never touches the store, so it can be tested without a
//! filesystem.

use chrono::NaiveDate;

use crate::dag::{DanglingRef, ShiftPlan};
use crate::store::TaskMutation;
use crate::types::{CyclePolicy, TaskId};

/// A user-level edit of the project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Edit {
    /// Create a task. Missing fields default to today, 1 day, and an id
    /// derived from the title.
    Create {
        title: String,
        start: Option<NaiveDate>,
        duration_days: Option<u32>,
        id: Option<TaskId>,
    },
    /// Move a task's start date and shift all of its dependents.
    Shift { id: TaskId, start: NaiveDate },
    SetTitle { id: TaskId, title: String },
    /// Change the duration. Does not move dependents.
    SetDuration { id: TaskId, days: u32 },
    /// Make `id` depend on `parent`. Does not move any dates.
    AddDependency { id: TaskId, parent: TaskId },
    RemoveDependency { id: TaskId, parent: TaskId },
    /// Delete a single task; dependents keep a dangling reference.
    Delete { id: TaskId },
}

/// Inputs to planning that do not come from the snapshot.
#[derive(Debug, Clone, Copy)]
pub struct PlanContext {
    /// Default start date for new tasks.
    pub today: NaiveDate,
    pub cycle_policy: CyclePolicy,
}

/// Data-integrity findings that should be surfaced as warnings, never as
/// fatal errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityWarning {
    /// The accepted dependency edit closed a loop.
    CycleClosed { task: TaskId, parent: TaskId },
    /// The shift reached tasks that sit on a dependency loop.
    ShiftThroughCycle { tasks: Vec<TaskId> },
    /// A shifted task lists a parent that no longer exists.
    Dangling(DanglingRef),
    /// Deleting the task leaves these dependents pointing at nothing.
    LeavesDangling { task: TaskId, dependents: Vec<TaskId> },
}

/// Result of planning one edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditPlan {
    /// The batch to write atomically. Empty means "no-op".
    pub mutations: Vec<TaskMutation>,
    /// For `Edit::Shift`, the computed date mutations.
    pub shift: Option<ShiftPlan>,
    pub warnings: Vec<IntegrityWarning>,
}

impl EditPlan {
    pub fn is_noop(&self) -> bool {
        self.mutations.is_empty()
    }
}

/// Cycles and dangling references found in a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntegrityReport {
    pub task_count: usize,
    pub edge_count: usize,
    pub cycles: Vec<Vec<TaskId>>,
    pub dangling: Vec<DanglingRef>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.cycles.is_empty() && self.dangling.is_empty()
    }
}

pub mod core;
pub mod edits;
pub mod session;

pub use self::core::{integrity_report, plan_edit};
pub use session::{EditOutcome, Session};
