// src/engine/edits.rs

//! Planners for the individual edit kinds.
//!
//! Each planner validates its inputs against the snapshot and returns the
//! batch for the store. "Nothing to change" is an empty plan, not an error.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::dag::{DependencyIndex, Snapshot, Task, compute_shift_with_index};
use crate::engine::{EditPlan, IntegrityWarning, PlanContext};
use crate::errors::{Result, TaskshiftError};
use crate::project::ids::{unique_id_for, validate_task_id};
use crate::store::{NewTask, TaskChange, TaskMutation};
use crate::types::CyclePolicy;

fn require<'a>(snapshot: &'a Snapshot, id: &str) -> Result<&'a Task> {
    snapshot
        .get(id)
        .ok_or_else(|| TaskshiftError::TaskNotFound(id.to_string()))
}

fn clean_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(TaskshiftError::Validation(
            "task title must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

fn check_duration(days: u32) -> Result<u32> {
    if days == 0 {
        return Err(TaskshiftError::Validation(
            "duration must be at least 1 day".to_string(),
        ));
    }
    Ok(days)
}

fn update(id: &str, change: TaskChange) -> EditPlan {
    EditPlan {
        mutations: vec![TaskMutation::Update {
            id: id.to_string(),
            change,
        }],
        ..EditPlan::default()
    }
}

pub fn plan_create(
    snapshot: &Snapshot,
    ctx: &PlanContext,
    title: &str,
    start: Option<NaiveDate>,
    duration_days: Option<u32>,
    id: Option<&str>,
) -> Result<EditPlan> {
    let title = clean_title(title)?;
    let duration_days = check_duration(duration_days.unwrap_or(1))?;

    let id = match id {
        Some(explicit) => {
            validate_task_id(explicit)?;
            if snapshot.contains(explicit) {
                return Err(TaskshiftError::Validation(format!(
                    "task id '{explicit}' already exists"
                )));
            }
            explicit.to_string()
        }
        None => unique_id_for(&title, |candidate| snapshot.contains(candidate)),
    };

    debug!(task = %id, "planning task creation");

    Ok(EditPlan {
        mutations: vec![TaskMutation::Insert(NewTask {
            id,
            title,
            start: start.unwrap_or(ctx.today),
            duration_days,
            depends_on: Vec::new(),
        })],
        ..EditPlan::default()
    })
}

/// Shift `id` to `start` and every transitive dependent by the same delta.
///
/// Unknown ids and unchanged dates produce an empty plan.
pub fn plan_shift(
    snapshot: &Snapshot,
    index: &DependencyIndex,
    id: &str,
    start: NaiveDate,
) -> Result<EditPlan> {
    let shift = compute_shift_with_index(snapshot, index, id, start)?;
    if shift.is_empty() {
        return Ok(EditPlan::default());
    }

    let mutations = shift
        .iter()
        .map(|(task, date)| TaskMutation::Update {
            id: task.to_string(),
            change: TaskChange::Start(date),
        })
        .collect();

    let mut warnings = Vec::new();
    for cycle in index.cycles() {
        let touched: Vec<_> = cycle.into_iter().filter(|t| shift.contains(t)).collect();
        if !touched.is_empty() {
            warnings.push(IntegrityWarning::ShiftThroughCycle { tasks: touched });
        }
    }
    warnings.extend(
        index
            .dangling()
            .iter()
            .filter(|d| shift.contains(&d.task))
            .cloned()
            .map(IntegrityWarning::Dangling),
    );

    Ok(EditPlan {
        mutations,
        shift: Some(shift),
        warnings,
    })
}

pub fn plan_set_title(snapshot: &Snapshot, id: &str, title: &str) -> Result<EditPlan> {
    let task = require(snapshot, id)?;
    let title = clean_title(title)?;
    if task.title == title {
        return Ok(EditPlan::default());
    }
    Ok(update(id, TaskChange::Title(title)))
}

pub fn plan_set_duration(snapshot: &Snapshot, id: &str, days: u32) -> Result<EditPlan> {
    let task = require(snapshot, id)?;
    let days = check_duration(days)?;
    if task.duration_days == days {
        return Ok(EditPlan::default());
    }
    Ok(update(id, TaskChange::Duration(days)))
}

/// Add `parent` to `id`'s `depends_on`.
///
/// Self-dependencies and parents already present are no-ops. Closing a cycle
/// is handled according to `policy`.
pub fn plan_add_dependency(
    snapshot: &Snapshot,
    index: &DependencyIndex,
    policy: CyclePolicy,
    id: &str,
    parent: &str,
) -> Result<EditPlan> {
    let task = require(snapshot, id)?;
    require(snapshot, parent)?;

    if id == parent {
        debug!(task = %id, "ignoring self-dependency");
        return Ok(EditPlan::default());
    }
    if task.depends_on.iter().any(|p| p == parent) {
        debug!(task = %id, parent = %parent, "dependency already present");
        return Ok(EditPlan::default());
    }

    let mut warnings = Vec::new();
    if index.would_create_cycle(id, parent) {
        match policy {
            CyclePolicy::Reject => {
                return Err(TaskshiftError::DependencyCycle(format!(
                    "'{id}' depending on '{parent}' would close a loop ('{parent}' already depends on '{id}')"
                )));
            }
            CyclePolicy::Warn => {
                warn!(task = %id, parent = %parent, "dependency closes a cycle; accepting");
                warnings.push(IntegrityWarning::CycleClosed {
                    task: id.to_string(),
                    parent: parent.to_string(),
                });
            }
        }
    }

    let mut parents = task.depends_on.clone();
    parents.push(parent.to_string());

    let mut plan = update(id, TaskChange::DependsOn(parents));
    plan.warnings = warnings;
    Ok(plan)
}

pub fn plan_remove_dependency(snapshot: &Snapshot, id: &str, parent: &str) -> Result<EditPlan> {
    let task = require(snapshot, id)?;
    if !task.depends_on.iter().any(|p| p == parent) {
        return Ok(EditPlan::default());
    }
    let parents = task
        .depends_on
        .iter()
        .filter(|p| p.as_str() != parent)
        .cloned()
        .collect();
    Ok(update(id, TaskChange::DependsOn(parents)))
}

/// Delete one task. Dependents are not repaired; their reference is skipped
/// during propagation from then on.
pub fn plan_delete(snapshot: &Snapshot, index: &DependencyIndex, id: &str) -> Result<EditPlan> {
    require(snapshot, id)?;

    let mut dependents: Vec<String> = index
        .children(id)
        .filter(|child| *child != id)
        .map(str::to_string)
        .collect();
    dependents.sort();
    dependents.dedup();

    let warnings = if dependents.is_empty() {
        Vec::new()
    } else {
        vec![IntegrityWarning::LeavesDangling {
            task: id.to_string(),
            dependents,
        }]
    };

    Ok(EditPlan {
        mutations: vec![TaskMutation::Remove { id: id.to_string() }],
        shift: None,
        warnings,
    })
}
