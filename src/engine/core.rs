// src/engine/core.rs

//! Pure edit planning.
//!
//! Takes a snapshot (plus its dependency index) and an [`Edit`] and returns
//! the batch the IO shell should write. No channels, no store, no clock.

use crate::dag::{DependencyIndex, Snapshot};
use crate::engine::edits::{
    plan_add_dependency, plan_create, plan_delete, plan_remove_dependency, plan_set_duration,
    plan_set_title, plan_shift,
};
use crate::engine::{Edit, EditPlan, IntegrityReport, PlanContext};
use crate::errors::Result;

/// Plan a single edit against `snapshot`.
///
/// `index` must have been built from the same snapshot.
pub fn plan_edit(
    snapshot: &Snapshot,
    index: &DependencyIndex,
    edit: &Edit,
    ctx: &PlanContext,
) -> Result<EditPlan> {
    match edit {
        Edit::Create {
            title,
            start,
            duration_days,
            id,
        } => plan_create(snapshot, ctx, title, *start, *duration_days, id.as_deref()),
        Edit::Shift { id, start } => plan_shift(snapshot, index, id, *start),
        Edit::SetTitle { id, title } => plan_set_title(snapshot, id, title),
        Edit::SetDuration { id, days } => plan_set_duration(snapshot, id, *days),
        Edit::AddDependency { id, parent } => {
            plan_add_dependency(snapshot, index, ctx.cycle_policy, id, parent)
        }
        Edit::RemoveDependency { id, parent } => plan_remove_dependency(snapshot, id, parent),
        Edit::Delete { id } => plan_delete(snapshot, index, id),
    }
}

/// Summarise cycles and dangling references in a snapshot.
pub fn integrity_report(snapshot: &Snapshot, index: &DependencyIndex) -> IntegrityReport {
    IntegrityReport {
        task_count: snapshot.len(),
        edge_count: index.edge_count(),
        cycles: index.cycles(),
        dangling: index.dangling().to_vec(),
    }
}
