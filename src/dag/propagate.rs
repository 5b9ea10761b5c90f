// src/dag/propagate.rs

//! Start-date propagation.
//!
//! Moving a task by `delta` days moves every task reachable through
//! `depends_on` links by the same `delta`. The shift is not re-derived per
//! hop, so a task ten hops away moves exactly as far as a direct child, and
//! the result does not depend on traversal order. Overlap with a parent's
//! finish date is not corrected; only relative offsets are preserved.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use petgraph::graph::NodeIndex;
use petgraph::visit::{VisitMap, Visitable};
use tracing::{debug, trace, warn};

use crate::dag::graph::DependencyIndex;
use crate::dag::snapshot::{Snapshot, Task};
use crate::errors::{Result, TaskshiftError};
use crate::types::TaskId;

/// The date mutations produced by one shift: task id -> new start date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShiftPlan {
    delta: i64,
    starts: BTreeMap<TaskId, NaiveDate>,
}

impl ShiftPlan {
    /// Signed day count applied to every task in the plan (0 for an empty plan).
    pub fn delta(&self) -> i64 {
        self.delta
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn get(&self, id: &str) -> Option<NaiveDate> {
        self.starts.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.starts.contains_key(id)
    }

    /// Mutations ordered by task id.
    pub fn iter(&self) -> impl Iterator<Item = (&str, NaiveDate)> {
        self.starts.iter().map(|(id, date)| (id.as_str(), *date))
    }

    pub fn into_starts(self) -> BTreeMap<TaskId, NaiveDate> {
        self.starts
    }

    /// A copy of `snapshot` with this plan's start dates written in.
    pub fn apply_to(&self, snapshot: &Snapshot) -> Snapshot {
        let mut next = snapshot.clone();
        for (id, start) in self.iter() {
            next.update(id, |task| task.start = start);
        }
        next
    }
}

/// Compute the mutations needed to move `task_id` to `new_start`.
///
/// - Unknown `task_id`: empty plan.
/// - `new_start` equal to the current start: empty plan.
/// - Cycles: traversal stops at tasks it has already visited, so every task
///   appears at most once and the call terminates.
pub fn compute_shift(snapshot: &Snapshot, task_id: &str, new_start: NaiveDate) -> Result<ShiftPlan> {
    let index = DependencyIndex::build(snapshot);
    compute_shift_with_index(snapshot, &index, task_id, new_start)
}

/// Same as [`compute_shift`] with an index the caller already built from
/// `snapshot`.
pub fn compute_shift_with_index(
    snapshot: &Snapshot,
    index: &DependencyIndex,
    task_id: &str,
    new_start: NaiveDate,
) -> Result<ShiftPlan> {
    let Some(root) = snapshot.get(task_id) else {
        debug!(task = %task_id, "shift for unknown task; nothing to do");
        return Ok(ShiftPlan::default());
    };

    let delta = new_start.signed_duration_since(root.start).num_days();
    if delta == 0 {
        debug!(task = %task_id, start = %new_start, "start unchanged; nothing to do");
        return Ok(ShiftPlan::default());
    }

    let mut starts = BTreeMap::new();
    starts.insert(root.id.clone(), new_start);

    if let Some(root_node) = index.node(task_id) {
        // One visited set for the whole walk: diamonds shift once, cycles end.
        let mut visited = index.graph().visit_map();
        visited.visit(root_node);

        let mut stack: Vec<NodeIndex> = index.child_nodes(root_node).collect();
        while let Some(node) = stack.pop() {
            if !visited.visit(node) {
                continue;
            }

            let id = index.id_of(node);
            let Some(task) = snapshot.get(id) else {
                warn!(task = %id, "indexed task missing from snapshot; skipping");
                continue;
            };

            let shifted = shift_start(task, delta)?;
            trace!(task = %id, from = %task.start, to = %shifted, "shifting dependent");
            starts.insert(task.id.clone(), shifted);

            stack.extend(index.child_nodes(node));
        }
    }

    debug!(
        task = %task_id,
        delta,
        affected = starts.len(),
        "computed shift plan"
    );

    Ok(ShiftPlan { delta, starts })
}

fn shift_start(task: &Task, delta: i64) -> Result<NaiveDate> {
    TimeDelta::try_days(delta)
        .and_then(|d| task.start.checked_add_signed(d))
        .ok_or_else(|| TaskshiftError::DateOutOfRange {
            task: task.id.clone(),
            start: task.start,
            delta,
        })
}
