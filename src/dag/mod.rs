// src/dag/mod.rs

//! Dependency graph and date propagation.
//!
//! - [`snapshot`] holds the flat, fully loaded task collection.
//! - [`graph`] builds the reverse adjacency index (parent -> dependents).
//! - [`propagate`] computes the start-date mutations for a shift.
//!
//! Nothing in here performs IO.

pub mod graph;
pub mod propagate;
pub mod snapshot;

pub use graph::{DanglingRef, DependencyIndex};
pub use propagate::{ShiftPlan, compute_shift, compute_shift_with_index};
pub use snapshot::{Snapshot, Task};
