// src/dag/graph.rs

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::algo::{has_path_connecting, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};

use crate::dag::snapshot::Snapshot;
use crate::types::TaskId;

/// A `depends_on` entry naming a task that is not in the snapshot.
///
/// Deleting a task leaves these behind in its dependents; traversal skips them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    pub task: TaskId,
    pub missing_parent: TaskId,
}

/// Reverse adjacency over a snapshot: parent -> direct dependents.
///
/// Nodes live in a flat `petgraph` arena (one node per task, in snapshot
/// order) and edges point from parent to child, so `children(id)` is a
/// neighbour walk instead of a scan over every task.
///
/// Cycles are not rejected here. The graph is built as-is and callers that
/// care can ask for [`DependencyIndex::cycles`].
#[derive(Debug, Clone)]
pub struct DependencyIndex {
    graph: DiGraph<TaskId, ()>,
    nodes: HashMap<TaskId, NodeIndex>,
    dangling: Vec<DanglingRef>,
}

impl DependencyIndex {
    /// Build the index in one pass over every task's `depends_on`, O(N + E).
    pub fn build(snapshot: &Snapshot) -> Self {
        let mut graph: DiGraph<TaskId, ()> = DiGraph::with_capacity(snapshot.len(), 0);
        let mut nodes = HashMap::with_capacity(snapshot.len());

        for task in snapshot.iter() {
            let idx = graph.add_node(task.id.clone());
            nodes.insert(task.id.clone(), idx);
        }

        let mut dangling = Vec::new();
        for task in snapshot.iter() {
            let child = nodes[&task.id];
            for parent in task.depends_on.iter() {
                match nodes.get(parent) {
                    // `update_edge` keeps a repeated parent entry from
                    // producing parallel edges.
                    Some(&p) => {
                        graph.update_edge(p, child, ());
                    }
                    None => dangling.push(DanglingRef {
                        task: task.id.clone(),
                        missing_parent: parent.clone(),
                    }),
                }
            }
        }

        Self {
            graph,
            nodes,
            dangling,
        }
    }

    /// Number of tasks in the index.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    /// Number of resolved dependency edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Direct dependents of `id`: tasks whose `depends_on` contains it.
    ///
    /// Unknown ids have no children.
    pub fn children<'a>(&'a self, id: &str) -> impl Iterator<Item = &'a str> + 'a {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(move |&idx| self.child_nodes(idx))
            .map(move |child| self.graph[child].as_str())
    }

    /// `depends_on` entries that point at tasks missing from the snapshot.
    pub fn dangling(&self) -> &[DanglingRef] {
        &self.dangling
    }

    /// Groups of tasks that depend on each other in a loop.
    ///
    /// Each group is sorted by id; groups are sorted by their first id.
    pub fn cycles(&self) -> Vec<Vec<TaskId>> {
        let mut cycles: Vec<Vec<TaskId>> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
            .map(|scc| {
                let mut ids: Vec<TaskId> =
                    scc.into_iter().map(|idx| self.graph[idx].clone()).collect();
                ids.sort();
                ids
            })
            .collect();
        cycles.sort();
        cycles
    }

    /// Whether making `child` depend on `parent` would close a loop, i.e.
    /// whether `parent` is already reachable downstream of `child`.
    ///
    /// Returns `false` when either task is unknown.
    pub fn would_create_cycle(&self, child: &str, parent: &str) -> bool {
        match (self.nodes.get(child), self.nodes.get(parent)) {
            (Some(&c), Some(&p)) => has_path_connecting(&self.graph, c, p, None),
            _ => false,
        }
    }

    pub(crate) fn node(&self, id: &str) -> Option<NodeIndex> {
        self.nodes.get(id).copied()
    }

    pub(crate) fn id_of(&self, idx: NodeIndex) -> &str {
        self.graph[idx].as_str()
    }

    pub(crate) fn child_nodes(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Outgoing)
    }

    pub(crate) fn graph(&self) -> &DiGraph<TaskId, ()> {
        &self.graph
    }
}
