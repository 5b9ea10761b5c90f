use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical task identifier type used throughout the crate.
pub type TaskId = String;

/// What to do when a dependency edit would close a cycle in the graph.
///
/// - `Warn`: accept the edge and log a warning. Propagation still terminates
///   because traversal never re-enters a visited task (default behaviour).
/// - `Reject`: refuse the edit with a `DependencyCycle` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CyclePolicy {
    #[default]
    Warn,
    Reject,
}

impl FromStr for CyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "warn" => Ok(CyclePolicy::Warn),
            "reject" => Ok(CyclePolicy::Reject),
            other => Err(format!(
                "invalid cycle_policy: {other} (expected \"warn\" or \"reject\")"
            )),
        }
    }
}
