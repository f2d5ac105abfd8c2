//! Solver configuration.

use serde::{Deserialize, Serialize};

/// Heuristics of the push-relabel solvers.
///
/// Both heuristics only change the amount of work, never the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PushRelabelConfig {
    /// Periodically recompute exact heights by a breadth-first search from the sink.
    pub global_relabel: bool,
    /// Relabel work, in units of `nodes + arcs`, between two global relabels.
    pub global_relabel_frequency: f64,
    /// Retire every node above a height level that became empty.
    pub gap_heuristic: bool,
}

impl Default for PushRelabelConfig {
    fn default() -> Self {
        Self {
            global_relabel: true,
            global_relabel_frequency: 1.0,
            gap_heuristic: true,
        }
    }
}

/// Configuration handed to the solver factories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub push_relabel: PushRelabelConfig,
}
