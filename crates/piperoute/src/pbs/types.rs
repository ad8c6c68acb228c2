//! Data types for the conflict tree and the engine configuration.
//!
//! Kept small and explicit to make the `dfs` module easy to read.

use std::time::Duration;

use crate::cfg::CostCfg;
use crate::conflict::SelectPolicy;
use crate::plan::Plan;
use crate::priority::{ConstraintSet, PriorityConstraint};

/// Conflict-tree node: a plan snapshot with the priority constraints that
/// produced it. Nodes are immutable once expanded; children deep-copy the
/// parent's paths.
#[derive(Clone, Debug)]
pub struct CtNode {
    pub plan: Plan,
    pub constraints: ConstraintSet,
    pub depth: usize,
}

impl CtNode {
    pub fn root(plan: Plan) -> Self {
        let num_pipes = plan.num_pipes();
        Self {
            plan,
            constraints: ConstraintSet::new(num_pipes),
            depth: 0,
        }
    }

    /// Child with the parent's constraints plus `constraint` and the given
    /// plan snapshot.
    pub fn child(&self, plan: Plan, constraint: PriorityConstraint) -> Self {
        let mut constraints = self.constraints.clone();
        constraints.add(constraint);
        Self {
            plan,
            constraints,
            depth: self.depth + 1,
        }
    }
}

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct PbsCfg {
    /// Largest number of unrouted pipes an accepted plan may have.
    /// `usize::MAX` turns the engine into the missing-pipes variant.
    pub max_missing: usize,
    pub policy: SelectPolicy,
    /// Global wall-clock budget, checked once per tree-node expansion.
    pub timeout: Duration,
    /// Budget of a single low-level routing call.
    pub per_pipe_timeout: Duration,
    pub cost: CostCfg,
    /// Seed of the conflict-selection RNG; fixing it fixes the whole run.
    pub seed: u64,
}

impl Default for PbsCfg {
    fn default() -> Self {
        Self {
            max_missing: 0,
            policy: SelectPolicy::CostWeighted,
            timeout: Duration::from_secs(960),
            per_pipe_timeout: Duration::from_secs(180),
            cost: CostCfg::default(),
            seed: 0,
        }
    }
}

/// Counters accumulated during one `solve` call.
#[derive(Clone, Copy, Debug, Default)]
pub struct SearchStats {
    pub nodes_expanded: usize,
    pub max_depth: usize,
    pub elapsed: Duration,
}

/// Result of a `solve` call: the best plan seen plus search counters.
#[derive(Clone, Debug)]
pub struct Outcome {
    pub plan: Plan,
    pub stats: SearchStats,
}
