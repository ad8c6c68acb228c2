//! High-level priority-based search over the conflict tree.
//!
//! Purpose
//! - Explore priority orderings of conflicting pipes depth-first, re-planning
//!   the lower-priority pipe of each branch with the low-level router.
//! - Keep the best conflict-free plan found within the missing-pipe budget
//!   and the global wall-clock budget.
//!
//! Code cross-refs: `CtNode`, `PbsCfg`, `dfs::solve`,
//! `crate::conflict::select`, `crate::astar::route`

mod dfs;
mod types;

pub use dfs::solve;
pub use types::{CtNode, Outcome, PbsCfg, SearchStats};

#[cfg(test)]
mod tests;
