//! Multi-pipe routing for plant layout: coupled two-level search over a
//! voxelized 3D volume.
//!
//! The low level routes one pipe at a time with bend-penalized A*; the high
//! level (priority-based search) explores priority orderings of conflicting
//! pipes until the plan is conflict-free within its missing-pipe budget.

pub mod astar;
pub mod cfg;
pub mod conflict;
pub mod fix_order;
pub mod grid;
pub mod pbs;
pub mod pipe;
pub mod plan;
pub mod priority;
pub mod quality;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::CostCfg;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::CostCfg;
    pub use crate::conflict::{Conflict, SelectPolicy};
    pub use crate::grid::{voxel, Environment, Obstacle, ObstacleKind, Voxel};
    pub use crate::pbs::{Outcome, PbsCfg, SearchStats};
    pub use crate::pipe::Pipe;
    pub use crate::plan::{Plan, Quality};
    pub use crate::priority::{ConstraintSet, PriorityConstraint};
}
