//! Voxel grid, obstacles, and the shared routing environment.
//!
//! Purpose
//! - Represent the bounded 3D volume at voxel resolution with a dense
//!   occupancy classification (free / obstacle / pipe).
//! - Provide the 6-neighbor expansion and the mark/unmark bracket the
//!   low-level router relies on.
//!
//! Code cross-refs: `Environment`, `Obstacle`, `types::{Voxel, Axis}`

mod env;
mod obstacle;
pub mod types;

pub use env::{Environment, GridStats};
pub use obstacle::{Obstacle, ObstacleKind};
pub use types::{
    euclidean, is_axis_aligned_unit_path, manhattan, step_axis, voxel, Axis, CellState, Voxel,
};

#[cfg(test)]
mod tests;
