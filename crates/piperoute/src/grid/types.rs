//! Basic voxel-grid types and distance helpers.
//!
//! - `Voxel`: integer grid coordinate, the only point type in the core.
//! - `Axis`: which coordinate a unit step moves along; bends are counted as
//!   axis changes between consecutive steps.
//! - `CellState`: dense occupancy classification of the grid.

use nalgebra::Vector3;

/// Integer voxel coordinate.
pub type Voxel = Vector3<i64>;

/// Convenience constructor matching the `(x, y, z)` notation used throughout.
#[inline]
pub fn voxel(x: i64, y: i64, z: i64) -> Voxel {
    Vector3::new(x, y, z)
}

/// Occupancy classification of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellState {
    Free,
    Obstacle,
    Pipe,
}

/// Coordinate axis of a unit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Axis along which `a` and `b` differ, or `None` for identical points.
///
/// Meaningful for axis-aligned steps; for diagonal pairs the lowest differing
/// axis wins.
#[inline]
pub fn step_axis(a: Voxel, b: Voxel) -> Option<Axis> {
    if a.x != b.x {
        Some(Axis::X)
    } else if a.y != b.y {
        Some(Axis::Y)
    } else if a.z != b.z {
        Some(Axis::Z)
    } else {
        None
    }
}

/// Manhattan distance.
#[inline]
pub fn manhattan(a: Voxel, b: Voxel) -> i64 {
    (a.x - b.x).abs() + (a.y - b.y).abs() + (a.z - b.z).abs()
}

/// Euclidean distance. Equals the Manhattan distance on axis-aligned steps.
#[inline]
pub fn euclidean(a: Voxel, b: Voxel) -> f64 {
    let d = a - b;
    ((d.x * d.x + d.y * d.y + d.z * d.z) as f64).sqrt()
}

/// The six axis-aligned unit offsets as `(dx, dy, dz)`.
pub const UNIT_STEPS: [(i64, i64, i64); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

/// True iff every consecutive pair of `path` is a unit step along one axis.
pub fn is_axis_aligned_unit_path(path: &[Voxel]) -> bool {
    path.windows(2)
        .all(|w| manhattan(w[0], w[1]) == 1)
}
