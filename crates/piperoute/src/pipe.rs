//! A single connection request and its routed path attributes.

use crate::cfg::CostCfg;
use crate::grid::types::{euclidean, manhattan, step_axis, Voxel};

/// Derived quantities of a routed path.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathAttrs {
    /// Sum of per-step Euclidean distances (equals Manhattan length on
    /// axis-aligned paths).
    pub length: f64,
    /// Interior vertices where the incoming and outgoing axes differ.
    pub num_bends: usize,
    pub cost: f64,
}

/// A pipe: endpoints, physical diameter, and the currently assigned path.
///
/// The id doubles as the pipe's position in a [`Plan`](crate::plan::Plan);
/// endpoints and diameter are immutable after construction, only the path
/// changes during search.
#[derive(Clone, Debug)]
pub struct Pipe {
    pub id: usize,
    pub start: Voxel,
    pub goal: Voxel,
    pub diameter: f64,
    path: Option<Vec<Voxel>>,
    attrs: Option<PathAttrs>,
}

impl Pipe {
    pub fn new(id: usize, start: Voxel, goal: Voxel, diameter: f64) -> Self {
        debug_assert!(diameter > 0.0, "pipe diameter must be positive");
        Self {
            id,
            start,
            goal,
            diameter,
            path: None,
            attrs: None,
        }
    }

    #[inline]
    pub fn path(&self) -> Option<&[Voxel]> {
        self.path.as_deref()
    }

    #[inline]
    pub fn has_path(&self) -> bool {
        self.path.is_some()
    }

    #[inline]
    pub fn attrs(&self) -> Option<&PathAttrs> {
        self.attrs.as_ref()
    }

    /// Cost of the current path; ∞ when unrouted.
    #[inline]
    pub fn cost(&self) -> f64 {
        self.attrs.map_or(f64::INFINITY, |a| a.cost)
    }

    /// Manhattan span times diameter; the routing-difficulty estimate used to
    /// order pipes before any path exists.
    #[inline]
    pub fn span_estimate(&self) -> f64 {
        manhattan(self.start, self.goal) as f64 * self.diameter
    }

    /// Assigns (or clears) the path and recomputes the derived attributes.
    pub fn set_path(&mut self, path: Option<Vec<Voxel>>, cost: &CostCfg) {
        self.attrs = path.as_deref().map(|p| {
            debug_assert_eq!(p.first(), Some(&self.start), "path must begin at start");
            debug_assert_eq!(p.last(), Some(&self.goal), "path must end at goal");
            path_attrs(p, self.diameter, cost)
        });
        self.path = path;
    }
}

/// Evaluates length, bends, and cost of an axis-aligned path.
///
/// `cost = length * diameter + bend_weight * bends + height_weight * avg_z * bends`.
/// A single-vertex path (start == goal) is a valid zero-cost route.
pub fn path_attrs(path: &[Voxel], diameter: f64, cost: &CostCfg) -> PathAttrs {
    let length: f64 = path.windows(2).map(|w| euclidean(w[0], w[1])).sum();
    let num_bends = count_bends(path);
    let avg_z = if path.is_empty() {
        0.0
    } else {
        path.iter().map(|v| v.z as f64).sum::<f64>() / path.len() as f64
    };
    PathAttrs {
        length,
        num_bends,
        cost: length * diameter
            + cost.bend_weight * num_bends as f64
            + cost.height_weight * avg_z * num_bends as f64,
    }
}

/// Number of interior vertices where the path changes axis.
pub fn count_bends(path: &[Voxel]) -> usize {
    if path.len() < 3 {
        return 0;
    }
    let mut bends = 0;
    for w in path.windows(3) {
        let incoming = step_axis(w[0], w[1]);
        let outgoing = step_axis(w[1], w[2]);
        if incoming != outgoing {
            bends += 1;
        }
    }
    bends
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::voxel;

    fn cfg() -> CostCfg {
        CostCfg::default()
    }

    #[test]
    fn straight_path_has_no_bends() {
        let path = vec![voxel(0, 0, 0), voxel(1, 0, 0), voxel(2, 0, 0)];
        let attrs = path_attrs(&path, 1.0, &cfg());
        assert_eq!(attrs.num_bends, 0);
        assert!((attrs.length - 2.0).abs() < 1e-12);
        assert!((attrs.cost - 2.0).abs() < 1e-12);
    }

    #[test]
    fn l_shape_counts_one_bend() {
        let path = vec![
            voxel(0, 0, 0),
            voxel(1, 0, 0),
            voxel(2, 0, 0),
            voxel(2, 1, 0),
            voxel(2, 2, 0),
        ];
        let attrs = path_attrs(&path, 1.0, &cfg());
        assert_eq!(attrs.num_bends, 1);
        assert!((attrs.length - 4.0).abs() < 1e-12);
        // length * diameter + one bend at z = 0
        assert!((attrs.cost - (4.0 + 100.0)).abs() < 1e-12);
    }

    #[test]
    fn elevated_bends_pay_height_penalty() {
        let path = vec![
            voxel(0, 0, 4),
            voxel(1, 0, 4),
            voxel(1, 1, 4),
        ];
        let attrs = path_attrs(&path, 2.0, &cfg());
        assert_eq!(attrs.num_bends, 1);
        // 2.0 * 2.0 + 100 * 1 + 10 * 4.0 * 1
        assert!((attrs.cost - (4.0 + 100.0 + 40.0)).abs() < 1e-12);
    }

    #[test]
    fn single_vertex_path_is_free() {
        let mut pipe = Pipe::new(0, voxel(1, 1, 1), voxel(1, 1, 1), 1.0);
        pipe.set_path(Some(vec![voxel(1, 1, 1)]), &cfg());
        let attrs = pipe.attrs().unwrap();
        assert_eq!(attrs.num_bends, 0);
        assert_eq!(attrs.length, 0.0);
        assert_eq!(attrs.cost, 0.0);
    }

    #[test]
    fn unrouted_pipe_costs_infinity() {
        let pipe = Pipe::new(0, voxel(0, 0, 0), voxel(3, 0, 0), 1.0);
        assert!(pipe.cost().is_infinite());
        assert!(!pipe.has_path());
    }

    #[test]
    fn clearing_a_path_resets_attrs() {
        let mut pipe = Pipe::new(0, voxel(0, 0, 0), voxel(1, 0, 0), 1.0);
        pipe.set_path(Some(vec![voxel(0, 0, 0), voxel(1, 0, 0)]), &cfg());
        assert!(pipe.cost().is_finite());
        pipe.set_path(None, &cfg());
        assert!(pipe.cost().is_infinite());
        assert!(pipe.attrs().is_none());
    }
}
