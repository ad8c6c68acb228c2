//! Voxelized routing environment: dense occupancy plus a pipe-owner map.
//!
//! The grid is the single shared mutable resource of the solver. Only the
//! low-level router writes pipe cells, always in balanced mark/unmark pairs,
//! so after every public call the pipe cells are exactly the union of the
//! currently marked pipes' paths.

use std::collections::HashMap;

use super::obstacle::Obstacle;
use super::types::{CellState, Voxel, UNIT_STEPS};
use crate::pipe::Pipe;

/// Cell-count summary of the grid, for diagnostics and banners.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridStats {
    pub total: usize,
    pub free: usize,
    pub obstacle: usize,
    pub pipe: usize,
}

/// Bounded 3D voxel grid with cuboidal obstacles.
#[derive(Clone, Debug)]
pub struct Environment {
    size: Voxel,
    cells: Vec<CellState>,
    /// Pipe-occupied voxel -> owning pipe id. Keys are exactly the cells in
    /// state `Pipe`.
    owner: HashMap<Voxel, usize>,
    obstacles: Vec<Obstacle>,
}

impl Environment {
    /// Empty environment of `size` voxels per axis. All components must be
    /// positive.
    pub fn new(size: Voxel) -> Self {
        assert!(
            size.x > 0 && size.y > 0 && size.z > 0,
            "environment must have positive extent"
        );
        let total = (size.x * size.y * size.z) as usize;
        Self {
            size,
            cells: vec![CellState::Free; total],
            owner: HashMap::new(),
            obstacles: Vec::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> Voxel {
        self.size
    }

    #[inline]
    pub fn in_bounds(&self, v: Voxel) -> bool {
        (0..self.size.x).contains(&v.x)
            && (0..self.size.y).contains(&v.y)
            && (0..self.size.z).contains(&v.z)
    }

    #[inline]
    fn idx(&self, v: Voxel) -> usize {
        debug_assert!(self.in_bounds(v));
        (v.x + self.size.x * (v.y + self.size.y * v.z)) as usize
    }

    /// True iff `v` is in bounds and neither an obstacle nor a pipe cell.
    #[inline]
    pub fn is_free(&self, v: Voxel) -> bool {
        self.in_bounds(v) && self.cells[self.idx(v)] == CellState::Free
    }

    #[inline]
    pub fn state(&self, v: Voxel) -> Option<CellState> {
        self.in_bounds(v).then(|| self.cells[self.idx(v)])
    }

    /// Registers the obstacle and blocks its cells. Out-of-bounds portions of
    /// the cuboid are ignored.
    pub fn add_obstacle(&mut self, obstacle: Obstacle) {
        for cell in obstacle.cells() {
            if self.in_bounds(cell) {
                let i = self.idx(cell);
                debug_assert!(
                    self.cells[i] != CellState::Pipe,
                    "obstacles must be added before any pipe is marked"
                );
                self.cells[i] = CellState::Obstacle;
            }
        }
        self.obstacles.push(obstacle);
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Id of the pipe currently occupying `v`, if any.
    #[inline]
    pub fn occupying_pipe(&self, v: Voxel) -> Option<usize> {
        self.owner.get(&v).copied()
    }

    /// Writes the pipe's path cells into the grid and the owner map.
    /// No-op for unrouted pipes.
    pub fn mark_pipe(&mut self, pipe: &Pipe) {
        let Some(path) = pipe.path() else { return };
        for &v in path {
            if !self.in_bounds(v) {
                continue;
            }
            let i = self.idx(v);
            debug_assert!(
                self.cells[i] != CellState::Obstacle,
                "pipe path through an obstacle cell"
            );
            self.cells[i] = CellState::Pipe;
            self.owner.insert(v, pipe.id);
        }
    }

    /// Reverses `mark_pipe`: clears exactly the cells this pipe currently
    /// owns. Cells since overwritten by another pipe's mark are left to that
    /// pipe.
    pub fn unmark_pipe(&mut self, pipe: &Pipe) {
        let Some(path) = pipe.path() else { return };
        for &v in path {
            if self.owner.get(&v) == Some(&pipe.id) {
                let i = self.idx(v);
                self.cells[i] = CellState::Free;
                self.owner.remove(&v);
            }
        }
    }

    /// Up-to-six in-bounds axis-aligned unit-step neighbors of `v`.
    pub fn neighbors(&self, v: Voxel) -> Vec<Voxel> {
        UNIT_STEPS
            .iter()
            .map(|&(dx, dy, dz)| Voxel::new(v.x + dx, v.y + dy, v.z + dz))
            .filter(|&n| self.in_bounds(n))
            .collect()
    }

    pub fn stats(&self) -> GridStats {
        let mut stats = GridStats {
            total: self.cells.len(),
            free: 0,
            obstacle: 0,
            pipe: 0,
        };
        for cell in &self.cells {
            match cell {
                CellState::Free => stats.free += 1,
                CellState::Obstacle => stats.obstacle += 1,
                CellState::Pipe => stats.pipe += 1,
            }
        }
        stats
    }

    /// Owner-map consistency check: the owner keys are exactly the cells in
    /// state `Pipe`. Used by tests and debug assertions.
    pub fn owner_map_consistent(&self) -> bool {
        let pipe_cells = self
            .cells
            .iter()
            .filter(|&&c| c == CellState::Pipe)
            .count();
        pipe_cells == self.owner.len()
            && self
                .owner
                .keys()
                .all(|&v| self.state(v) == Some(CellState::Pipe))
    }
}
