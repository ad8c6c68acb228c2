//! Best-first single-pipe routing over the voxel grid.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::time::{Duration, Instant};

use crate::cfg::CostCfg;
use crate::grid::types::{euclidean, manhattan, step_axis, Axis, Voxel};
use crate::grid::Environment;
use crate::pipe::Pipe;

/// Marks a set of pipes on entry and unmarks them on drop, so the grid is
/// restored on every exit path of the search, including timeouts and panics.
struct MarkGuard<'e, 'p> {
    env: &'e mut Environment,
    pipes: &'p [&'p Pipe],
}

impl<'e, 'p> MarkGuard<'e, 'p> {
    fn new(env: &'e mut Environment, pipes: &'p [&'p Pipe]) -> Self {
        for pipe in pipes {
            env.mark_pipe(pipe);
        }
        Self { env, pipes }
    }

    fn env(&self) -> &Environment {
        self.env
    }
}

impl Drop for MarkGuard<'_, '_> {
    fn drop(&mut self) {
        for pipe in self.pipes {
            self.env.unmark_pipe(pipe);
        }
    }
}

/// Open-set entry ordered by ascending f-score (reversed for the max-heap).
#[derive(Clone, Copy, Debug)]
struct OpenEntry {
    f: f64,
    g: f64,
    pos: Voxel,
    last_axis: Option<Axis>,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f.total_cmp(&other.f) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other.f.total_cmp(&self.f)
    }
}

/// Finds a minimum-cost axis-aligned path for `pipe`, treating every routed
/// pipe in `higher` as an obstacle.
///
/// The step cost is `diameter` per unit move plus `bend_penalty` on each axis
/// change; the heuristic is the Manhattan distance to the goal. States are
/// dominance-keyed by position (minimum g), so the result is best-first
/// rather than provably optimal once bend penalties are in play.
///
/// Returns `None` on an empty open set or when `timeout` expires; either way
/// the environment is left exactly as it was on entry.
pub fn route(
    env: &mut Environment,
    pipe: &Pipe,
    higher: &[&Pipe],
    cost: &CostCfg,
    timeout: Duration,
) -> Option<Vec<Voxel>> {
    let deadline = Instant::now() + timeout;
    let guard = MarkGuard::new(env, higher);
    search(guard.env(), pipe, cost, deadline)
}

fn search(
    env: &Environment,
    pipe: &Pipe,
    cost: &CostCfg,
    deadline: Instant,
) -> Option<Vec<Voxel>> {
    let (start, goal) = (pipe.start, pipe.goal);
    if start == goal {
        return env.is_free(start).then(|| vec![start]);
    }
    if !env.is_free(start) || !env.is_free(goal) {
        return None;
    }

    let mut open = BinaryHeap::new();
    let mut g_score: HashMap<Voxel, f64> = HashMap::new();
    let mut came_from: HashMap<Voxel, Voxel> = HashMap::new();
    g_score.insert(start, 0.0);
    open.push(OpenEntry {
        f: manhattan(start, goal) as f64,
        g: 0.0,
        pos: start,
        last_axis: None,
    });

    while let Some(entry) = open.pop() {
        if Instant::now() >= deadline {
            return None;
        }
        if entry.pos == goal {
            return Some(reconstruct(&came_from, start, goal));
        }
        // Stale heap entry: a cheaper arrival at this position was expanded.
        if g_score.get(&entry.pos).is_some_and(|&best| entry.g > best) {
            continue;
        }
        for next in env.neighbors(entry.pos) {
            if !env.is_free(next) {
                continue;
            }
            let axis = step_axis(entry.pos, next);
            let mut move_cost = euclidean(entry.pos, next) * pipe.diameter;
            if entry.last_axis.is_some() && axis != entry.last_axis {
                move_cost += cost.bend_penalty;
            }
            let tentative = entry.g + move_cost;
            if g_score.get(&next).map_or(true, |&best| tentative < best) {
                g_score.insert(next, tentative);
                came_from.insert(next, entry.pos);
                open.push(OpenEntry {
                    f: tentative + manhattan(next, goal) as f64,
                    g: tentative,
                    pos: next,
                    last_axis: axis,
                });
            }
        }
    }
    None
}

fn reconstruct(came_from: &HashMap<Voxel, Voxel>, start: Voxel, goal: Voxel) -> Vec<Voxel> {
    let mut path = vec![goal];
    let mut cur = goal;
    while cur != start {
        cur = came_from[&cur];
        path.push(cur);
    }
    path.reverse();
    path
}
