//! Fixed-order baseline: route once, in a static priority order.
//!
//! Pipes are sorted by `manhattan(start, goal) * diameter` descending, so the
//! bulkiest runs claim space first. Each successfully routed pipe becomes a
//! permanent obstacle for everything after it. No backtracking.

use std::time::Duration;

use crate::astar;
use crate::cfg::CostCfg;
use crate::grid::Environment;
use crate::pipe::Pipe;
use crate::plan::Plan;

pub fn solve(
    env: &mut Environment,
    mut pipes: Vec<Pipe>,
    cost: &CostCfg,
    per_pipe_timeout: Duration,
) -> Plan {
    let mut order: Vec<usize> = (0..pipes.len()).collect();
    order.sort_by(|&a, &b| pipes[b].span_estimate().total_cmp(&pipes[a].span_estimate()));

    let mut routed_ids: Vec<usize> = Vec::new();
    for id in order {
        let path = {
            let obstacles: Vec<&Pipe> = routed_ids.iter().map(|&i| &pipes[i]).collect();
            astar::route(env, &pipes[id], &obstacles, cost, per_pipe_timeout)
        };
        let found = path.is_some();
        pipes[id].set_path(path, cost);
        if found {
            tracing::debug!(pipe = id, cost = pipes[id].cost(), "routed");
            routed_ids.push(id);
        } else {
            tracing::debug!(pipe = id, "no path");
        }
    }
    Plan::new(pipes)
}
