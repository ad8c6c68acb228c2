//! Priority-based search: depth-first exploration of the conflict tree.

use std::time::Instant;

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::astar;
use crate::conflict;
use crate::grid::Environment;
use crate::pipe::Pipe;
use crate::plan::Plan;
use crate::priority::PriorityConstraint;

use super::types::{CtNode, Outcome, PbsCfg, SearchStats};

/// Solve the multi-pipe instance with priority-based search.
///
/// Roots the conflict tree at the independent routing, then repeatedly picks
/// a conflicting pair, branches on the two priority orderings, and re-plans
/// the lower pipe. Returns the best plan seen; with no accepted incumbent
/// that is the independent routing itself.
pub fn solve(env: &mut Environment, pipes: Vec<Pipe>, cfg: &PbsCfg) -> Outcome {
    PbsRunner::new(env, cfg).solve(pipes)
}

/// DFS runner carrying shared context and accumulators.
struct PbsRunner<'a> {
    env: &'a mut Environment,
    cfg: &'a PbsCfg,
    rng: StdRng,
    best: Option<Plan>,
    stats: SearchStats,
}

impl<'a> PbsRunner<'a> {
    fn new(env: &'a mut Environment, cfg: &'a PbsCfg) -> Self {
        Self {
            env,
            cfg,
            rng: StdRng::seed_from_u64(cfg.seed),
            best: None,
            stats: SearchStats::default(),
        }
    }

    fn solve(mut self, pipes: Vec<Pipe>) -> Outcome {
        let started = Instant::now();
        let deadline = started + self.cfg.timeout;

        let root_plan = self.independent_routing(pipes);
        tracing::info!(
            routed = root_plan.num_routed(),
            total = root_plan.num_pipes(),
            "independent routing complete"
        );

        let mut stack = vec![CtNode::root(root_plan.clone())];
        while let Some(node) = stack.pop() {
            if Instant::now() >= deadline {
                break;
            }
            self.stats.nodes_expanded += 1;
            self.stats.max_depth = self.stats.max_depth.max(node.depth);
            if self.stats.nodes_expanded % 64 == 0 {
                tracing::debug!(
                    nodes = self.stats.nodes_expanded,
                    depth = node.depth,
                    stack = stack.len(),
                    "expanding"
                );
            }

            // Prune anything the incumbent already dominates (or ties).
            if let Some(best) = &self.best {
                if !node.plan.is_better_than(best) {
                    continue;
                }
            }

            if !conflict::has_conflicts(&node.plan) {
                if node.plan.num_missing() <= self.cfg.max_missing {
                    let quality = node.plan.quality();
                    tracing::info!(
                        missing = quality.num_missing,
                        cost = quality.total_cost,
                        depth = node.depth,
                        "new incumbent"
                    );
                    self.best = Some(node.plan);
                }
                continue;
            }

            let mut children = self.branch(&node);
            // Worse child first, so the LIFO stack explores the better one.
            children.sort_by(|a, b| b.plan.quality().cmp(&a.plan.quality()));
            stack.extend(children);
        }

        self.stats.elapsed = started.elapsed();
        tracing::info!(
            nodes = self.stats.nodes_expanded,
            max_depth = self.stats.max_depth,
            "search finished"
        );
        Outcome {
            plan: self.best.take().unwrap_or(root_plan),
            stats: self.stats,
        }
    }

    /// Routes every pipe against obstacles only, ignoring all other pipes.
    fn independent_routing(&mut self, mut pipes: Vec<Pipe>) -> Plan {
        for pipe in &mut pipes {
            let path = astar::route(self.env, pipe, &[], &self.cfg.cost, self.cfg.per_pipe_timeout);
            pipe.set_path(path, &self.cfg.cost);
        }
        Plan::new(pipes)
    }

    /// Tries both priority orderings of the selected conflict and returns the
    /// admissible children.
    fn branch(&mut self, node: &CtNode) -> Vec<CtNode> {
        let Some(picked) = conflict::select(&node.plan, self.cfg.policy, &mut self.rng) else {
            return Vec::new();
        };
        let mut children = Vec::new();
        for (higher, lower) in [
            (picked.first, picked.second),
            (picked.second, picked.first),
        ] {
            let constraint = PriorityConstraint::new(higher, lower);
            let mut constraints = node.constraints.clone();
            constraints.add(constraint);
            if !constraints.is_consistent() {
                // This ordering would close a priority cycle.
                continue;
            }

            let mut child_plan = node.plan.clone();
            let new_path = {
                let obstacles: Vec<&Pipe> = constraints
                    .ancestors_of(lower)
                    .into_iter()
                    .map(|id| child_plan.pipe(id))
                    .filter(|p| p.has_path())
                    .collect();
                astar::route(
                    self.env,
                    child_plan.pipe(lower),
                    &obstacles,
                    &self.cfg.cost,
                    self.cfg.per_pipe_timeout,
                )
            };
            child_plan.pipe_mut(lower).set_path(new_path, &self.cfg.cost);

            if child_plan.num_missing() <= self.cfg.max_missing {
                children.push(CtNode {
                    plan: child_plan,
                    constraints,
                    depth: node.depth + 1,
                });
            }
        }
        children
    }
}
