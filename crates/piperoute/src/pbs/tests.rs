use std::time::Duration;

use super::{solve, CtNode, PbsCfg};
use crate::cfg::CostCfg;
use crate::conflict::{self, SelectPolicy};
use crate::fix_order;
use crate::grid::{voxel, Environment, Obstacle, ObstacleKind};
use crate::pipe::Pipe;
use crate::plan::Plan;
use crate::priority::PriorityConstraint;
use crate::quality;

fn cfg() -> PbsCfg {
    PbsCfg {
        timeout: Duration::from_secs(30),
        per_pipe_timeout: Duration::from_secs(10),
        ..PbsCfg::default()
    }
}

/// Two unit-diameter pipes crossing head-height in a two-layer volume; the
/// conflict is resolvable by hopping one pipe over the other.
fn crossing_instance() -> (Environment, Vec<Pipe>) {
    let env = Environment::new(voxel(5, 5, 2));
    let pipes = vec![
        Pipe::new(0, voxel(0, 2, 0), voxel(4, 2, 0), 1.0),
        Pipe::new(1, voxel(2, 0, 0), voxel(2, 4, 0), 1.0),
    ];
    (env, pipes)
}

/// A single one-cell-wide corridor both pipes need; only one can have it.
fn corridor_instance() -> (Environment, Vec<Pipe>) {
    let mut env = Environment::new(voxel(3, 3, 1));
    env.add_obstacle(Obstacle::new(
        "south-wall",
        ObstacleKind::Physical,
        voxel(0, 0, 0),
        voxel(2, 0, 0),
    ));
    env.add_obstacle(Obstacle::new(
        "north-wall",
        ObstacleKind::Physical,
        voxel(0, 2, 0),
        voxel(2, 2, 0),
    ));
    let pipes = vec![
        Pipe::new(0, voxel(0, 1, 0), voxel(2, 1, 0), 1.0),
        Pipe::new(1, voxel(2, 1, 0), voxel(0, 1, 0), 1.0),
    ];
    (env, pipes)
}

fn paths_of(plan: &Plan) -> Vec<Option<Vec<crate::grid::Voxel>>> {
    plan.pipes()
        .iter()
        .map(|p| p.path().map(|path| path.to_vec()))
        .collect()
}

#[test]
fn crossing_conflict_is_resolved() {
    let (mut env, pipes) = crossing_instance();
    let outcome = solve(&mut env, pipes, &cfg());
    let plan = &outcome.plan;

    assert_eq!(plan.num_missing(), 0);
    assert!(!conflict::has_conflicts(plan));
    // Clearance holds on every vertex pair.
    let a = plan.pipe(0).path().unwrap();
    let b = plan.pipe(1).path().unwrap();
    for &va in a {
        for &vb in b {
            assert!(crate::grid::euclidean(va, vb) >= 1.0);
        }
    }
}

#[test]
fn environment_is_restored_after_a_run() {
    let (mut env, pipes) = crossing_instance();
    let _ = solve(&mut env, pipes, &cfg());
    assert_eq!(env.stats().pipe, 0);
    assert!(env.owner_map_consistent());
}

#[test]
fn corridor_is_infeasible_without_missing_budget() {
    let (mut env, pipes) = corridor_instance();
    let outcome = solve(&mut env, pipes, &cfg());
    // No admissible child exists, so the engine falls back to the
    // (conflicted) independent routing.
    assert_eq!(outcome.plan.num_missing(), 0);
    assert!(conflict::has_conflicts(&outcome.plan));
}

#[test]
fn corridor_is_feasible_with_missing_budget() {
    let (mut env, pipes) = corridor_instance();
    let mp = PbsCfg {
        max_missing: usize::MAX,
        ..cfg()
    };
    let outcome = solve(&mut env, pipes, &mp);
    let plan = &outcome.plan;

    assert_eq!(plan.num_missing(), 1);
    assert!(!conflict::has_conflicts(plan));
    let routed_cost: f64 = plan.routed().map(|p| p.cost()).sum();
    let q = plan.quality();
    assert_eq!(q.num_missing, 1);
    assert_eq!(q.total_cost, routed_cost);
}

#[test]
fn runs_are_deterministic_under_a_fixed_seed() {
    // Four mutually crossing pipes give the selection RNG real choices.
    let build = || {
        let env = Environment::new(voxel(7, 7, 2));
        let pipes = vec![
            Pipe::new(0, voxel(0, 3, 0), voxel(6, 3, 0), 1.0),
            Pipe::new(1, voxel(3, 0, 0), voxel(3, 6, 0), 1.0),
            Pipe::new(2, voxel(0, 1, 0), voxel(6, 1, 0), 1.0),
            Pipe::new(3, voxel(1, 0, 0), voxel(1, 6, 0), 1.0),
        ];
        (env, pipes)
    };
    for policy in [SelectPolicy::Uniform, SelectPolicy::CostWeighted] {
        let run = |seed: u64| {
            let (mut env, pipes) = build();
            let c = PbsCfg {
                seed,
                policy,
                ..cfg()
            };
            solve(&mut env, pipes, &c)
        };
        let first = run(42);
        let second = run(42);
        assert_eq!(paths_of(&first.plan), paths_of(&second.plan));
        assert_eq!(first.stats.nodes_expanded, second.stats.nodes_expanded);
    }
}

#[test]
fn corridor_outcome_is_deterministic() {
    let run = || {
        let (mut env, pipes) = corridor_instance();
        let mp = PbsCfg {
            max_missing: usize::MAX,
            seed: 9,
            ..cfg()
        };
        solve(&mut env, pipes, &mp)
    };
    assert_eq!(paths_of(&run().plan), paths_of(&run().plan));
}

#[test]
fn expired_budget_returns_the_independent_routing() {
    let (mut env, pipes) = crossing_instance();
    let zero = PbsCfg {
        timeout: Duration::ZERO,
        ..cfg()
    };
    let outcome = solve(&mut env, pipes, &zero);
    // The root is popped but the deadline check fires first; the fallback is
    // the independent routing, conflicts included.
    assert_eq!(outcome.plan.num_missing(), 0);
    assert!(conflict::has_conflicts(&outcome.plan));
    assert_eq!(env.stats().pipe, 0);
}

#[test]
fn fix_order_never_beats_the_tree_search() {
    let (mut env, pipes) = crossing_instance();
    let fix_plan = fix_order::solve(
        &mut env,
        pipes.clone(),
        &CostCfg::default(),
        Duration::from_secs(10),
    );
    let pbs_outcome = solve(&mut env, pipes, &cfg());
    assert!(!quality::is_better(&fix_plan, &pbs_outcome.plan));
}

#[test]
fn child_nodes_extend_constraints_and_depth() {
    let plan = Plan::new(vec![
        Pipe::new(0, voxel(0, 0, 0), voxel(1, 0, 0), 1.0),
        Pipe::new(1, voxel(0, 1, 0), voxel(1, 1, 0), 1.0),
    ]);
    let root = CtNode::root(plan.clone());
    assert_eq!(root.depth, 0);
    assert!(root.constraints.is_empty());

    let child = root.child(plan.clone(), PriorityConstraint::new(0, 1));
    assert_eq!(child.depth, 1);
    assert!(child.constraints.contains(PriorityConstraint::new(0, 1)));
    assert!(root.constraints.is_empty());

    let grandchild = child.child(plan, PriorityConstraint::new(1, 0));
    assert_eq!(grandchild.depth, 2);
    assert!(!grandchild.constraints.is_consistent());
}
