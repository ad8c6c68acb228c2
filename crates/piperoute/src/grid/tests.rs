use super::*;
use crate::cfg::CostCfg;
use crate::pipe::Pipe;

fn routed(id: usize, path: Vec<Voxel>) -> Pipe {
    let mut p = Pipe::new(id, path[0], *path.last().unwrap(), 1.0);
    p.set_path(Some(path), &CostCfg::default());
    p
}

#[test]
fn fresh_environment_is_all_free() {
    let env = Environment::new(voxel(4, 3, 2));
    let stats = env.stats();
    assert_eq!(stats.total, 24);
    assert_eq!(stats.free, 24);
    assert!(env.is_free(voxel(0, 0, 0)));
    assert!(env.is_free(voxel(3, 2, 1)));
}

#[test]
fn out_of_bounds_is_never_free() {
    let env = Environment::new(voxel(2, 2, 2));
    assert!(!env.is_free(voxel(-1, 0, 0)));
    assert!(!env.is_free(voxel(2, 0, 0)));
    assert!(!env.is_free(voxel(0, 0, 5)));
}

#[test]
fn obstacle_blocks_its_cells() {
    let mut env = Environment::new(voxel(5, 5, 5));
    env.add_obstacle(Obstacle::new(
        "tank",
        ObstacleKind::Physical,
        voxel(1, 1, 1),
        voxel(3, 3, 3),
    ));
    assert_eq!(env.state(voxel(2, 2, 2)), Some(CellState::Obstacle));
    assert!(!env.is_free(voxel(1, 1, 1)));
    assert!(!env.is_free(voxel(3, 3, 3)));
    assert!(env.is_free(voxel(0, 0, 0)));
    assert!(env.is_free(voxel(4, 3, 3)));
    assert_eq!(env.stats().obstacle, 27);
}

#[test]
fn logical_obstacles_block_like_physical() {
    let mut env = Environment::new(voxel(3, 3, 3));
    env.add_obstacle(Obstacle::new(
        "access-zone",
        ObstacleKind::Logical,
        voxel(0, 0, 0),
        voxel(0, 2, 2),
    ));
    assert!(!env.is_free(voxel(0, 1, 1)));
}

#[test]
fn mark_and_unmark_are_inverses() {
    let mut env = Environment::new(voxel(5, 1, 1));
    let pipe = routed(7, (0..5).map(|x| voxel(x, 0, 0)).collect());

    env.mark_pipe(&pipe);
    assert_eq!(env.stats().pipe, 5);
    assert_eq!(env.occupying_pipe(voxel(2, 0, 0)), Some(7));
    assert!(!env.is_free(voxel(2, 0, 0)));
    assert!(env.owner_map_consistent());

    env.unmark_pipe(&pipe);
    assert_eq!(env.stats().pipe, 0);
    assert_eq!(env.occupying_pipe(voxel(2, 0, 0)), None);
    assert!(env.is_free(voxel(2, 0, 0)));
    assert!(env.owner_map_consistent());
}

#[test]
fn unmark_leaves_other_pipes_cells_alone() {
    let mut env = Environment::new(voxel(4, 4, 1));
    let a = routed(0, vec![voxel(0, 0, 0), voxel(1, 0, 0)]);
    let b = routed(1, vec![voxel(1, 0, 0), voxel(1, 1, 0)]);

    // b overwrites the shared cell's owner, so unmarking a must not free it.
    env.mark_pipe(&a);
    env.mark_pipe(&b);
    env.unmark_pipe(&a);
    assert_eq!(env.occupying_pipe(voxel(1, 0, 0)), Some(1));
    assert!(!env.is_free(voxel(1, 0, 0)));

    env.unmark_pipe(&b);
    assert_eq!(env.stats().pipe, 0);
    assert!(env.owner_map_consistent());
}

#[test]
fn unrouted_pipe_marks_nothing() {
    let mut env = Environment::new(voxel(3, 3, 3));
    let pipe = Pipe::new(0, voxel(0, 0, 0), voxel(2, 2, 2), 1.0);
    env.mark_pipe(&pipe);
    assert_eq!(env.stats().pipe, 0);
}

#[test]
fn neighbors_clip_at_the_boundary() {
    let env = Environment::new(voxel(3, 3, 3));
    assert_eq!(env.neighbors(voxel(1, 1, 1)).len(), 6);
    assert_eq!(env.neighbors(voxel(0, 0, 0)).len(), 3);
    assert_eq!(env.neighbors(voxel(2, 2, 2)).len(), 3);
    assert_eq!(env.neighbors(voxel(0, 1, 1)).len(), 5);
}

#[test]
fn step_axis_identifies_the_changed_coordinate() {
    assert_eq!(step_axis(voxel(0, 0, 0), voxel(1, 0, 0)), Some(Axis::X));
    assert_eq!(step_axis(voxel(0, 0, 0), voxel(0, -1, 0)), Some(Axis::Y));
    assert_eq!(step_axis(voxel(0, 0, 0), voxel(0, 0, 2)), Some(Axis::Z));
    assert_eq!(step_axis(voxel(1, 2, 3), voxel(1, 2, 3)), None);
}

#[test]
fn distances_agree_on_axis_aligned_steps() {
    let a = voxel(1, 2, 3);
    let b = voxel(1, 2, 4);
    assert_eq!(manhattan(a, b), 1);
    assert!((euclidean(a, b) - 1.0).abs() < 1e-12);
    let far = voxel(4, 6, 3);
    assert_eq!(manhattan(a, far), 7);
    assert!((euclidean(a, far) - 25.0_f64.sqrt()).abs() < 1e-12);
}

mod properties {
    use super::*;
    use proptest::prelude::*;

    /// Random axis-aligned unit-step path inside a `dim`-sized cube.
    fn arb_path(dim: i64, len: usize) -> impl Strategy<Value = Vec<Voxel>> {
        let start = (0..dim, 0..dim, 0..dim).prop_map(|(x, y, z)| voxel(x, y, z));
        (start, proptest::collection::vec(0..6usize, 0..len)).prop_map(move |(start, steps)| {
            let mut path = vec![start];
            let mut cur = start;
            for s in steps {
                let (dx, dy, dz) = crate::grid::types::UNIT_STEPS[s];
                let next = voxel(cur.x + dx, cur.y + dy, cur.z + dz);
                let inside = (0..dim).contains(&next.x)
                    && (0..dim).contains(&next.y)
                    && (0..dim).contains(&next.z);
                if inside && next != cur {
                    path.push(next);
                    cur = next;
                }
            }
            path
        })
    }

    proptest! {
        #[test]
        fn mark_unmark_restores_occupancy(path in arb_path(6, 32)) {
            let mut env = Environment::new(voxel(6, 6, 6));
            let pipe = routed(0, path);
            env.mark_pipe(&pipe);
            prop_assert!(env.owner_map_consistent());
            env.unmark_pipe(&pipe);
            prop_assert_eq!(env.stats().pipe, 0);
            prop_assert_eq!(env.stats().free, env.stats().total);
            prop_assert!(env.owner_map_consistent());
        }

        #[test]
        fn generated_paths_are_axis_aligned(path in arb_path(6, 32)) {
            prop_assert!(is_axis_aligned_unit_path(&path));
        }
    }
}
