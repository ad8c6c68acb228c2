//! JSON instance loading and result writing.
//!
//! Instances are authored in meters; every coordinate is floor-divided by
//! `grid_resolution` to obtain integer voxel coordinates. Geometric
//! validation happens here so the core can assume well-formed input. A start
//! or goal sitting inside an obstacle is deliberately not a load error: the
//! engine reports that pipe as unroutable instead.

use anyhow::{bail, ensure, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::Path;

use piperoute::grid::{voxel, Environment, Obstacle, ObstacleKind, Voxel};
use piperoute::pipe::Pipe;
use piperoute::plan::Plan;

#[derive(Debug, Deserialize)]
struct InstanceFile {
    #[serde(default)]
    name: Option<String>,
    bounding_box: [f64; 3],
    #[serde(default = "default_resolution")]
    grid_resolution: f64,
    #[serde(default)]
    obstacles: Vec<ObstacleSpec>,
    pipes: Vec<PipeSpec>,
}

fn default_resolution() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
struct ObstacleSpec {
    name: String,
    #[serde(rename = "type", default)]
    kind: KindSpec,
    min_corner: [f64; 3],
    max_corner: [f64; 3],
}

#[derive(Debug, Default, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
enum KindSpec {
    #[default]
    Physical,
    Logical,
}

impl From<KindSpec> for ObstacleKind {
    fn from(kind: KindSpec) -> Self {
        match kind {
            KindSpec::Physical => ObstacleKind::Physical,
            KindSpec::Logical => ObstacleKind::Logical,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PipeSpec {
    #[serde(default)]
    id: Option<usize>,
    start: [f64; 3],
    goal: [f64; 3],
    diameter: f64,
}

/// Parsed instance: the environment with obstacles marked, plus the pipes in
/// id order.
pub struct Instance {
    pub name: Option<String>,
    pub environment: Environment,
    pub pipes: Vec<Pipe>,
}

/// Loads and validates an instance file.
pub fn load(path: &Path) -> Result<Instance> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading instance {}", path.display()))?;
    let file: InstanceFile = serde_json::from_str(&text)
        .with_context(|| format!("parsing instance {}", path.display()))?;
    build(file).with_context(|| format!("validating instance {}", path.display()))
}

fn build(file: InstanceFile) -> Result<Instance> {
    ensure!(
        file.grid_resolution > 0.0,
        "grid_resolution must be positive, got {}",
        file.grid_resolution
    );
    ensure!(
        file.bounding_box.iter().all(|&b| b > 0.0),
        "bounding_box extents must be positive, got {:?}",
        file.bounding_box
    );

    let res = file.grid_resolution;
    let size = to_voxel(file.bounding_box, res);
    ensure!(
        size.x > 0 && size.y > 0 && size.z > 0,
        "bounding_box {:?} collapses to an empty grid at resolution {res}",
        file.bounding_box
    );
    let mut environment = Environment::new(size);

    for spec in file.obstacles {
        let min_corner = to_voxel(spec.min_corner, res);
        let mut max_corner = to_voxel(spec.max_corner, res);
        ensure!(
            min_corner.x <= max_corner.x
                && min_corner.y <= max_corner.y
                && min_corner.z <= max_corner.z,
            "obstacle '{}' has inverted corners",
            spec.name
        );
        ensure!(
            environment.in_bounds(min_corner),
            "obstacle '{}' lies outside the bounding box",
            spec.name
        );
        // A corner flush with the far wall converts to one voxel past the
        // inclusive range; clamp it to the grid.
        max_corner.x = max_corner.x.min(size.x - 1);
        max_corner.y = max_corner.y.min(size.y - 1);
        max_corner.z = max_corner.z.min(size.z - 1);
        environment.add_obstacle(Obstacle::new(spec.name, spec.kind.into(), min_corner, max_corner));
    }

    let mut pipes = Vec::with_capacity(file.pipes.len());
    for (index, spec) in file.pipes.into_iter().enumerate() {
        if let Some(id) = spec.id {
            ensure!(id == index, "pipe id {id} does not match its position {index}");
        }
        ensure!(
            spec.diameter > 0.0,
            "pipe {index} has non-positive diameter {}",
            spec.diameter
        );
        let start = to_voxel(spec.start, res);
        let goal = to_voxel(spec.goal, res);
        for (label, point) in [("start", start), ("goal", goal)] {
            if !environment.in_bounds(point) {
                bail!(
                    "pipe {index} {label} ({}, {}, {}) is outside the bounding box",
                    point.x,
                    point.y,
                    point.z
                );
            }
        }
        pipes.push(Pipe::new(index, start, goal, spec.diameter));
    }

    Ok(Instance {
        name: file.name,
        environment,
        pipes,
    })
}

fn to_voxel(point: [f64; 3], resolution: f64) -> Voxel {
    voxel(
        (point[0] / resolution).floor() as i64,
        (point[1] / resolution).floor() as i64,
        (point[2] / resolution).floor() as i64,
    )
}

/// Writes the routed paths as `{ "<pipe id>": [[x, y, z], ...], ... }` in
/// voxel units. Unrouted pipes are omitted; the visualizer consumes this.
pub fn write_result(path: &Path, plan: &Plan) -> Result<()> {
    let mut doc = serde_json::Map::new();
    for pipe in plan.routed() {
        let vertices: Vec<_> = pipe
            .path()
            .unwrap()
            .iter()
            .map(|v| json!([v.x, v.y, v.z]))
            .collect();
        doc.insert(pipe.id.to_string(), json!(vertices));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating result dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(&serde_json::Value::Object(doc))?)
        .with_context(|| format!("writing result {}", path.display()))?;
    Ok(())
}

/// Built-in demo instance: four equipment blocks, one reserved access lane,
/// and eight pipes at mixed elevations.
pub fn sample() -> serde_json::Value {
    json!({
        "name": "small",
        "bounding_box": [11, 10, 12],
        "grid_resolution": 0.5,
        "obstacles": [
            {"name": "Equipment-1", "type": "physical", "min_corner": [2, 2, 0], "max_corner": [4, 4, 3]},
            {"name": "Equipment-2", "type": "physical", "min_corner": [6, 2, 0], "max_corner": [8, 4, 3]},
            {"name": "Equipment-3", "type": "physical", "min_corner": [2, 6, 0], "max_corner": [4, 8, 3]},
            {"name": "Equipment-4", "type": "physical", "min_corner": [6, 6, 0], "max_corner": [8, 8, 3]},
            {"name": "Access-Zone-1", "type": "logical", "min_corner": [4.5, 0, 0], "max_corner": [5.5, 10, 2]}
        ],
        "pipes": [
            {"id": 0, "start": [2.5, 2, 3.5], "goal": [6.5, 6, 3.5], "diameter": 1.0},
            {"id": 1, "start": [7.5, 2, 3.5], "goal": [2.5, 7, 3.5], "diameter": 1.0},
            {"id": 2, "start": [3, 1, 0], "goal": [7, 9, 0], "diameter": 0.5},
            {"id": 3, "start": [3, 9, 0], "goal": [7, 1, 0], "diameter": 0.5},
            {"id": 4, "start": [1, 1, 1], "goal": [9, 9, 1], "diameter": 0.75},
            {"id": 5, "start": [1, 9, 1], "goal": [9, 1, 1], "diameter": 0.75},
            {"id": 6, "start": [2, 5, 2.5], "goal": [8, 5, 2.5], "diameter": 0.6},
            {"id": 7, "start": [5, 2, 2.5], "goal": [5, 8, 2.5], "diameter": 0.6}
        ]
    })
}

/// Writes the demo instance to `path`.
pub fn write_sample(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating instance dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(&sample())?)
        .with_context(|| format!("writing sample instance {}", path.display()))?;
    Ok(())
}
