use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::fmt::SubscriberBuilder;

use piperoute::cfg::CostCfg;
use piperoute::conflict::SelectPolicy;
use piperoute::pbs::{self, PbsCfg};
use piperoute::plan::Plan;
use piperoute::{fix_order, quality};

mod instance;

#[derive(Parser)]
#[command(name = "piperoute")]
#[command(about = "3D multi-pipe routing with priority-based search")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand)]
enum Action {
    /// Solve an instance and report the resulting plan
    Solve {
        /// Instance JSON file
        #[arg(long)]
        instance: PathBuf,
        #[arg(long, value_enum, default_value_t = Algorithm::Pbs)]
        algorithm: Algorithm,
        /// Conflict selection: 1 = uniform, 2 = cost-weighted
        #[arg(long, default_value_t = 2)]
        conflict_policy: u8,
        /// Global budget in seconds
        #[arg(long, default_value_t = 960)]
        timeout: u64,
        /// Budget of one low-level routing call, in seconds
        #[arg(long, default_value_t = 180)]
        per_pipe_timeout: u64,
        /// Seed of the conflict-selection RNG
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Where to write the routed paths as JSON
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the built-in demo instance
    Sample {
        #[arg(long)]
        out: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Algorithm {
    /// Route once in a fixed priority order
    FixOrder,
    /// Priority-based search, every pipe must be routed
    Pbs,
    /// Priority-based search with an unlimited missing-pipe budget
    PbsMp,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Solve {
            instance,
            algorithm,
            conflict_policy,
            timeout,
            per_pipe_timeout,
            seed,
            out,
        } => solve(
            instance,
            algorithm,
            conflict_policy,
            timeout,
            per_pipe_timeout,
            seed,
            out,
        ),
        Action::Sample { out } => {
            instance::write_sample(&out)?;
            println!("sample instance written to {}", out.display());
            Ok(())
        }
    }
}

fn solve(
    path: PathBuf,
    algorithm: Algorithm,
    conflict_policy: u8,
    timeout: u64,
    per_pipe_timeout: u64,
    seed: u64,
    out: Option<PathBuf>,
) -> Result<()> {
    let policy = match conflict_policy {
        1 => SelectPolicy::Uniform,
        2 => SelectPolicy::CostWeighted,
        other => bail!("unknown conflict policy {other}, expected 1 or 2"),
    };

    tracing::info!(instance = %path.display(), algorithm = ?algorithm, seed, "solve");
    let loaded = instance::load(&path)?;
    let mut env = loaded.environment;
    let pipes = loaded.pipes;

    let grid = env.stats();
    println!(
        "instance {}: {} pipes, {} obstacles, grid {}x{}x{} ({} cells, {:.1}% blocked)",
        loaded.name.as_deref().unwrap_or("unnamed"),
        pipes.len(),
        env.obstacles().len(),
        env.size().x,
        env.size().y,
        env.size().z,
        grid.total,
        100.0 * grid.obstacle as f64 / grid.total as f64,
    );

    let per_pipe = Duration::from_secs(per_pipe_timeout);
    let plan = match algorithm {
        Algorithm::FixOrder => fix_order::solve(&mut env, pipes, &CostCfg::default(), per_pipe),
        Algorithm::Pbs | Algorithm::PbsMp => {
            let cfg = PbsCfg {
                max_missing: match algorithm {
                    Algorithm::PbsMp => usize::MAX,
                    _ => 0,
                },
                policy,
                timeout: Duration::from_secs(timeout),
                per_pipe_timeout: per_pipe,
                cost: CostCfg::default(),
                seed,
            };
            let outcome = pbs::solve(&mut env, pipes, &cfg);
            println!(
                "search: {} nodes, max depth {}, {:.1}s",
                outcome.stats.nodes_expanded,
                outcome.stats.max_depth,
                outcome.stats.elapsed.as_secs_f64(),
            );
            outcome.plan
        }
    };

    report(&plan);
    if let Some(out) = out {
        instance::write_result(&out, &plan)?;
        println!("routed paths written to {}", out.display());
    }
    Ok(())
}

fn report(plan: &Plan) {
    let q = plan.quality();
    println!(
        "quality: missing = {}, total cost = {}",
        q.num_missing,
        if q.total_cost.is_finite() {
            format!("{:.1}", q.total_cost)
        } else {
            "inf".to_string()
        },
    );

    for pipe in plan.routed() {
        let attrs = pipe.attrs().expect("routed pipe has attributes");
        println!(
            "  pipe {}: length {:.1}, bends {}, cost {:.1}",
            pipe.id, attrs.length, attrs.num_bends, attrs.cost,
        );
    }
    for pipe in plan.missing() {
        println!(
            "  pipe {}: no path ({},{},{}) -> ({},{},{})",
            pipe.id, pipe.start.x, pipe.start.y, pipe.start.z, pipe.goal.x, pipe.goal.y, pipe.goal.z,
        );
    }

    let m = quality::metrics(plan);
    if m.num_routed > 0 {
        println!(
            "routed {}/{}: avg length {:.2}, avg bends {:.2}, avg cost {:.2}",
            m.num_routed, m.num_pipes, m.avg_length, m.avg_bends, m.avg_cost,
        );
    } else {
        println!("routed 0/{}", m.num_pipes);
    }
}
