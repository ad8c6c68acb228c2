//! Plan quality: comparison helpers and aggregate metrics.

use std::cmp::Ordering;

use crate::plan::{Plan, Quality};

/// Quality tuple of a plan.
pub fn quality(plan: &Plan) -> Quality {
    plan.quality()
}

/// Lexicographic comparison: fewer missing pipes first, then lower cost.
pub fn compare(a: &Plan, b: &Plan) -> Ordering {
    a.quality().cmp(&b.quality())
}

/// True iff `a` is strictly better than `b`.
pub fn is_better(a: &Plan, b: &Plan) -> bool {
    compare(a, b) == Ordering::Less
}

/// Relative cost increase over a baseline, in percent.
/// ∞ when either cost is ∞ or the baseline cost is zero.
pub fn cost_gap(plan: &Plan, baseline: &Plan) -> f64 {
    let base = baseline.total_cost();
    let cost = plan.total_cost();
    if base == 0.0 || base.is_infinite() || cost.is_infinite() {
        return f64::INFINITY;
    }
    (cost / base - 1.0) * 100.0
}

/// Aggregate counts, totals, and per-routed-pipe averages.
#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub num_pipes: usize,
    pub num_routed: usize,
    pub num_missing: usize,
    pub total_cost: f64,
    pub total_length: f64,
    pub total_bends: usize,
    pub avg_cost: f64,
    pub avg_length: f64,
    pub avg_bends: f64,
}

pub fn metrics(plan: &Plan) -> Metrics {
    let num_pipes = plan.num_pipes();
    let num_routed = plan.num_routed();
    if num_routed == 0 {
        return Metrics {
            num_pipes,
            num_routed: 0,
            num_missing: num_pipes,
            total_cost: f64::INFINITY,
            total_length: 0.0,
            total_bends: 0,
            avg_cost: 0.0,
            avg_length: 0.0,
            avg_bends: 0.0,
        };
    }
    let total_length: f64 = plan.routed().map(|p| p.attrs().unwrap().length).sum();
    let total_bends: usize = plan.routed().map(|p| p.attrs().unwrap().num_bends).sum();
    let total_cost = plan.total_cost();
    Metrics {
        num_pipes,
        num_routed,
        num_missing: plan.num_missing(),
        total_cost,
        total_length,
        total_bends,
        avg_cost: total_cost / num_routed as f64,
        avg_length: total_length / num_routed as f64,
        avg_bends: total_bends as f64 / num_routed as f64,
    }
}
