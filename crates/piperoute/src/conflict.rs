//! Diameter-aware interference detection between routed pipes.
//!
//! Two routed pipes conflict when some pair of their path vertices is closer
//! than the sum of their radii. Detection is recomputed from the current plan
//! on every query; conflicts are never persisted.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand::rngs::StdRng;

use crate::grid::types::euclidean;
use crate::pipe::Pipe;
use crate::plan::Plan;

/// Unordered conflicting pair, canonicalized with `first < second`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Conflict {
    pub first: usize,
    pub second: usize,
}

impl Conflict {
    pub fn new(a: usize, b: usize) -> Self {
        debug_assert_ne!(a, b, "a pipe cannot conflict with itself");
        Self {
            first: a.min(b),
            second: a.max(b),
        }
    }

    pub fn involves(&self, id: usize) -> bool {
        self.first == id || self.second == id
    }

    pub fn other(&self, id: usize) -> Option<usize> {
        if self.first == id {
            Some(self.second)
        } else if self.second == id {
            Some(self.first)
        } else {
            None
        }
    }
}

/// How the PBS engine picks one conflict out of the detected set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectPolicy {
    /// Uniformly at random.
    Uniform,
    /// Probability proportional to `cost(first) + cost(second)`; falls back
    /// to uniform when every weight is zero.
    CostWeighted,
}

/// True iff any vertex pair of the two routed paths violates the clearance
/// `(dA + dB) / 2`. Symmetric in its arguments; false when either pipe is
/// unrouted.
pub fn pipes_conflict(a: &Pipe, b: &Pipe) -> bool {
    let (Some(pa), Some(pb)) = (a.path(), b.path()) else {
        return false;
    };
    let clearance = (a.diameter + b.diameter) / 2.0;
    pa.iter()
        .any(|&va| pb.iter().any(|&vb| euclidean(va, vb) < clearance))
}

/// All conflicting routed pairs, canonicalized and in id order.
pub fn find_all(plan: &Plan) -> Vec<Conflict> {
    let routed: Vec<&Pipe> = plan.routed().collect();
    let mut conflicts = Vec::new();
    for (i, a) in routed.iter().enumerate() {
        for b in &routed[i + 1..] {
            if pipes_conflict(a, b) {
                conflicts.push(Conflict::new(a.id, b.id));
            }
        }
    }
    conflicts
}

/// Whether any routed pair conflicts. Early-exits on the first hit.
pub fn has_conflicts(plan: &Plan) -> bool {
    let routed: Vec<&Pipe> = plan.routed().collect();
    routed
        .iter()
        .enumerate()
        .any(|(i, a)| routed[i + 1..].iter().any(|b| pipes_conflict(a, b)))
}

/// Picks one conflict according to `policy`, or `None` when the plan is
/// conflict-free. The caller-owned RNG is the engine's only source of
/// nondeterminism.
pub fn select(plan: &Plan, policy: SelectPolicy, rng: &mut StdRng) -> Option<Conflict> {
    let conflicts = find_all(plan);
    if conflicts.is_empty() {
        return None;
    }
    match policy {
        SelectPolicy::Uniform => Some(conflicts[rng.gen_range(0..conflicts.len())]),
        SelectPolicy::CostWeighted => {
            let weights: Vec<f64> = conflicts
                .iter()
                .map(|c| plan.pipe(c.first).cost() + plan.pipe(c.second).cost())
                .collect();
            match WeightedIndex::new(&weights) {
                Ok(dist) => Some(conflicts[dist.sample(rng)]),
                // All weights zero: uniform fallback.
                Err(_) => Some(conflicts[rng.gen_range(0..conflicts.len())]),
            }
        }
    }
}

/// Ids of every pipe whose path interferes with `id`'s.
pub fn conflicted_with(plan: &Plan, id: usize) -> Vec<usize> {
    find_all(plan)
        .iter()
        .filter_map(|c| c.other(id))
        .collect()
}

/// Aggregate conflict counts for diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConflictStats {
    pub total: usize,
    pub pipes_involved: usize,
    pub max_per_pipe: usize,
}

pub fn stats(plan: &Plan) -> ConflictStats {
    let conflicts = find_all(plan);
    let mut per_pipe = vec![0usize; plan.num_pipes()];
    for c in &conflicts {
        per_pipe[c.first] += 1;
        per_pipe[c.second] += 1;
    }
    ConflictStats {
        total: conflicts.len(),
        pipes_involved: per_pipe.iter().filter(|&&n| n > 0).count(),
        max_per_pipe: per_pipe.iter().copied().max().unwrap_or(0),
    }
}
