//! Pairwise priority constraints as a directed graph over pipe ids.
//!
//! A constraint `(higher, lower)` means the lower pipe re-plans around the
//! higher one. The set must stay acyclic; the PBS engine clones the set,
//! adds the tentative edge, and tests consistency before committing, so
//! nothing here rolls back.

use std::collections::VecDeque;

/// Ordered priority pair: `higher` is routed first, `lower` avoids it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PriorityConstraint {
    pub higher: usize,
    pub lower: usize,
}

impl PriorityConstraint {
    pub fn new(higher: usize, lower: usize) -> Self {
        Self { higher, lower }
    }
}

/// Directed graph `higher -> lower` over the dense id range `0..num_pipes`.
#[derive(Clone, Debug)]
pub struct ConstraintSet {
    /// Out-edges: `adj[higher]` lists every directly lower pipe.
    adj: Vec<Vec<usize>>,
    /// In-edges: `radj[lower]` lists every directly higher pipe.
    radj: Vec<Vec<usize>>,
    len: usize,
}

impl ConstraintSet {
    pub fn new(num_pipes: usize) -> Self {
        Self {
            adj: vec![Vec::new(); num_pipes],
            radj: vec![Vec::new(); num_pipes],
            len: 0,
        }
    }

    #[inline]
    pub fn num_pipes(&self) -> usize {
        self.adj.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn contains(&self, c: PriorityConstraint) -> bool {
        self.adj[c.higher].contains(&c.lower)
    }

    /// Adds the constraint; duplicates are ignored. Cycle formation is not
    /// checked here; call `is_consistent` afterwards.
    pub fn add(&mut self, c: PriorityConstraint) {
        debug_assert!(c.higher < self.adj.len() && c.lower < self.adj.len());
        if self.contains(c) {
            return;
        }
        self.adj[c.higher].push(c.lower);
        self.radj[c.lower].push(c.higher);
        self.len += 1;
    }

    /// Every constraint in the set, in id order.
    pub fn iter(&self) -> impl Iterator<Item = PriorityConstraint> + '_ {
        self.adj.iter().enumerate().flat_map(|(higher, lowers)| {
            lowers
                .iter()
                .map(move |&lower| PriorityConstraint { higher, lower })
        })
    }

    /// False iff the directed graph contains a cycle (DFS with an on-stack
    /// set).
    pub fn is_consistent(&self) -> bool {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Unvisited,
            OnStack,
            Done,
        }
        fn visit(node: usize, adj: &[Vec<usize>], marks: &mut [Mark]) -> bool {
            marks[node] = Mark::OnStack;
            for &next in &adj[node] {
                match marks[next] {
                    Mark::OnStack => return false,
                    Mark::Unvisited => {
                        if !visit(next, adj, marks) {
                            return false;
                        }
                    }
                    Mark::Done => {}
                }
            }
            marks[node] = Mark::Done;
            true
        }

        let mut marks = vec![Mark::Unvisited; self.adj.len()];
        for node in 0..self.adj.len() {
            if marks[node] == Mark::Unvisited && !visit(node, &self.adj, &mut marks) {
                return false;
            }
        }
        true
    }

    /// Topological order over all pipe ids (Kahn's algorithm), or `None`
    /// when the set is inconsistent. Unconstrained pipes appear in id order.
    pub fn topological_order(&self) -> Option<Vec<usize>> {
        let n = self.adj.len();
        let mut in_degree = vec![0usize; n];
        for lowers in &self.adj {
            for &lower in lowers {
                in_degree[lower] += 1;
            }
        }
        let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(node) = queue.pop_front() {
            order.push(node);
            for &lower in &self.adj[node] {
                in_degree[lower] -= 1;
                if in_degree[lower] == 0 {
                    queue.push_back(lower);
                }
            }
        }
        (order.len() == n).then_some(order)
    }

    /// Transitive closure of higher-priority predecessors of `id`, in
    /// discovery order. These are the pipes `id` must treat as obstacles.
    pub fn ancestors_of(&self, id: usize) -> Vec<usize> {
        let mut seen = vec![false; self.adj.len()];
        let mut stack: Vec<usize> = self.radj[id].clone();
        let mut ancestors = Vec::new();
        while let Some(node) = stack.pop() {
            if seen[node] {
                continue;
            }
            seen[node] = true;
            ancestors.push(node);
            stack.extend_from_slice(&self.radj[node]);
        }
        ancestors
    }
}
