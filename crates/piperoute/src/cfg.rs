//! Cost configuration shared by path evaluation and the low-level router.

/// Weights of the pipe cost function.
///
/// A routed pipe costs `length * diameter + bend_weight * bends +
/// height_weight * avg_z * bends`. The router additionally charges
/// `bend_penalty` per axis change during search.
#[derive(Clone, Copy, Debug)]
pub struct CostCfg {
    pub bend_weight: f64,
    pub height_weight: f64,
    /// Per-move surcharge inside the A* search when the step axis differs
    /// from the previous one.
    pub bend_penalty: f64,
}

impl Default for CostCfg {
    fn default() -> Self {
        Self {
            bend_weight: 100.0,
            height_weight: 10.0,
            bend_penalty: 50.0,
        }
    }
}
