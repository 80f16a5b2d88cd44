//! Work counters for a propagation call.
//!
//! [`PropagationMetrics`] is returned next to the trajectory by
//! [`Propagator::propagate_with_metrics`](crate::Propagator::propagate_with_metrics)
//! so callers can profile sweeps without a logger installed.

/// Timing and work counters collected during one propagation call.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PropagationMetrics {
    /// Wall-clock time for the whole call, in microseconds.
    pub total_us: u64,
    /// Number of sample times returned.
    pub samples: usize,
    /// Number of non-empty spans advanced (distinct positive Δτ).
    pub spans: usize,
    /// Scaling substeps taken across all spans.
    pub substeps: u64,
    /// Operator applications (`G·x` products).
    pub matvecs: u64,
    /// Dense matrix squarings spent growing the power chain.
    pub squarings: u64,
    /// Dense matrix-vector products with chain levels.
    pub dense_products: u64,
}

impl PropagationMetrics {
    /// Fold another call's counters into this one.
    pub fn accumulate(&mut self, other: &PropagationMetrics) {
        self.total_us += other.total_us;
        self.samples += other.samples;
        self.spans += other.spans;
        self.substeps += other.substeps;
        self.matvecs += other.matvecs;
        self.squarings += other.squarings;
        self.dense_products += other.dense_products;
    }
}
