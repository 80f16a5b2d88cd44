//! Tolerances for the stationary solve.

/// Configuration for [`StationarySolver`](crate::StationarySolver).
#[derive(Clone, Debug, PartialEq)]
pub struct SolverConfig {
    /// Absolute threshold below which a singular value counts as zero.
    /// `None` = derive from the matrix: `σ_max · n · ε · rank_tolerance_factor`.
    pub rank_tolerance: Option<f64>,
    /// Multiplier on the derived rank tolerance. Default: 64.
    pub rank_tolerance_factor: f64,
    /// Entries below `-negativity_tolerance · max|v|` after sign
    /// correction are rejected. Default: 1e-8.
    pub negativity_tolerance: f64,
    /// Largest generator the solver will densify. Larger grids are
    /// rejected before any allocation. Default: 4096.
    pub max_dense_nodes: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            rank_tolerance: None,
            rank_tolerance_factor: 64.0,
            negativity_tolerance: 1e-8,
            max_dense_nodes: 4096,
        }
    }
}

impl SolverConfig {
    /// Check that every tolerance is finite and non-negative and the
    /// dense limit admits at least one node.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(tol) = self.rank_tolerance {
            if !tol.is_finite() || tol < 0.0 {
                return Err(format!("rank_tolerance must be finite and >= 0, got {tol}"));
            }
        }
        if !self.rank_tolerance_factor.is_finite() || self.rank_tolerance_factor <= 0.0 {
            return Err(format!(
                "rank_tolerance_factor must be finite and > 0, got {}",
                self.rank_tolerance_factor
            ));
        }
        if !self.negativity_tolerance.is_finite() || self.negativity_tolerance < 0.0 {
            return Err(format!(
                "negativity_tolerance must be finite and >= 0, got {}",
                self.negativity_tolerance
            ));
        }
        if self.max_dense_nodes == 0 {
            return Err("max_dense_nodes must be at least 1".to_string());
        }
        Ok(())
    }

    /// The rank tolerance for a matrix of size `n` with largest
    /// singular value `sigma_max`.
    pub fn resolved_rank_tolerance(&self, n: usize, sigma_max: f64) -> f64 {
        match self.rank_tolerance {
            Some(tol) => tol,
            None => sigma_max * n.max(1) as f64 * f64::EPSILON * self.rank_tolerance_factor,
        }
    }
}
