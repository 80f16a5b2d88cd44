//! The linear-operator seam between generators and the propagator.

/// A square rate matrix acting on column vectors.
///
/// The propagator only needs matrix-vector products, the diagonal, and
/// 1-norm bounds, so it is written against this trait rather than a
/// concrete storage format. Implementations must be deterministic.
pub trait RateOperator {
    /// Number of rows (and columns).
    fn dim(&self) -> usize;

    /// Compute `y = A·x`. Both slices have length [`dim()`](Self::dim).
    fn apply(&self, x: &[f64], y: &mut [f64]);

    /// The diagonal entries of `A`.
    fn diagonal(&self) -> Vec<f64>;

    /// The induced 1-norm: maximum absolute column sum.
    fn one_norm(&self) -> f64;

    /// The 1-norm of `A - shift·I`.
    ///
    /// Default: the triangle-inequality bound `‖A‖₁ + |shift|`.
    /// Implementations with cheap entry access should return the exact
    /// value, since the propagator's cost is proportional to it.
    fn shifted_one_norm(&self, shift: f64) -> f64 {
        self.one_norm() + shift.abs()
    }

    /// Number of stored entries touched by one [`apply`](Self::apply).
    ///
    /// Used only to estimate work. Default: `dim()²`.
    fn nonzeros(&self) -> usize {
        self.dim().saturating_mul(self.dim())
    }
}
