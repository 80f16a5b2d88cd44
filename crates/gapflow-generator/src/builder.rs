//! Builder for [`Generator`] under a chosen boundary regime.
//!
//! The diffusion part is assembled from nearest-neighbour bonds of
//! conductance `c = κ/step²`: bond `(i, i+1)` adds `-c` to both
//! diagonals and `+c` to both off-diagonals. An interior node with two
//! bonds therefore gets the centered second difference
//! `c·(v[i-1] - 2v[i] + v[i+1])`. The reset part moves mass from every
//! node `j` to the reset node `r` at rate θ. Each contribution leaves
//! its column sum unchanged, so the assembled matrix is conservative.

use crate::generator::Generator;
use crate::sparse::SparseMatrix;
use gapflow_core::{GeneratorError, Parameters};
use gapflow_space::{BoundaryRegime, GridSpec};

/// Builder for a [`Generator`].
///
/// Defaults: κ = 0, θ = 0, [`BoundaryRegime::PeriodicReset`].
///
/// ```
/// use gapflow_generator::GeneratorBuilder;
/// use gapflow_space::{BoundaryRegime, GridSpec};
///
/// let grid = GridSpec::new(-1.0, 1.0, 0.1).unwrap();
/// let g = GeneratorBuilder::new(grid)
///     .kappa(0.05)
///     .theta(0.2)
///     .regime(BoundaryRegime::ReflectingReset)
///     .build()
///     .unwrap();
/// assert_eq!(g.node_count(), 21);
/// assert_eq!(g.reset_node(), 10);
/// ```
#[derive(Clone, Debug)]
pub struct GeneratorBuilder {
    grid: GridSpec,
    kappa: f64,
    theta: f64,
    regime: BoundaryRegime,
}

impl GeneratorBuilder {
    /// Start a builder on `grid`.
    pub fn new(grid: GridSpec) -> Self {
        Self {
            grid,
            kappa: 0.0,
            theta: 0.0,
            regime: BoundaryRegime::default(),
        }
    }

    /// Set the diffusivity κ (default: 0). Must be finite and >= 0.
    pub fn kappa(mut self, kappa: f64) -> Self {
        self.kappa = kappa;
        self
    }

    /// Set the reset intensity θ (default: 0). Must be finite and >= 0.
    pub fn theta(mut self, theta: f64) -> Self {
        self.theta = theta;
        self
    }

    /// Set κ and θ from validated [`Parameters`].
    pub fn parameters(mut self, params: Parameters) -> Self {
        self.kappa = params.kappa();
        self.theta = params.theta();
        self
    }

    /// Set the boundary regime (default: periodic).
    pub fn regime(mut self, regime: BoundaryRegime) -> Self {
        self.regime = regime;
        self
    }

    /// Assemble the generator.
    ///
    /// # Errors
    ///
    /// - [`GeneratorError::InvalidParameter`] if κ or θ is negative or
    ///   not finite.
    /// - [`GeneratorError::NoResetNode`] if 0 is outside the grid.
    pub fn build(self) -> Result<Generator, GeneratorError> {
        let params = Parameters::new(self.kappa, self.theta)?;
        let grid = self.grid;
        let r = grid.reset_node().ok_or(GeneratorError::NoResetNode {
            x_min: grid.x_min(),
            x_max: grid.x_max(),
        })?;

        let n = grid.node_count();
        let h = grid.step();
        let c = params.kappa() / (h * h);
        let theta = params.theta();

        let mut triplets = Vec::with_capacity(6 * n + 4);

        match self.regime {
            BoundaryRegime::PeriodicReset => {
                for i in 0..n.saturating_sub(1) {
                    push_bond(&mut triplets, i, i + 1, c);
                }
                // Outflow past either edge re-enters at the reset node.
                for edge in [0, n - 1] {
                    triplets.push((edge, edge, -c));
                    triplets.push((r, edge, c));
                }
            }
            BoundaryRegime::ReflectingReset => {
                // Bonds (0,1) and (n-2,n-1) are cut.
                for i in 1..n.saturating_sub(2) {
                    push_bond(&mut triplets, i, i + 1, c);
                }
            }
        }

        if theta > 0.0 {
            for j in 0..n {
                triplets.push((j, j, -theta));
                triplets.push((r, j, theta));
            }
        }

        let matrix = SparseMatrix::from_triplets(n, triplets);
        log::debug!(
            "built {} generator: n={n}, reset node {r}, c={c:.6e}, theta={theta}, nnz={}",
            self.regime,
            matrix.nnz()
        );
        Ok(Generator::new(matrix, grid, params, self.regime, r))
    }
}

fn push_bond(triplets: &mut Vec<(usize, usize, f64)>, i: usize, j: usize, c: f64) {
    triplets.push((i, i, -c));
    triplets.push((j, j, -c));
    triplets.push((i, j, c));
    triplets.push((j, i, c));
}

/// Assemble a generator in one call.
///
/// Equivalent to
/// `GeneratorBuilder::new(*grid).kappa(kappa).theta(theta).regime(regime).build()`.
pub fn build_generator(
    grid: &GridSpec,
    kappa: f64,
    theta: f64,
    regime: BoundaryRegime,
) -> Result<Generator, GeneratorError> {
    GeneratorBuilder::new(*grid)
        .kappa(kappa)
        .theta(theta)
        .regime(regime)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapflow_core::RateOperator;
    use proptest::prelude::*;

    fn grid() -> GridSpec {
        GridSpec::new(-1.0, 1.0, 0.1).unwrap()
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * (1.0 + a.abs().max(b.abs()))
    }

    #[test]
    fn interior_stencil() {
        let g = build_generator(&grid(), 0.05, 0.2, BoundaryRegime::PeriodicReset).unwrap();
        let c = 0.05 / 0.01;
        assert!(close(g.entry(5, 4), c));
        assert!(close(g.entry(5, 6), c));
        assert!(close(g.entry(5, 5), -2.0 * c - 0.2));
        assert_eq!(g.entry(5, 7), 0.0);
    }

    #[test]
    fn periodic_edges_feed_reset_row() {
        let g = build_generator(&grid(), 0.05, 0.2, BoundaryRegime::PeriodicReset).unwrap();
        let c = 5.0;
        let r = g.reset_node();
        let n = g.node_count();
        assert_eq!(r, 10);
        assert!(close(g.entry(0, 0), -2.0 * c - 0.2));
        assert!(close(g.entry(0, 1), c));
        assert!(close(g.entry(r, 0), c + 0.2));
        assert!(close(g.entry(r, n - 1), c + 0.2));
        assert!(close(g.entry(r, 3), 0.2));
        // Reset out of and back into r cancels on the diagonal.
        assert!(close(g.entry(r, r), -2.0 * c));
    }

    #[test]
    fn reflecting_edges_only_decay() {
        let g = build_generator(&grid(), 0.05, 0.2, BoundaryRegime::ReflectingReset).unwrap();
        let c = 5.0;
        let n = g.node_count();
        assert!(close(g.entry(0, 0), -0.2));
        assert!(close(g.entry(n - 1, n - 1), -0.2));
        assert_eq!(g.entry(0, 1), 0.0);
        assert_eq!(g.entry(1, 0), 0.0);
        assert_eq!(g.entry(n - 1, n - 2), 0.0);
        assert_eq!(g.entry(n - 2, n - 1), 0.0);
        // No flux across the interior edge.
        assert!(close(g.entry(1, 1), -c - 0.2));
        assert!(close(g.entry(n - 2, n - 2), -c - 0.2));
        assert!(close(g.entry(g.reset_node(), 0), 0.2));
    }

    #[test]
    fn negative_theta_is_invalid_parameter() {
        match build_generator(&grid(), 0.05, -0.1, BoundaryRegime::PeriodicReset) {
            Err(GeneratorError::InvalidParameter { name: "theta", value }) => {
                assert_eq!(value, -0.1);
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn grid_without_zero_has_no_reset_node() {
        let g = GridSpec::new(0.5, 1.5, 0.1).unwrap();
        assert!(matches!(
            build_generator(&g, 0.05, 0.1, BoundaryRegime::PeriodicReset),
            Err(GeneratorError::NoResetNode { .. })
        ));
    }

    #[test]
    fn storage_is_linear_in_node_count() {
        let g = GridSpec::new(-2.0, 2.0, 0.01).unwrap();
        let gen = build_generator(&g, 0.05, 0.1, BoundaryRegime::PeriodicReset).unwrap();
        assert!(gen.nnz() <= 4 * gen.node_count() + 4);
        assert_eq!(gen.nonzeros(), gen.nnz());
    }

    #[test]
    fn tiny_grids_stay_conservative() {
        for (x_max, step) in [(0.5, 1.0), (0.5, 0.5), (1.0, 0.5)] {
            let g = GridSpec::new(-x_max, x_max, step).unwrap();
            for regime in [BoundaryRegime::PeriodicReset, BoundaryRegime::ReflectingReset] {
                let gen = build_generator(&g, 0.3, 0.1, regime).unwrap();
                for s in gen.column_sums() {
                    assert!(s.abs() < 1e-12, "{regime} n={}: sum {s}", gen.node_count());
                }
            }
        }
    }

    #[test]
    fn shifted_norm_is_exact_for_rate_matrix() {
        let g = build_generator(&grid(), 0.05, 0.2, BoundaryRegime::PeriodicReset).unwrap();
        let mu = g.diagonal().into_iter().fold(0.0, f64::min);
        assert!(close(g.shifted_one_norm(mu), mu.abs()));
        assert!(g.shifted_one_norm(mu) <= g.one_norm());
    }

    fn arb_regime() -> impl Strategy<Value = BoundaryRegime> {
        prop_oneof![
            Just(BoundaryRegime::PeriodicReset),
            Just(BoundaryRegime::ReflectingReset),
        ]
    }

    proptest! {
        #[test]
        fn columns_sum_to_zero(
            kappa in 0.0f64..1.0,
            theta in 0.0f64..0.5,
            half_width in 0.2f64..3.0,
            step in 0.02f64..0.2,
            regime in arb_regime(),
        ) {
            let g = GridSpec::new(-half_width, half_width, step).unwrap();
            let gen = build_generator(&g, kappa, theta, regime).unwrap();
            let scale = kappa / (step * step) + theta + 1.0;
            for (j, s) in gen.column_sums().into_iter().enumerate() {
                prop_assert!(s.abs() <= 1e-10 * scale, "column {} sums to {}", j, s);
            }
        }

        #[test]
        fn off_diagonal_rates_are_non_negative(
            kappa in 0.0f64..1.0,
            theta in 0.0f64..0.5,
            regime in arb_regime(),
        ) {
            let gen = build_generator(&grid(), kappa, theta, regime).unwrap();
            for i in 0..gen.node_count() {
                for (j, v) in gen.matrix().row(i) {
                    if i != j {
                        prop_assert!(v >= 0.0);
                    }
                }
            }
        }

        #[test]
        fn apply_matches_dense(
            x in prop::collection::vec(0.0f64..1.0, 21),
            regime in arb_regime(),
        ) {
            let gen = build_generator(&grid(), 0.05, 0.3, regime).unwrap();
            let mut y = vec![0.0; 21];
            gen.apply(&x, &mut y);
            let dense = gen.to_dense() * nalgebra::DVector::from_vec(x.clone());
            for i in 0..21 {
                prop_assert!((y[i] - dense[i]).abs() < 1e-9);
            }
        }
    }
}
