//! The assembled generator matrix and its provenance.

use crate::sparse::SparseMatrix;
use gapflow_core::{Parameters, RateOperator};
use gapflow_space::{BoundaryRegime, GridSpec};
use nalgebra::DMatrix;

/// Infinitesimal generator of the discretized price-gap process.
///
/// Densities are column vectors evolving as `dv/dt = G·v`. Every column
/// of `G` sums to zero, so the flow conserves total mass. Built by
/// [`GeneratorBuilder`](crate::GeneratorBuilder); immutable afterwards.
#[derive(Clone, Debug)]
pub struct Generator {
    matrix: SparseMatrix,
    grid: GridSpec,
    params: Parameters,
    regime: BoundaryRegime,
    reset_node: usize,
}

impl Generator {
    pub(crate) fn new(
        matrix: SparseMatrix,
        grid: GridSpec,
        params: Parameters,
        regime: BoundaryRegime,
        reset_node: usize,
    ) -> Self {
        Self {
            matrix,
            grid,
            params,
            regime,
            reset_node,
        }
    }

    /// Number of grid nodes (matrix dimension).
    pub fn node_count(&self) -> usize {
        self.matrix.dim()
    }

    /// The grid this generator was built on.
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// Grid spacing.
    pub fn step(&self) -> f64 {
        self.grid.step()
    }

    /// κ and θ.
    pub fn parameters(&self) -> Parameters {
        self.params
    }

    /// Boundary regime.
    pub fn regime(&self) -> BoundaryRegime {
        self.regime
    }

    /// Index of the node reset events jump to.
    pub fn reset_node(&self) -> usize {
        self.reset_node
    }

    /// Underlying CSR storage.
    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    /// Entry `G[i][j]`: the rate of flow from node `j` into node `i`
    /// (for `i != j`).
    pub fn entry(&self, i: usize, j: usize) -> f64 {
        self.matrix.get(i, j)
    }

    /// Stored entry count.
    pub fn nnz(&self) -> usize {
        self.matrix.nnz()
    }

    /// Column sums; all zero up to rounding for a conservative generator.
    pub fn column_sums(&self) -> Vec<f64> {
        self.matrix.column_sums()
    }

    /// Dense copy. Only intended for small grids and the stationary solve.
    pub fn to_dense(&self) -> DMatrix<f64> {
        self.matrix.to_dense()
    }
}

impl RateOperator for Generator {
    fn dim(&self) -> usize {
        self.matrix.dim()
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        self.matrix.mul_vec(x, y);
    }

    fn diagonal(&self) -> Vec<f64> {
        self.matrix.diagonal()
    }

    fn one_norm(&self) -> f64 {
        self.matrix.shifted_one_norm(0.0)
    }

    fn shifted_one_norm(&self, shift: f64) -> f64 {
        self.matrix.shifted_one_norm(shift)
    }

    fn nonzeros(&self) -> usize {
        self.matrix.nnz()
    }
}
