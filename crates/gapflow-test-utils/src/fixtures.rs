//! Standard grids, generators, and initial densities.
//!
//! - [`default_grid`]: `[-2, 2]`, step 0.01 (401 nodes), the reference grid.
//! - [`small_grid`]: `[-1, 1]`, step 0.05 (41 nodes).
//! - [`coarse_grid`]: `[-1, 1]`, step 0.1 (21 nodes).

use gapflow_core::Density;
use gapflow_generator::{build_generator, Generator};
use gapflow_space::{BoundaryRegime, GridSpec};

/// The reference grid: `[-2, 2]` at step 0.01, 401 nodes, reset node 200.
pub fn default_grid() -> GridSpec {
    GridSpec::new(-2.0, 2.0, 0.01).unwrap()
}

/// `[-1, 1]` at step 0.05: 41 nodes, cheap enough for the dense solve in
/// every test.
pub fn small_grid() -> GridSpec {
    GridSpec::new(-1.0, 1.0, 0.05).unwrap()
}

/// `[-1, 1]` at step 0.1: 21 nodes, for property tests.
pub fn coarse_grid() -> GridSpec {
    GridSpec::new(-1.0, 1.0, 0.1).unwrap()
}

/// Periodic-reset generator on `grid`.
pub fn periodic(grid: &GridSpec, kappa: f64, theta: f64) -> Generator {
    build_generator(grid, kappa, theta, BoundaryRegime::PeriodicReset).unwrap()
}

/// Reflecting-reset generator on `grid`.
pub fn reflecting(grid: &GridSpec, kappa: f64, theta: f64) -> Generator {
    build_generator(grid, kappa, theta, BoundaryRegime::ReflectingReset).unwrap()
}

/// Discretized normal density centred at `mean`, renormalized to unit
/// mass on the grid.
pub fn gaussian(grid: &GridSpec, mean: f64, sd: f64) -> Density {
    let values = grid
        .nodes()
        .into_iter()
        .map(|x| (-(x - mean) * (x - mean) / (2.0 * sd * sd)).exp())
        .collect();
    Density::new(values, grid.step()).normalized().unwrap()
}

/// Unit-mass density proportional to `weights` (cycled to the grid
/// length). Gives property tests an arbitrary non-negative start.
pub fn from_weights(grid: &GridSpec, weights: &[f64]) -> Density {
    let n = grid.node_count();
    let values: Vec<f64> = (0..n).map(|i| weights[i % weights.len()] + 1e-3).collect();
    Density::new(values, grid.step()).normalized().unwrap()
}
