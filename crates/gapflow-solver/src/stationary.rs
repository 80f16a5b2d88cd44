//! Null-vector solve for the stationary density.

use crate::config::SolverConfig;
use gapflow_core::{Density, SolveError};
use gapflow_generator::Generator;
use nalgebra::DMatrix;

/// Computes the stationary density of a [`Generator`].
///
/// Works on the dense matrix, so cost is `O(n³)` in the node count and
/// grids above [`SolverConfig::max_dense_nodes`] are refused.
///
/// ```
/// use gapflow_generator::build_generator;
/// use gapflow_solver::StationarySolver;
/// use gapflow_space::{BoundaryRegime, GridSpec};
///
/// let grid = GridSpec::new(-1.0, 1.0, 0.1).unwrap();
/// let g = build_generator(&grid, 0.05, 0.2, BoundaryRegime::PeriodicReset).unwrap();
/// let d = StationarySolver::default().solve(&g).unwrap();
/// assert!((d.mass() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct StationarySolver {
    config: SolverConfig,
}

impl StationarySolver {
    /// Create a solver with the given tolerances.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// The solver's configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solve `G·v = 0` and normalize `v` to unit mass.
    ///
    /// # Errors
    ///
    /// - [`SolveError::DegenerateNullSpace`] if the numerical null space
    ///   is empty or has more than one direction.
    /// - [`SolveError::NegativeDensity`] if the sign-corrected null
    ///   vector has an entry below the negativity tolerance.
    /// - [`SolveError::DecompositionFailed`] if the SVD does not converge.
    /// - [`SolveError::TooLarge`] if the generator has more than
    ///   `max_dense_nodes` nodes.
    pub fn solve(&self, generator: &Generator) -> Result<Density, SolveError> {
        let node_count = generator.node_count();
        if node_count > self.config.max_dense_nodes {
            return Err(SolveError::TooLarge {
                node_count,
                limit: self.config.max_dense_nodes,
            });
        }
        let raw = null_vector(generator.to_dense(), &self.config)?;
        to_density(raw, generator.step(), self.config.negativity_tolerance)
    }
}

/// Solve for the stationary density with default tolerances.
pub fn solve_stationary(generator: &Generator) -> Result<Density, SolveError> {
    StationarySolver::default().solve(generator)
}

/// The unique right null direction of `matrix`, as a unit vector of
/// arbitrary sign.
fn null_vector(matrix: DMatrix<f64>, config: &SolverConfig) -> Result<Vec<f64>, SolveError> {
    let n = matrix.nrows();
    let svd = matrix
        .try_svd(false, true, f64::EPSILON, 0)
        .ok_or(SolveError::DecompositionFailed)?;
    let v_t = svd.v_t.ok_or(SolveError::DecompositionFailed)?;

    let sigma = &svd.singular_values;
    let sigma_max = sigma.iter().copied().fold(0.0, f64::max);
    let tol = config.resolved_rank_tolerance(n, sigma_max);
    let null: Vec<usize> = sigma
        .iter()
        .enumerate()
        .filter(|(_, s)| **s <= tol)
        .map(|(k, _)| k)
        .collect();

    log::debug!(
        "stationary solve: n={n}, sigma_max={sigma_max:.3e}, tol={tol:.3e}, null dimension {}",
        null.len()
    );

    match null.as_slice() {
        [k] => Ok(v_t.row(*k).iter().copied().collect()),
        _ => Err(SolveError::DegenerateNullSpace {
            dimension: null.len(),
        }),
    }
}

/// Fix the sign of a raw null vector, reject significant negatives,
/// and scale to unit mass.
fn to_density(mut v: Vec<f64>, step: f64, negativity_tolerance: f64) -> Result<Density, SolveError> {
    let positive = v.iter().filter(|x| **x > 0.0).count();
    let negative = v.iter().filter(|x| **x < 0.0).count();
    let flip = negative > positive || (negative == positive && v.iter().sum::<f64>() < 0.0);
    if flip {
        for x in v.iter_mut() {
            *x = -*x;
        }
    }

    let max_abs = v.iter().fold(0.0, |m: f64, x| m.max(x.abs()));
    if let Some((index, &value)) = v.iter().enumerate().min_by(|a, b| a.1.total_cmp(b.1)) {
        if max_abs == 0.0 || value < -negativity_tolerance * max_abs {
            let relative = if max_abs > 0.0 { value / max_abs } else { value };
            return Err(SolveError::NegativeDensity {
                index,
                value: relative,
            });
        }
    }

    for x in v.iter_mut() {
        if *x < 0.0 {
            *x = 0.0;
        }
    }
    let scale = 1.0 / (v.iter().sum::<f64>() * step);
    for x in v.iter_mut() {
        *x *= scale;
    }
    Ok(Density::new(v, step))
}
