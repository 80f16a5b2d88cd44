//! Shocked initial conditions and impulse responses.
//!
//! A shock translates the stationary density by a whole number of
//! nodes. Mass pushed past the leading edge piles onto the boundary
//! node in the shift direction and the trailing edge is zero-filled,
//! so total mass is unchanged. Propagating the shocked density shows
//! how the cross-section of gaps relaxes back to equilibrium.

use crate::error::ScenarioError;
use gapflow_core::{Density, ShockError, Trajectory};
use gapflow_generator::Generator;
use gapflow_propagator::{PropagationMetrics, Propagator, PropagatorConfig};
use gapflow_space::GridSpec;

/// Builds shocked densities and impulse responses on a grid.
///
/// ```
/// use gapflow_core::Density;
/// use gapflow_engine::ImpulseResponseBuilder;
/// use gapflow_space::GridSpec;
///
/// let grid = GridSpec::new(-1.0, 1.0, 0.5).unwrap();
/// let d = Density::new(vec![1.0, 2.0, 4.0, 2.0, 1.0], 0.5);
/// let shocked = ImpulseResponseBuilder::new(&grid).shock(&d, 2).unwrap();
/// assert_eq!(shocked.values(), &[0.0, 0.0, 1.0, 2.0, 7.0]);
/// ```
#[derive(Clone, Debug)]
pub struct ImpulseResponseBuilder<'g> {
    grid: &'g GridSpec,
    propagator: PropagatorConfig,
}

impl<'g> ImpulseResponseBuilder<'g> {
    /// Builder on `grid` with default propagator settings.
    pub fn new(grid: &'g GridSpec) -> Self {
        Self {
            grid,
            propagator: PropagatorConfig::default(),
        }
    }

    /// Use `config` when propagating in [`respond`](Self::respond).
    pub fn propagator_config(mut self, config: PropagatorConfig) -> Self {
        self.propagator = config;
        self
    }

    /// Translate `stationary` by `displacement_nodes` nodes.
    ///
    /// # Errors
    ///
    /// [`ShockError::LengthMismatch`] if the density does not match the
    /// grid, [`ShockError::InvalidDisplacement`] if
    /// `|displacement_nodes| >= node_count`.
    pub fn shock(&self, stationary: &Density, displacement_nodes: i64) -> Result<Density, ShockError> {
        shock(stationary, self.grid, displacement_nodes)
    }

    /// Translate by a real distance, rounded to the nearest whole node.
    pub fn shock_by(&self, stationary: &Density, amount: f64) -> Result<Density, ShockError> {
        let nodes = if amount.is_nan() {
            i64::MAX
        } else {
            (amount / self.grid.step()).round() as i64
        };
        self.shock(stationary, nodes)
    }

    /// Shock `stationary` and propagate the result under `generator`.
    pub fn respond(
        &self,
        generator: &Generator,
        stationary: &Density,
        displacement_nodes: i64,
        taus: &[f64],
    ) -> Result<ImpulseResponse, ScenarioError> {
        let shocked = self.shock(stationary, displacement_nodes)?;
        let (trajectory, metrics) = Propagator::with_config(generator, self.propagator.clone())
            .propagate_with_metrics(&shocked, taus)?;
        log::debug!(
            "impulse response: shock {displacement_nodes} nodes, {} samples",
            trajectory.len()
        );
        Ok(ImpulseResponse {
            displacement_nodes,
            shocked,
            trajectory,
            metrics,
        })
    }
}

/// Translate `stationary` by `displacement_nodes` nodes on `grid`.
///
/// Positive displacements move mass toward higher coordinates.
pub fn shock(stationary: &Density, grid: &GridSpec, displacement_nodes: i64) -> Result<Density, ShockError> {
    let n = grid.node_count();
    if stationary.len() != n {
        return Err(ShockError::LengthMismatch {
            expected: n,
            actual: stationary.len(),
        });
    }
    if displacement_nodes.unsigned_abs() >= n as u64 {
        return Err(ShockError::InvalidDisplacement {
            displacement: displacement_nodes,
            node_count: n,
        });
    }

    let v = stationary.values();
    let k = displacement_nodes.unsigned_abs() as usize;
    let mut out = vec![0.0; n];
    if displacement_nodes >= 0 {
        out[k..].copy_from_slice(&v[..n - k]);
        out[n - 1] += v[n - k..].iter().sum::<f64>();
    } else {
        out[..n - k].copy_from_slice(&v[k..]);
        out[0] += v[..k].iter().sum::<f64>();
    }
    Ok(Density::new(out, stationary.step()))
}

/// A shocked density and its evolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ImpulseResponse {
    /// Shock size in nodes.
    pub displacement_nodes: i64,
    /// The initial condition after the shock.
    pub shocked: Density,
    /// Densities at the requested sample times, in caller order.
    pub trajectory: Trajectory,
    /// Work done by the propagator.
    pub metrics: PropagationMetrics,
}

impl ImpulseResponse {
    /// `(τ, mean gap)` at each sample: the aggregate response.
    pub fn mean_path(&self, nodes: &[f64]) -> Vec<(f64, f64)> {
        self.trajectory
            .iter()
            .map(|(tau, d)| (tau, d.mean(nodes)))
            .collect()
    }

    /// Mean gap at each sample, less the mean of `baseline`.
    pub fn mean_deviation(&self, nodes: &[f64], baseline: &Density) -> Vec<(f64, f64)> {
        let base = baseline.mean(nodes);
        self.mean_path(nodes)
            .into_iter()
            .map(|(tau, m)| (tau, m - base))
            .collect()
    }
}
