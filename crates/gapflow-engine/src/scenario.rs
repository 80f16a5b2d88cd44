//! One configured run of the pipeline: grid, generator, stationary
//! density, shock, and impulse response.

use std::time::Instant;

use crate::config::ScenarioConfig;
use crate::error::ScenarioError;
use crate::impulse::{ImpulseResponse, ImpulseResponseBuilder};
use gapflow_core::{Density, Trajectory};
use gapflow_generator::{Generator, GeneratorBuilder};
use gapflow_propagator::{PropagationMetrics, Propagator};
use gapflow_solver::StationarySolver;
use gapflow_space::GridSpec;

/// Stage timings for [`Scenario::run`].
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScenarioMetrics {
    /// Generator assembly, in microseconds.
    pub build_us: u64,
    /// Stationary solve, in microseconds.
    pub solve_us: u64,
    /// Counters from propagating the shocked density.
    pub propagation: PropagationMetrics,
    /// Wall-clock time for the whole run, in microseconds.
    pub total_us: u64,
}

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioReport {
    /// The stationary density.
    pub stationary: Density,
    /// The shocked density and its evolution.
    pub impulse: ImpulseResponse,
    /// Stage timings.
    pub metrics: ScenarioMetrics,
}

/// A validated scenario with its generator assembled.
///
/// ```
/// use gapflow_engine::{Scenario, ScenarioConfig};
///
/// let config = ScenarioConfig {
///     step: 0.05,
///     theta: 0.2,
///     taus: vec![0.0, 1.0],
///     ..ScenarioConfig::default()
/// };
/// let report = Scenario::new(config).unwrap().run().unwrap();
/// assert_eq!(report.impulse.trajectory.len(), 2);
/// ```
#[derive(Debug)]
pub struct Scenario {
    config: ScenarioConfig,
    grid: GridSpec,
    generator: Generator,
    build_us: u64,
}

impl Scenario {
    /// Validate `config` and assemble its generator.
    pub fn new(config: ScenarioConfig) -> Result<Self, ScenarioError> {
        config.validate()?;
        let grid = config.grid()?;
        let start = Instant::now();
        let generator = GeneratorBuilder::new(grid)
            .parameters(config.parameters()?)
            .regime(config.regime)
            .build()?;
        let build_us = start.elapsed().as_micros() as u64;
        log::debug!(
            "scenario ready: {} nodes, kappa={}, theta={}, {}",
            grid.node_count(),
            config.kappa,
            config.theta,
            config.regime
        );
        Ok(Self {
            config,
            grid,
            generator,
            build_us,
        })
    }

    /// The configuration this scenario was built from.
    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// The grid.
    pub fn grid(&self) -> &GridSpec {
        &self.grid
    }

    /// The assembled generator.
    pub fn generator(&self) -> &Generator {
        &self.generator
    }

    /// Solve for the stationary density.
    pub fn stationary(&self) -> Result<Density, ScenarioError> {
        let solver = StationarySolver::new(self.config.solver.clone());
        Ok(solver.solve(&self.generator)?)
    }

    /// Propagate an arbitrary initial density over the configured taus.
    pub fn transient(&self, initial: &Density) -> Result<Trajectory, ScenarioError> {
        let propagator = Propagator::with_config(&self.generator, self.config.propagator.clone());
        Ok(propagator.propagate(initial, &self.config.taus)?)
    }

    /// Shock `stationary` by the configured displacement and propagate.
    pub fn impulse_response(&self, stationary: &Density) -> Result<ImpulseResponse, ScenarioError> {
        ImpulseResponseBuilder::new(&self.grid)
            .propagator_config(self.config.propagator.clone())
            .respond(
                &self.generator,
                stationary,
                self.config.displacement_nodes,
                &self.config.taus,
            )
    }

    /// Stationary solve followed by the impulse response.
    pub fn run(&self) -> Result<ScenarioReport, ScenarioError> {
        let start = Instant::now();
        let stationary = self.stationary()?;
        let solve_us = start.elapsed().as_micros() as u64;
        let impulse = self.impulse_response(&stationary)?;
        let metrics = ScenarioMetrics {
            build_us: self.build_us,
            solve_us,
            propagation: impulse.metrics.clone(),
            total_us: self.build_us + start.elapsed().as_micros() as u64,
        };
        log::debug!(
            "scenario done: solve {}us, propagate {}us",
            metrics.solve_us,
            metrics.propagation.total_us
        );
        Ok(ScenarioReport {
            stationary,
            impulse,
            metrics,
        })
    }
}
