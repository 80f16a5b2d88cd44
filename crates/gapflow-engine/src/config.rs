//! Scenario configuration, validation, and error types.
//!
//! [`ScenarioConfig`] is the input for building a
//! [`Scenario`](crate::Scenario). [`validate()`](ScenarioConfig::validate)
//! checks every structural invariant up front, so a scenario that passes
//! can only fail later for numerical reasons.

use std::error::Error;
use std::fmt;

use gapflow_core::{GeneratorError, Parameters};
use gapflow_propagator::PropagatorConfig;
use gapflow_solver::SolverConfig;
use gapflow_space::{BoundaryRegime, GridError, GridSpec};

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ScenarioConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Grid bounds or step are invalid.
    Grid(GridError),
    /// κ or θ is invalid, or 0 lies outside the grid.
    Generator(GeneratorError),
    /// `|displacement_nodes|` is not below the node count.
    InvalidDisplacement {
        /// The configured displacement.
        displacement: i64,
        /// Node count of the configured grid.
        node_count: usize,
    },
    /// A sample time is negative or non-finite.
    InvalidTime {
        /// Position in `taus`.
        index: usize,
        /// The rejected value.
        tau: f64,
    },
    /// [`SolverConfig`] invariant violated.
    InvalidSolver {
        /// Description of which invariant was violated.
        reason: String,
    },
    /// [`PropagatorConfig`] invariant violated.
    InvalidPropagator {
        /// Description of which invariant was violated.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Generator(e) => write!(f, "generator: {e}"),
            Self::InvalidDisplacement {
                displacement,
                node_count,
            } => write!(
                f,
                "displacement_nodes {displacement} must be below node count {node_count} in magnitude"
            ),
            Self::InvalidTime { index, tau } => {
                write!(f, "taus[{index}] must be finite and >= 0, got {tau}")
            }
            Self::InvalidSolver { reason } => write!(f, "invalid solver config: {reason}"),
            Self::InvalidPropagator { reason } => {
                write!(f, "invalid propagator config: {reason}")
            }
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Generator(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<GeneratorError> for ConfigError {
    fn from(e: GeneratorError) -> Self {
        Self::Generator(e)
    }
}

// ── ScenarioConfig ─────────────────────────────────────────────────

/// Complete description of one impulse-response scenario.
///
/// The default is the reference scenario: grid `[-2, 2]` with step
/// 0.01 (401 nodes), κ = 0.05, θ = 0, periodic reset, a 10-node shock,
/// and samples at τ ∈ {0, 1, 2, 5, 10, 20}.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenarioConfig {
    /// Lower grid bound. Default: -2.
    pub x_min: f64,
    /// Upper grid bound. Default: 2.
    pub x_max: f64,
    /// Grid spacing. Default: 0.01.
    pub step: f64,
    /// Diffusivity κ. Default: 0.05.
    pub kappa: f64,
    /// Reset intensity θ. Default: 0.
    pub theta: f64,
    /// Boundary treatment. Default: periodic reset.
    pub regime: BoundaryRegime,
    /// Shock size in nodes; positive shifts mass to higher gaps. Default: 10.
    pub displacement_nodes: i64,
    /// Sample times for the impulse response, in caller order.
    pub taus: Vec<f64>,
    /// Stationary solver tolerances.
    pub solver: SolverConfig,
    /// Propagator tolerances and substep budget.
    pub propagator: PropagatorConfig,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            x_min: -2.0,
            x_max: 2.0,
            step: 0.01,
            kappa: 0.05,
            theta: 0.0,
            regime: BoundaryRegime::PeriodicReset,
            displacement_nodes: 10,
            taus: vec![0.0, 1.0, 2.0, 5.0, 10.0, 20.0],
            solver: SolverConfig::default(),
            propagator: PropagatorConfig::default(),
        }
    }
}

impl ScenarioConfig {
    /// The configured grid.
    pub fn grid(&self) -> Result<GridSpec, ConfigError> {
        Ok(GridSpec::new(self.x_min, self.x_max, self.step)?)
    }

    /// The configured κ and θ.
    pub fn parameters(&self) -> Result<Parameters, ConfigError> {
        Ok(Parameters::new(self.kappa, self.theta)?)
    }

    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Grid.
        let grid = self.grid()?;
        // 2. Rates.
        self.parameters()?;
        // 3. The reset point must be on the grid.
        if grid.reset_node().is_none() {
            return Err(ConfigError::Generator(GeneratorError::NoResetNode {
                x_min: self.x_min,
                x_max: self.x_max,
            }));
        }
        // 4. Shock must leave at least one node in place.
        let node_count = grid.node_count();
        if self.displacement_nodes.unsigned_abs() >= node_count as u64 {
            return Err(ConfigError::InvalidDisplacement {
                displacement: self.displacement_nodes,
                node_count,
            });
        }
        // 5. Sample times.
        for (index, &tau) in self.taus.iter().enumerate() {
            if !tau.is_finite() || tau < 0.0 {
                return Err(ConfigError::InvalidTime { index, tau });
            }
        }
        // 6. Numerical settings.
        self.solver
            .validate()
            .map_err(|reason| ConfigError::InvalidSolver { reason })?;
        self.propagator
            .validate()
            .map_err(|reason| ConfigError::InvalidPropagator { reason })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_reference_scenario() {
        let c = ScenarioConfig::default();
        assert!(c.validate().is_ok());
        let grid = c.grid().unwrap();
        assert_eq!(grid.node_count(), 401);
        assert_eq!(grid.reset_node(), Some(200));
    }

    #[test]
    fn negative_theta_is_invalid_parameter() {
        let c = ScenarioConfig {
            theta: -0.1,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Generator(GeneratorError::InvalidParameter {
                name: "theta",
                ..
            }))
        ));
    }

    #[test]
    fn bad_grid_is_reported() {
        let c = ScenarioConfig {
            step: 0.0,
            ..ScenarioConfig::default()
        };
        assert!(matches!(c.validate(), Err(ConfigError::Grid(_))));
    }

    #[test]
    fn grid_without_zero_is_rejected() {
        let c = ScenarioConfig {
            x_min: 0.5,
            ..ScenarioConfig::default()
        };
        assert!(matches!(
            c.validate(),
            Err(ConfigError::Generator(GeneratorError::NoResetNode { .. }))
        ));
    }

    #[test]
    fn displacement_equal_to_node_count_is_rejected() {
        for d in [401, -401, i64::MIN] {
            let c = ScenarioConfig {
                displacement_nodes: d,
                ..ScenarioConfig::default()
            };
            assert!(
                matches!(c.validate(), Err(ConfigError::InvalidDisplacement { .. })),
                "displacement {d}"
            );
        }
        let c = ScenarioConfig {
            displacement_nodes: -400,
            ..ScenarioConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn negative_tau_is_rejected() {
        let c = ScenarioConfig {
            taus: vec![0.0, -1.0],
            ..ScenarioConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidTime {
                index: 1,
                tau: -1.0
            })
        );
    }

    #[test]
    fn numerical_settings_are_checked() {
        let mut c = ScenarioConfig::default();
        c.solver.negativity_tolerance = -1.0;
        assert!(matches!(c.validate(), Err(ConfigError::InvalidSolver { .. })));

        let mut c = ScenarioConfig::default();
        c.propagator.max_substeps = Some(0);
        assert!(matches!(c.validate(), Err(ConfigError::InvalidPropagator { .. })));
    }

    #[test]
    fn source_chains_to_subsystem_error() {
        let e = ConfigError::from(GeneratorError::InvalidParameter {
            name: "kappa",
            value: f64::NAN,
        });
        assert!(e.source().is_some());
        assert!(format!("{e}").starts_with("generator: "));
    }
}
