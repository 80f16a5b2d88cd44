//! Parameter sweeps and named scenario collections.

use indexmap::IndexMap;

use crate::config::ScenarioConfig;
use crate::error::ScenarioError;
use crate::scenario::{Scenario, ScenarioReport};
use gapflow_core::Density;
use gapflow_generator::GeneratorBuilder;
use gapflow_solver::StationarySolver;
use gapflow_space::{BoundaryRegime, GridSpec};

/// Stationary density for each θ in `thetas`, in input order.
///
/// Stops at the first failure.
pub fn theta_sweep(
    grid: &GridSpec,
    kappa: f64,
    thetas: &[f64],
    regime: BoundaryRegime,
    solver: &StationarySolver,
) -> Result<Vec<Density>, ScenarioError> {
    thetas
        .iter()
        .map(|&theta| {
            let generator = GeneratorBuilder::new(*grid)
                .kappa(kappa)
                .theta(theta)
                .regime(regime)
                .build()?;
            let density = solver.solve(&generator)?;
            log::debug!("theta sweep: theta={theta} solved");
            Ok(density)
        })
        .collect()
}

/// An insertion-ordered collection of named scenarios.
///
/// ```
/// use gapflow_engine::{ScenarioConfig, Study};
/// use gapflow_space::BoundaryRegime;
///
/// let base = ScenarioConfig {
///     step: 0.1,
///     theta: 0.3,
///     displacement_nodes: 2,
///     taus: vec![0.0, 1.0],
///     ..ScenarioConfig::default()
/// };
/// let mut study = Study::new();
/// study.insert("periodic", base.clone());
/// study.insert("reflecting", ScenarioConfig { regime: BoundaryRegime::ReflectingReset, ..base });
///
/// let reports = study.run();
/// assert_eq!(reports.keys().collect::<Vec<_>>(), ["periodic", "reflecting"]);
/// assert!(reports.values().all(|r| r.is_ok()));
/// ```
#[derive(Clone, Debug, Default)]
pub struct Study {
    scenarios: IndexMap<String, ScenarioConfig>,
}

impl Study {
    /// An empty study.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a scenario. Replacing keeps the original position
    /// and returns the previous configuration.
    pub fn insert(&mut self, name: impl Into<String>, config: ScenarioConfig) -> Option<ScenarioConfig> {
        self.scenarios.insert(name.into(), config)
    }

    /// The configuration registered under `name`.
    pub fn get(&self, name: &str) -> Option<&ScenarioConfig> {
        self.scenarios.get(name)
    }

    /// Scenario names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }

    /// Number of scenarios.
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    /// Whether the study has no scenarios.
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Run every scenario in insertion order.
    ///
    /// A failing scenario does not stop the others; its error is stored
    /// under its name.
    pub fn run(&self) -> IndexMap<String, Result<ScenarioReport, ScenarioError>> {
        self.scenarios
            .iter()
            .map(|(name, config)| {
                let result = Scenario::new(config.clone()).and_then(|s| s.run());
                if let Err(e) = &result {
                    log::warn!("scenario {name} failed: {e}");
                }
                (name.clone(), result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gapflow_core::GeneratorError;
    use gapflow_test_utils::{assert_mass, coarse_grid, small_grid};

    #[test]
    fn sweep_returns_one_density_per_theta_in_order() {
        let grid = small_grid();
        let thetas = [0.5, 0.05, 0.2];
        let out = theta_sweep(
            &grid,
            0.05,
            &thetas,
            BoundaryRegime::PeriodicReset,
            &StationarySolver::default(),
        )
        .unwrap();
        assert_eq!(out.len(), 3);
        let r = grid.reset_node().unwrap();
        for d in &out {
            assert_mass(d, 1.0, 1e-10);
        }
        // Faster resets concentrate more mass at the reset node.
        assert!(out[0].values()[r] > out[2].values()[r]);
        assert!(out[2].values()[r] > out[1].values()[r]);
    }

    #[test]
    fn sweep_stops_on_invalid_theta() {
        let grid = coarse_grid();
        let result = theta_sweep(
            &grid,
            0.05,
            &[0.1, -0.1],
            BoundaryRegime::PeriodicReset,
            &StationarySolver::default(),
        );
        assert!(matches!(
            result,
            Err(ScenarioError::Generator(GeneratorError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn study_keeps_insertion_order_and_isolates_failures() {
        let base = ScenarioConfig {
            step: 0.1,
            theta: 0.3,
            displacement_nodes: 2,
            taus: vec![0.0, 1.0],
            ..ScenarioConfig::default()
        };
        let mut study = Study::new();
        assert!(study.is_empty());
        study.insert("b", base.clone());
        study.insert(
            "bad",
            ScenarioConfig {
                theta: 0.0,
                regime: BoundaryRegime::ReflectingReset,
                ..base.clone()
            },
        );
        study.insert("a", base.clone());
        let old = study.insert("b", ScenarioConfig { kappa: 0.1, ..base });
        assert!(old.is_some());
        assert_eq!(study.len(), 3);
        assert_eq!(study.names().collect::<Vec<_>>(), ["b", "bad", "a"]);
        assert_eq!(study.get("b").map(|c| c.kappa), Some(0.1));

        let reports = study.run();
        assert!(reports["b"].is_ok());
        assert!(matches!(reports["bad"], Err(ScenarioError::Solve(_))));
        assert!(reports["a"].is_ok());
    }
}
