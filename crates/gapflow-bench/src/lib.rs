//! Benchmark profiles for the gapflow solver.
//!
//! Provides pre-built [`ScenarioConfig`] profiles for benchmarking:
//!
//! - [`reference_profile`]: `[-2, 2]` step 0.01 (401 nodes), the reference scenario
//! - [`fine_profile`]: `[-2, 2]` step 0.005 (801 nodes) for scaling checks
//! - [`reset_profile`]: the reference grid with a given reset intensity

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use gapflow_core::Density;
use gapflow_engine::ScenarioConfig;
use gapflow_space::GridSpec;

/// The reference scenario: κ = 0.05, θ = 0, periodic reset, 10-node
/// shock, τ ∈ {0, 1, 2, 5, 10, 20}.
pub fn reference_profile() -> ScenarioConfig {
    ScenarioConfig::default()
}

/// Same as [`reference_profile`] at half the step (801 nodes).
///
/// The dense stationary solve grows as n³, so this is roughly eight
/// times the solve cost of the reference grid.
pub fn fine_profile() -> ScenarioConfig {
    ScenarioConfig {
        step: 0.005,
        displacement_nodes: 20,
        ..ScenarioConfig::default()
    }
}

/// Reference grid with reset intensity `theta`.
pub fn reset_profile(theta: f64) -> ScenarioConfig {
    ScenarioConfig {
        theta,
        ..ScenarioConfig::default()
    }
}

/// Unit-mass density with a linear ramp across `grid`, used as a
/// deterministic non-stationary starting point.
pub fn ramp_density(grid: &GridSpec) -> Density {
    let n = grid.node_count();
    let values: Vec<f64> = (0..n).map(|i| (i + 1) as f64).collect();
    let total: f64 = values.iter().sum::<f64>() * grid.step();
    Density::new(values.into_iter().map(|v| v / total).collect(), grid.step())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profiles_validate() {
        reference_profile().validate().unwrap();
        fine_profile().validate().unwrap();
        reset_profile(0.5).validate().unwrap();
    }

    #[test]
    fn fine_profile_doubles_resolution() {
        let grid = fine_profile().grid().unwrap();
        assert_eq!(grid.node_count(), 801);
        assert_eq!(grid.reset_node(), Some(400));
    }

    #[test]
    fn ramp_has_unit_mass() {
        let grid = reference_profile().grid().unwrap();
        let d = ramp_density(&grid);
        assert!((d.mass() - 1.0).abs() < 1e-12);
        assert!(d.values().windows(2).all(|w| w[1] > w[0]));
    }
}
