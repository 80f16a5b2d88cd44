//! Propagation of generator-built densities: conservation, positivity,
//! and relaxation to the stationary density.

use gapflow_core::Density;
use gapflow_propagator::{propagate, Propagator};
use gapflow_solver::solve_stationary;
use gapflow_test_utils::{
    assert_density_close, assert_mass, assert_non_negative, coarse_grid, default_grid,
    from_weights, gaussian, periodic, reflecting, small_grid,
};
use proptest::prelude::*;

#[test]
fn gaussian_keeps_unit_mass() {
    let grid = small_grid();
    let g = periodic(&grid, 0.05, 0.1);
    let start = gaussian(&grid, 0.3, 0.1);
    let traj = propagate(&g, &start, &[0.0, 0.5, 1.0, 5.0, 20.0]).unwrap();
    for (_, d) in traj.iter() {
        assert_mass(d, 1.0, 1e-10);
        assert_non_negative(d, 0.0);
    }
}

#[test]
fn stationary_density_is_a_fixed_point() {
    for g in [periodic(&small_grid(), 0.05, 0.2), reflecting(&small_grid(), 0.05, 0.2)] {
        let stationary = solve_stationary(&g).unwrap();
        let traj = propagate(&g, &stationary, &[1.0, 10.0]).unwrap();
        for (_, d) in traj.iter() {
            assert_density_close(d, &stationary, 1e-8);
        }
    }
}

#[test]
fn relaxes_to_stationary() {
    // Every non-stationary direction decays at least at rate θ, so by
    // τ = 40 with θ = 0.5 the L1 gap is below 2·e^{-20}.
    let grid = coarse_grid();
    let g = periodic(&grid, 0.05, 0.5);
    let stationary = solve_stationary(&g).unwrap();
    let start = Density::point_mass(grid.node_count(), 2, grid.step()).unwrap();
    let traj = propagate(&g, &start, &[0.0, 40.0]).unwrap();
    let early = traj.samples()[0].density.l1_distance(&stationary);
    let late = traj.samples()[1].density.l1_distance(&stationary);
    assert!(late < 1e-6, "L1 distance {late} after relaxation");
    assert!(late < early);
}

#[test]
fn reference_grid_without_reset_relaxes_by_tau_20() {
    // κ = 0.05, θ = 0. Antisymmetric modes never reach the reset node
    // and decay as Dirichlet modes, the slowest at κ·(π/2.01)² ≈ 0.122.
    // Symmetric starts relax faster.
    let grid = default_grid();
    let g = periodic(&grid, 0.05, 0.0);
    let stationary = solve_stationary(&g).unwrap();
    let n = grid.node_count();
    let p = Propagator::new(&g);
    let cases = [
        (Density::uniform(n, grid.step()), 1e-4, 1e-10),
        (Density::point_mass(n, 250, grid.step()).unwrap(), 0.2, 5e-5),
    ];
    for (start, by_20, by_100) in cases {
        let traj = p.propagate(&start, &[20.0, 100.0]).unwrap();
        let at_20 = traj.samples()[0].density.l1_distance(&stationary);
        let at_100 = traj.samples()[1].density.l1_distance(&stationary);
        assert!(at_20 < by_20, "L1 distance {at_20} at tau=20");
        assert!(at_100 < by_100, "L1 distance {at_100} at tau=100");
        for (_, d) in traj.iter() {
            assert_mass(d, 1.0, 1e-10);
            assert_non_negative(d, 0.0);
        }
    }
}

#[test]
fn long_horizon_on_reference_grid_reaches_stationary() {
    let grid = default_grid();
    let g = periodic(&grid, 0.05, 0.1);
    let stationary = solve_stationary(&g).unwrap();
    let start = gaussian(&grid, 0.5, 0.1);
    let (traj, m) = Propagator::new(&g)
        .propagate_with_metrics(&start, &[2.0e5])
        .unwrap();
    let d = &traj.samples()[0].density;
    assert_mass(d, 1.0, 1e-9);
    assert_non_negative(d, 0.0);
    assert!(d.l1_distance(&stationary) < 1e-8);
    // One Taylor substep per base column plus the remainder.
    assert!(
        m.substeps <= grid.node_count() as u64 + 1,
        "{} substeps",
        m.substeps
    );
    assert!(m.squarings <= 65, "{} squarings", m.squarings);
}

#[test]
fn distance_to_stationary_shrinks_monotonically() {
    let grid = small_grid();
    let g = reflecting(&grid, 0.05, 0.3);
    let stationary = solve_stationary(&g).unwrap();
    let start = gaussian(&grid, -0.5, 0.05);
    let taus = [0.0, 0.5, 1.0, 2.0, 4.0, 8.0];
    let traj = propagate(&g, &start, &taus).unwrap();
    let gaps: Vec<f64> = traj
        .iter()
        .map(|(_, d)| d.l1_distance(&stationary))
        .collect();
    for w in gaps.windows(2) {
        assert!(w[1] <= w[0] + 1e-12, "L1 gap grew: {gaps:?}");
    }
}

#[test]
fn reused_propagator_matches_free_function() {
    let grid = coarse_grid();
    let g = periodic(&grid, 0.1, 0.2);
    let start = gaussian(&grid, 0.0, 0.2);
    let p = Propagator::new(&g);
    let a = p.propagate(&start, &[3.0]).unwrap();
    let b = propagate(&g, &start, &[3.0]).unwrap();
    assert_eq!(a, b);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn mass_and_positivity_preserved(
        weights in prop::collection::vec(0.0f64..1.0, 1..8),
        kappa in 0.0f64..0.3,
        theta in 0.0f64..1.0,
        tau in 0.0f64..30.0,
        reflect in any::<bool>(),
    ) {
        let grid = coarse_grid();
        let g = if reflect {
            reflecting(&grid, kappa, theta)
        } else {
            periodic(&grid, kappa, theta)
        };
        let start = from_weights(&grid, &weights);
        let traj = propagate(&g, &start, &[tau]).unwrap();
        let d = &traj.samples()[0].density;
        prop_assert!((d.mass() - 1.0).abs() < 1e-10);
        prop_assert!(d.values().iter().all(|v| *v >= 0.0));
    }
}
