//! Test utilities and mock types for gapflow development.
//!
//! Provides a dense mock of [`RateOperator`] for checking the
//! propagator against closed forms, standard grids and generators,
//! and tolerance assertions shared by the crate test suites.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

pub use fixtures::*;

use gapflow_core::{Density, RateOperator};

/// Mock implementation of [`RateOperator`] backed by a dense row-major
/// matrix.
///
/// Useful for small hand-written chains whose matrix exponential has a
/// closed form.
#[derive(Clone, Debug)]
pub struct DenseOperator {
    n: usize,
    entries: Vec<f64>,
}

impl DenseOperator {
    /// Build from rows. All rows must have the same length as the
    /// number of rows.
    pub fn from_rows(rows: &[&[f64]]) -> Self {
        let n = rows.len();
        let mut entries = Vec::with_capacity(n * n);
        for row in rows {
            assert_eq!(row.len(), n, "DenseOperator must be square");
            entries.extend_from_slice(row);
        }
        Self { n, entries }
    }

    /// Two-state chain: mass moves 0 → 1 at rate `a` and 1 → 0 at rate `b`.
    pub fn two_state(a: f64, b: f64) -> Self {
        Self::from_rows(&[&[-a, b], &[a, -b]])
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.entries[i * self.n + j]
    }
}

impl RateOperator for DenseOperator {
    fn dim(&self) -> usize {
        self.n
    }

    fn apply(&self, x: &[f64], y: &mut [f64]) {
        for (i, yi) in y.iter_mut().enumerate() {
            *yi = (0..self.n).map(|j| self.get(i, j) * x[j]).sum();
        }
    }

    fn diagonal(&self) -> Vec<f64> {
        (0..self.n).map(|i| self.get(i, i)).collect()
    }

    fn one_norm(&self) -> f64 {
        self.shifted_one_norm(0.0)
    }

    fn shifted_one_norm(&self, shift: f64) -> f64 {
        (0..self.n)
            .map(|j| {
                (0..self.n)
                    .map(|i| {
                        let a = self.get(i, j);
                        if i == j { (a - shift).abs() } else { a.abs() }
                    })
                    .sum::<f64>()
            })
            .fold(0.0, f64::max)
    }
}

/// Assert that `d` has mass `expected` within `tol`.
pub fn assert_mass(d: &Density, expected: f64, tol: f64) {
    let mass = d.mass();
    assert!(
        (mass - expected).abs() <= tol,
        "mass {mass} differs from {expected} by more than {tol}"
    );
}

/// Assert every entry is >= `-tol`.
pub fn assert_non_negative(d: &Density, tol: f64) {
    for (i, v) in d.values().iter().enumerate() {
        assert!(*v >= -tol, "negative density {v} at node {i}");
    }
}

/// Assert two densities agree pointwise within `tol` relative to the
/// larger peak.
pub fn assert_density_close(a: &Density, b: &Density, tol: f64) {
    assert_eq!(a.len(), b.len(), "density lengths differ");
    let peak = a
        .values()
        .iter()
        .chain(b.values())
        .fold(0.0, |m: f64, v| m.max(v.abs()));
    let diff = a.max_abs_diff(b);
    assert!(
        diff <= tol * peak.max(1.0),
        "densities differ by {diff} (peak {peak}, tol {tol})"
    );
}
