//! Degree and scaling selection for the truncated-Taylor exponential.
//!
//! For `exp(t·A)·v` with `A = G - μI`, the series is truncated at degree
//! `m` and the span split into `s` substeps so that `‖A‖₁·t/s ≤ θ_m`,
//! where `θ_m` bounds the backward error of the degree-`m` truncation at
//! double precision. Among admissible pairs the one with the fewest
//! operator applications (`m·s`) wins.

use gapflow_core::RateOperator;

/// `(m, θ_m)` for unit roundoff 2^-53.
const THETA: [(usize, f64); 35] = [
    (1, 2.29e-16),
    (2, 2.58e-8),
    (3, 1.39e-5),
    (4, 3.40e-4),
    (5, 2.40e-3),
    (6, 9.07e-3),
    (7, 2.38e-2),
    (8, 5.00e-2),
    (9, 8.96e-2),
    (10, 1.44e-1),
    (11, 2.14e-1),
    (12, 3.00e-1),
    (13, 4.00e-1),
    (14, 5.14e-1),
    (15, 6.41e-1),
    (16, 7.81e-1),
    (17, 9.31e-1),
    (18, 1.09),
    (19, 1.26),
    (20, 1.44),
    (21, 1.62),
    (22, 1.82),
    (23, 2.01),
    (24, 2.22),
    (25, 2.43),
    (26, 2.64),
    (27, 2.86),
    (28, 3.08),
    (29, 3.31),
    (30, 3.54),
    (35, 4.7),
    (40, 6.0),
    (45, 7.2),
    (50, 8.5),
    (55, 9.9),
];

/// `‖G - μI‖₁·h` for the dense base step `h`. Sits inside `θ_50` so a
/// single substep covers it.
const BASE_THETA: f64 = 8.0;

/// Taylor degree and substep count for one span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TaylorSchedule {
    /// Maximum Taylor degree per substep.
    pub degree: usize,
    /// Number of equal substeps the span is split into.
    pub substeps: u64,
}

impl TaylorSchedule {
    /// Upper bound on operator applications for the span.
    pub fn cost(&self) -> u64 {
        (self.degree as u64).saturating_mul(self.substeps)
    }
}

/// Per-operator factorization shared by every span of a sweep.
///
/// Holds the shift `μ = min(min diag(G), 0)` and `‖G - μI‖₁`. For a
/// rate matrix the shifted matrix is entrywise non-negative, so the
/// Taylor terms never cancel and the shifted norm equals `|μ|`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExpmvPlan {
    shift: f64,
    norm: f64,
}

impl ExpmvPlan {
    /// Factor `op`.
    pub fn new<O: RateOperator + ?Sized>(op: &O) -> Self {
        let shift = op.diagonal().into_iter().fold(0.0, f64::min);
        let norm = op.shifted_one_norm(shift);
        log::debug!(
            "expmv plan: n={}, shift={shift:.6e}, shifted norm={norm:.6e}",
            op.dim()
        );
        Self { shift, norm }
    }

    /// The diagonal shift μ.
    pub fn shift(&self) -> f64 {
        self.shift
    }

    /// `‖G - μI‖₁`.
    pub fn norm(&self) -> f64 {
        self.norm
    }

    /// Schedule for a span of length `t >= 0`.
    pub fn schedule(&self, t: f64) -> TaylorSchedule {
        select(self.norm * t)
    }

    /// Longest span a single Taylor substep covers, or `None` when the
    /// shifted operator is zero and every span is a scalar factor.
    pub fn base_step(&self) -> Option<f64> {
        (self.norm > 0.0 && self.norm.is_finite()).then(|| BASE_THETA / self.norm)
    }
}

/// Cheapest `(m, s)` with `s·θ_m >= norm_t`.
///
/// A zero product needs no Taylor terms: the exponential reduces to the
/// scalar factor `exp(μt)`.
pub(crate) fn select(norm_t: f64) -> TaylorSchedule {
    if norm_t <= 0.0 {
        return TaylorSchedule {
            degree: 0,
            substeps: 1,
        };
    }
    let mut best = TaylorSchedule {
        degree: THETA[THETA.len() - 1].0,
        substeps: u64::MAX,
    };
    let mut best_cost = f64::INFINITY;
    for &(m, theta) in &THETA {
        let s = (norm_t / theta).ceil().max(1.0);
        let cost = m as f64 * s;
        if cost < best_cost {
            best_cost = cost;
            // Float-to-int casts saturate, so absurd spans land on
            // u64::MAX and trip the substep budget.
            best = TaylorSchedule {
                degree: m,
                substeps: s as u64,
            };
        }
    }
    best
}
