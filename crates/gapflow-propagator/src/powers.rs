//! Dense powers `exp(G·h·2^j)` built by repeated squaring.
//!
//! With `P_j = exp(G·h·2^j)` in hand, a span of length `k·h + r` costs
//! one dense product per set bit of `k` plus a single short Taylor step
//! for `r < h`, so the work grows with `log₂(τ/h)` instead of τ. For a
//! rate matrix every `P_j` is column-stochastic and entrywise
//! non-negative, and the chain converges to the projector onto the
//! stationary density. Once squaring stops changing the top level the
//! chain is marked settled and every higher power is taken to be equal
//! to it.

use gapflow_core::PropagateError;
use nalgebra::{DMatrix, DVector};

/// Relative change, in units of `n·ε`, below which a squaring counts as
/// a fixed point.
const SETTLE_FACTOR: f64 = 16.0;

/// Squares of a base transition matrix, grown on demand.
#[derive(Clone, Debug)]
pub(crate) struct PowerChain {
    step: f64,
    levels: Vec<DMatrix<f64>>,
    settled: bool,
}

impl PowerChain {
    /// Chain over `base = exp(G·step)`.
    pub(crate) fn new(base: DMatrix<f64>, step: f64) -> Self {
        Self {
            step,
            levels: vec![base],
            settled: false,
        }
    }

    /// Length `h` of the base step.
    pub(crate) fn step(&self) -> f64 {
        self.step
    }

    /// Number of levels built so far.
    pub(crate) fn len(&self) -> usize {
        self.levels.len()
    }

    pub(crate) fn is_settled(&self) -> bool {
        self.settled
    }

    /// Levels needed to apply `exp(G·h·k)`: the bit length of `k`.
    pub(crate) fn levels_for(k: u64) -> usize {
        (u64::BITS - k.leading_zeros()) as usize
    }

    /// Square until `count` levels exist or the chain settles. Returns
    /// the number of squarings performed.
    pub(crate) fn extend_to(&mut self, count: usize, tau: f64) -> Result<u64, PropagateError> {
        let mut squarings = 0;
        while self.levels.len() < count && !self.settled {
            let Some(last) = self.levels.last() else {
                break;
            };
            let next = last * last;
            squarings += 1;
            if let Some(flat) = next.iter().position(|x| !x.is_finite()) {
                return Err(PropagateError::NumericalInstability {
                    tau,
                    index: flat % next.nrows(),
                });
            }
            let change = (&next - last).amax();
            let bound = SETTLE_FACTOR * next.nrows() as f64 * f64::EPSILON * next.amax();
            if change <= bound {
                log::trace!("power chain settled at level {}", self.levels.len() - 1);
                self.settled = true;
            } else {
                self.levels.push(next);
            }
        }
        Ok(squarings)
    }

    /// Apply `exp(G·h·k)` to `x`, returning the result and the number
    /// of dense products used.
    ///
    /// The chain must already hold `levels_for(k)` levels or be settled.
    pub(crate) fn apply(&self, k: u64, x: Vec<f64>) -> (Vec<f64>, u64) {
        let top = self.levels.len() - 1;
        let mut x = DVector::from_vec(x);
        let mut products = 0;
        let mut beyond_top = false;
        for j in 0..Self::levels_for(k) {
            if (k >> j) & 1 == 0 {
                continue;
            }
            if self.settled && j >= top {
                beyond_top = true;
                continue;
            }
            x = &self.levels[j] * x;
            products += 1;
        }
        // Every power past a settled top equals it, and it is idempotent.
        if beyond_top {
            x = &self.levels[top] * x;
            products += 1;
        }
        (x.as_slice().to_vec(), products)
    }
}
