//! Sample-time sweeps over `exp(G·τ)·v`.

use std::time::Instant;

use nalgebra::DMatrix;

use crate::expmv::{ExpmvPlan, TaylorSchedule};
use crate::metrics::PropagationMetrics;
use crate::powers::PowerChain;
use gapflow_core::{Density, PropagateError, RateOperator, Trajectory, TrajectorySample};

/// `2^64` as a float: spans at least this many base steps long are
/// served only by a settled power chain.
const TWO_POW_64: f64 = 18_446_744_073_709_551_616.0;

/// Accuracy and work limits for a [`Propagator`].
#[derive(Clone, Debug, PartialEq)]
pub struct PropagatorConfig {
    /// Relative tolerance for truncating the Taylor series.
    /// Default: 2^-53 (unit roundoff).
    pub tolerance: f64,
    /// Largest operator dimension for which long spans may use dense
    /// powers of `exp(G·h)`. Zero keeps every span on the Taylor path.
    /// Default: 512.
    pub dense_limit: usize,
    /// Optional cap on Taylor substeps for a span that cannot use dense
    /// powers. Default: none.
    pub max_substeps: Option<u64>,
}

impl Default for PropagatorConfig {
    fn default() -> Self {
        Self {
            tolerance: f64::EPSILON / 2.0,
            dense_limit: 512,
            max_substeps: None,
        }
    }
}

impl PropagatorConfig {
    /// Check invariants, returning a description of the first violation.
    pub fn validate(&self) -> Result<(), String> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 || self.tolerance >= 1.0 {
            return Err(format!(
                "tolerance must be in (0, 1), got {}",
                self.tolerance
            ));
        }
        if self.max_substeps == Some(0) {
            return Err("max_substeps must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Evolves densities under a fixed [`RateOperator`].
///
/// The operator is factored once on construction; every later call
/// reuses the same [`ExpmvPlan`]. Each span is served by whichever of
/// two paths is estimated cheaper:
///
/// - the truncated Taylor action, linear in the span length;
/// - for operators up to [`PropagatorConfig::dense_limit`], dense powers
///   `exp(G·h·2^j)` built by squaring once per call and shared by every
///   span of the sweep, logarithmic in the span length.
///
/// ```
/// use gapflow_core::Density;
/// use gapflow_generator::build_generator;
/// use gapflow_propagator::Propagator;
/// use gapflow_space::{BoundaryRegime, GridSpec};
///
/// let grid = GridSpec::new(-1.0, 1.0, 0.1).unwrap();
/// let g = build_generator(&grid, 0.05, 0.2, BoundaryRegime::PeriodicReset).unwrap();
/// let start = Density::point_mass(21, 3, grid.step()).unwrap();
///
/// let traj = Propagator::new(&g).propagate(&start, &[5.0, 0.0, 1.0]).unwrap();
/// assert_eq!(traj.taus(), vec![5.0, 0.0, 1.0]);
/// for (_, d) in traj.iter() {
///     assert!((d.mass() - 1.0).abs() < 1e-10);
/// }
/// ```
#[derive(Debug)]
pub struct Propagator<'a, O: RateOperator + ?Sized> {
    op: &'a O,
    plan: ExpmvPlan,
    config: PropagatorConfig,
}

impl<'a, O: RateOperator + ?Sized> Propagator<'a, O> {
    /// Factor `op` with default tolerances.
    pub fn new(op: &'a O) -> Self {
        Self::with_config(op, PropagatorConfig::default())
    }

    /// Factor `op` with explicit tolerances.
    pub fn with_config(op: &'a O, config: PropagatorConfig) -> Self {
        Self {
            op,
            plan: ExpmvPlan::new(op),
            config,
        }
    }

    /// The factored plan.
    pub fn plan(&self) -> &ExpmvPlan {
        &self.plan
    }

    /// The active configuration.
    pub fn config(&self) -> &PropagatorConfig {
        &self.config
    }

    /// Evaluate the density at each time in `taus`.
    ///
    /// Samples come back in the caller's order; duplicates and unsorted
    /// input are allowed. Internally the times are visited in ascending
    /// order and each one is advanced from its predecessor.
    ///
    /// # Errors
    ///
    /// See [`PropagateError`]. Validation failures are reported before
    /// any work is done.
    pub fn propagate(&self, initial: &Density, taus: &[f64]) -> Result<Trajectory, PropagateError> {
        self.propagate_with_metrics(initial, taus).map(|(t, _)| t)
    }

    /// [`propagate`](Self::propagate), also returning work counters.
    pub fn propagate_with_metrics(
        &self,
        initial: &Density,
        taus: &[f64],
    ) -> Result<(Trajectory, PropagationMetrics), PropagateError> {
        let start = Instant::now();
        self.check_length(initial.len())?;
        for (index, &tau) in taus.iter().enumerate() {
            if !tau.is_finite() || tau < 0.0 {
                return Err(PropagateError::InvalidTime { index, tau });
            }
        }

        let mut order: Vec<usize> = (0..taus.len()).collect();
        order.sort_by(|&a, &b| taus[a].total_cmp(&taus[b]));

        let mut metrics = PropagationMetrics {
            samples: taus.len(),
            ..PropagationMetrics::default()
        };
        let mut results: Vec<Option<Density>> = vec![None; taus.len()];
        let mut current = initial.values().to_vec();
        let mut chain = None;
        let mut now = 0.0;
        for index in order {
            let tau = taus[index];
            let dt = tau - now;
            if dt > 0.0 {
                current = self.advance_span(&current, dt, tau, &mut chain, &mut metrics)?;
                metrics.spans += 1;
                now = tau;
            }
            results[index] = Some(Density::new(current.clone(), initial.step()));
        }

        let trajectory = results
            .into_iter()
            .zip(taus)
            .filter_map(|(density, &tau)| density.map(|density| TrajectorySample { tau, density }))
            .collect();
        metrics.total_us = start.elapsed().as_micros() as u64;
        log::debug!(
            "propagated {} samples over {} spans: {} substeps, {} matvecs, {} squarings, {}us",
            metrics.samples,
            metrics.spans,
            metrics.substeps,
            metrics.matvecs,
            metrics.squarings,
            metrics.total_us
        );
        Ok((trajectory, metrics))
    }

    /// `exp(G·t)·v` for a single span.
    ///
    /// # Errors
    ///
    /// [`PropagateError::LengthMismatch`], [`PropagateError::InvalidTime`]
    /// (reported with index 0), or any span failure listed on
    /// [`PropagateError`].
    pub fn advance(&self, v: &[f64], t: f64) -> Result<Vec<f64>, PropagateError> {
        self.check_length(v.len())?;
        if !t.is_finite() || t < 0.0 {
            return Err(PropagateError::InvalidTime { index: 0, tau: t });
        }
        if t == 0.0 {
            return Ok(v.to_vec());
        }
        let mut metrics = PropagationMetrics::default();
        self.advance_span(v, t, t, &mut None, &mut metrics)
    }

    fn check_length(&self, actual: usize) -> Result<(), PropagateError> {
        let expected = self.op.dim();
        if actual != expected {
            return Err(PropagateError::LengthMismatch { expected, actual });
        }
        Ok(())
    }

    /// Advance `v` by `t > 0`. `tau` is the absolute sample time, used
    /// only for error reports. `chain` carries dense powers between the
    /// spans of one sweep.
    fn advance_span(
        &self,
        v: &[f64],
        t: f64,
        tau: f64,
        chain: &mut Option<PowerChain>,
        metrics: &mut PropagationMetrics,
    ) -> Result<Vec<f64>, PropagateError> {
        let schedule = self.plan.schedule(t);
        if let Some(step) = self.dense_step(t, schedule, chain.as_ref()) {
            return self.advance_dense(v, t, tau, step, chain, metrics);
        }
        if let Some(budget) = self.config.max_substeps {
            if schedule.substeps > budget {
                return Err(PropagateError::StepBudgetExceeded {
                    required: schedule.substeps,
                    budget,
                });
            }
        }
        log::trace!(
            "span t={t:.6e} to tau={tau}: degree {}, {} substeps",
            schedule.degree,
            schedule.substeps
        );
        self.taylor(v, t, schedule, tau, metrics)
    }

    /// Base step for the dense path, if it should serve a span of
    /// length `t`.
    ///
    /// Costs are in multiply-adds. One Taylor term is an operator
    /// application plus four vector updates; a squaring is `n³`; a
    /// chain product is `n²`.
    fn dense_step(
        &self,
        t: f64,
        schedule: TaylorSchedule,
        chain: Option<&PowerChain>,
    ) -> Option<f64> {
        let n = self.op.dim();
        if n > self.config.dense_limit {
            return None;
        }
        let step = chain.map_or_else(|| self.plan.base_step(), |c| Some(c.step()))?;
        if self
            .config
            .max_substeps
            .is_some_and(|budget| schedule.substeps > budget)
        {
            return Some(step);
        }

        let nf = n as f64;
        let term = (self.op.nonzeros() + 4 * n) as f64;
        let step_cost = self.plan.schedule(step).cost() as f64 * term;
        let ratio = t / step;
        let levels = if ratio < TWO_POW_64 {
            PowerChain::levels_for(ratio as u64)
        } else {
            64
        };
        let (built, settled, base_cost) = match chain {
            Some(c) => (c.len(), c.is_settled(), 0.0),
            None => (1, false, nf * step_cost),
        };
        let squarings = if settled { 0 } else { levels.saturating_sub(built) };
        let dense_cost = base_cost
            + squarings as f64 * nf * nf * nf
            + (levels + 1) as f64 * nf * nf
            + step_cost;
        let taylor_cost = schedule.cost() as f64 * term;
        (dense_cost < taylor_cost).then_some(step)
    }

    /// Advance `v` by `t = k·step + rest` using the power chain for
    /// `k` and one Taylor step for `rest`.
    fn advance_dense(
        &self,
        v: &[f64],
        t: f64,
        tau: f64,
        step: f64,
        chain: &mut Option<PowerChain>,
        metrics: &mut PropagationMetrics,
    ) -> Result<Vec<f64>, PropagateError> {
        let mut powers = match chain.take() {
            Some(powers) => powers,
            None => self.power_chain(step, tau, metrics)?,
        };

        let ratio = t / step;
        let (k, rest) = if ratio < TWO_POW_64 {
            let k = ratio as u64;
            (k, (t - k as f64 * step).clamp(0.0, step))
        } else {
            metrics.squarings += powers.extend_to(65, tau)?;
            if !powers.is_settled() {
                return Err(PropagateError::UnresolvedHorizon { tau });
            }
            (u64::MAX, 0.0)
        };
        metrics.squarings += powers.extend_to(PowerChain::levels_for(k), tau)?;
        let (mut x, products) = powers.apply(k, v.to_vec());
        metrics.dense_products += products;
        if let Some(index) = x.iter().position(|value| !value.is_finite()) {
            return Err(PropagateError::NumericalInstability { tau, index });
        }
        if rest > 0.0 {
            x = self.taylor(&x, rest, self.plan.schedule(rest), tau, metrics)?;
        }
        log::trace!(
            "span t={t:.6e} to tau={tau}: {k} base steps, {} chain levels{}",
            powers.len(),
            if powers.is_settled() { " (settled)" } else { "" }
        );
        *chain = Some(powers);
        Ok(x)
    }

    /// `exp(G·step)` column by column.
    fn power_chain(
        &self,
        step: f64,
        tau: f64,
        metrics: &mut PropagationMetrics,
    ) -> Result<PowerChain, PropagateError> {
        let n = self.op.dim();
        let schedule = self.plan.schedule(step);
        let mut base = DMatrix::zeros(n, n);
        let mut unit = vec![0.0; n];
        for j in 0..n {
            unit[j] = 1.0;
            let column = self.taylor(&unit, step, schedule, tau, metrics)?;
            base.column_mut(j).copy_from_slice(&column);
            unit[j] = 0.0;
        }
        log::debug!("power chain base: n={n}, step={step:.6e}");
        Ok(PowerChain::new(base, step))
    }

    /// Truncated Taylor action of `exp(G·t)` on `v` under `schedule`.
    fn taylor(
        &self,
        v: &[f64],
        t: f64,
        schedule: TaylorSchedule,
        tau: f64,
        metrics: &mut PropagationMetrics,
    ) -> Result<Vec<f64>, PropagateError> {
        let n = v.len();
        let mu = self.plan.shift();
        let tol = self.config.tolerance;
        let h = t / schedule.substeps as f64;
        let eta = (mu * h).exp();

        let mut f = v.to_vec();
        let mut b = v.to_vec();
        let mut ab = vec![0.0; n];
        for _ in 0..schedule.substeps {
            let mut c1 = inf_norm(&b);
            for k in 1..=schedule.degree {
                self.op.apply(&b, &mut ab);
                metrics.matvecs += 1;
                let coeff = h / k as f64;
                for (bi, abi) in b.iter_mut().zip(&ab) {
                    *bi = coeff * (abi - mu * *bi);
                }
                let c2 = inf_norm(&b);
                for (fi, bi) in f.iter_mut().zip(&b) {
                    *fi += bi;
                }
                if c1 + c2 <= tol * inf_norm(&f) {
                    break;
                }
                c1 = c2;
            }
            for fi in f.iter_mut() {
                *fi *= eta;
            }
            if let Some(index) = f.iter().position(|x| !x.is_finite()) {
                return Err(PropagateError::NumericalInstability { tau, index });
            }
            b.copy_from_slice(&f);
            metrics.substeps += 1;
        }
        Ok(f)
    }
}

fn inf_norm(x: &[f64]) -> f64 {
    x.iter().fold(0.0, |m: f64, v| m.max(v.abs()))
}

/// Evaluate `exp(G·τ)·initial` for each τ with default tolerances.
///
/// Shorthand for `Propagator::new(generator).propagate(initial, taus)`.
pub fn propagate<O: RateOperator + ?Sized>(
    generator: &O,
    initial: &Density,
    taus: &[f64],
) -> Result<Trajectory, PropagateError> {
    Propagator::new(generator).propagate(initial, taus)
}
