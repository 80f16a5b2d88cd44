//! Time evolution of densities under a rate operator.
//!
//! Evaluates `v(τ) = exp(G·τ)·v₀` without forming `exp(G·τ)` itself.
//! Short spans use a truncated Taylor series with scaling and shifting.
//! On operators small enough to hold densely, long spans use powers
//! `exp(G·h·2^j)` built by repeated squaring, so their cost grows with
//! `log τ`. The per-operator work (shift and shifted norm) is factored
//! once into an [`ExpmvPlan`]; a [`Propagator`] then serves any number
//! of sample times, advancing incrementally through a sorted sweep.
//!
//! Works against the [`RateOperator`](gapflow_core::RateOperator) trait,
//! so any conservative rate matrix can be propagated, not only the
//! diffusion-with-reset generator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod expmv;
pub mod metrics;
mod powers;
pub mod propagator;

pub use expmv::{ExpmvPlan, TaylorSchedule};
pub use metrics::PropagationMetrics;
pub use propagator::{propagate, Propagator, PropagatorConfig};
