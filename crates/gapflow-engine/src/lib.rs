//! Scenario orchestration for the gapflow pipeline.
//!
//! Ties the stages together: a validated [`ScenarioConfig`] builds a
//! [`Scenario`], which solves for the stationary density, shocks it with
//! an [`ImpulseResponseBuilder`], and propagates the shocked density
//! back toward equilibrium. [`theta_sweep`] and [`Study`] run families
//! of scenarios.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod impulse;
pub mod scenario;
pub mod sweep;

pub use config::{ConfigError, ScenarioConfig};
pub use error::ScenarioError;
pub use impulse::{shock, ImpulseResponse, ImpulseResponseBuilder};
pub use scenario::{Scenario, ScenarioMetrics, ScenarioReport};
pub use sweep::{theta_sweep, Study};
