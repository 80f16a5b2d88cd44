//! gapflow: price-gap distributions under diffusion with reset.
//!
//! A scalar state diffuses with intensity κ and is reset to 0 at rate θ.
//! gapflow discretizes this process on a truncated grid, solves for the
//! stationary distribution, and propagates arbitrary (for example,
//! shocked) distributions forward in time.
//!
//! This is the top-level facade crate that re-exports the public API
//! from all gapflow sub-crates.
//!
//! # Quick start
//!
//! ```rust
//! use gapflow::prelude::*;
//!
//! let grid = GridSpec::new(-1.0, 1.0, 0.05).unwrap();
//! let g = GeneratorBuilder::new(grid)
//!     .kappa(0.05)
//!     .theta(0.2)
//!     .regime(BoundaryRegime::PeriodicReset)
//!     .build()
//!     .unwrap();
//!
//! let stationary = solve_stationary(&g).unwrap();
//! assert!((stationary.mass() - 1.0).abs() < 1e-10);
//!
//! // Shift the cross-section up by 5 nodes and watch it relax.
//! let shocked = shock(&stationary, &grid, 5).unwrap();
//! let traj = propagate(&g, &shocked, &[0.0, 1.0, 10.0]).unwrap();
//! let nodes = grid.nodes();
//! let means: Vec<f64> = traj.iter().map(|(_, d)| d.mean(&nodes)).collect();
//! assert!(means[2] < means[0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `gapflow-core` | `Density`, `Trajectory`, errors, `RateOperator` |
//! | [`space`] | `gapflow-space` | `GridSpec`, `BoundaryRegime` |
//! | [`generator`] | `gapflow-generator` | Generator assembly and CSR storage |
//! | [`solver`] | `gapflow-solver` | Stationary solve |
//! | [`propagator`] | `gapflow-propagator` | Matrix-exponential action |
//! | [`engine`] | `gapflow-engine` | Scenarios, shocks, sweeps |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core value types, errors, and the [`types::RateOperator`] trait
/// (`gapflow-core`).
pub use gapflow_core as types;

/// Grids and boundary regimes (`gapflow-space`).
pub use gapflow_space as space;

/// Generator assembly (`gapflow-generator`).
pub use gapflow_generator as generator;

/// Stationary density via the generator's null vector (`gapflow-solver`).
pub use gapflow_solver as solver;

/// Time evolution (`gapflow-propagator`).
pub use gapflow_propagator as propagator;

/// Scenario configuration, impulse responses, and sweeps (`gapflow-engine`).
pub use gapflow_engine as engine;

/// Common imports for typical gapflow usage.
///
/// ```rust
/// use gapflow::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use gapflow_core::{Density, Parameters, RateOperator, Trajectory, TrajectorySample};

    // Errors
    pub use gapflow_core::{GeneratorError, PropagateError, ShockError, SolveError};
    pub use gapflow_space::GridError;

    // Grid
    pub use gapflow_space::{BoundaryRegime, GridSpec};

    // Generator
    pub use gapflow_generator::{build_generator, Generator, GeneratorBuilder};

    // Solver
    pub use gapflow_solver::{solve_stationary, SolverConfig, StationarySolver};

    // Propagator
    pub use gapflow_propagator::{propagate, PropagationMetrics, Propagator, PropagatorConfig};

    // Engine
    pub use gapflow_engine::{
        shock, theta_sweep, ConfigError, ImpulseResponse, ImpulseResponseBuilder, Scenario,
        ScenarioConfig, ScenarioError, ScenarioReport, Study,
    };
}
