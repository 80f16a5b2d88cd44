//! Core types and traits for the gapflow workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the value types that flow between pipeline stages ([`Density`],
//! [`Trajectory`], [`Parameters`]), the per-subsystem error enums, and
//! the [`RateOperator`] trait through which the propagator sees a
//! generator.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod density;
pub mod error;
pub mod params;
pub mod traits;
pub mod trajectory;

pub use density::Density;
pub use error::{GeneratorError, PropagateError, ShockError, SolveError};
pub use params::Parameters;
pub use traits::RateOperator;
pub use trajectory::{Trajectory, TrajectorySample};
