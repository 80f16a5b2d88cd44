//! Discretized state space for gapflow.
//!
//! This crate defines the truncated one-dimensional grid on which the
//! price gap lives, and the boundary regime that decides how the
//! generator treats the grid's edges.
//!
//! # Types
//!
//! - [`GridSpec`]: uniform grid over `[x_min, x_max]` with a fixed step
//! - [`BoundaryRegime`]: periodic (wrap through the reset node) or
//!   reflecting (no-flux) edge treatment

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod grid;
pub mod regime;

pub use error::GridError;
pub use grid::GridSpec;
pub use regime::BoundaryRegime;
