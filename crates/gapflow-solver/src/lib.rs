//! Stationary distribution of a gapflow generator.
//!
//! The stationary density is the right null vector of the generator,
//! `G·v = 0`, normalized to unit mass. [`StationarySolver`] finds it
//! with a singular value decomposition, checks that the null space is
//! one-dimensional, fixes the arbitrary sign, and rejects vectors that
//! are not a valid density.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod stationary;

pub use config::SolverConfig;
pub use stationary::{solve_stationary, StationarySolver};
