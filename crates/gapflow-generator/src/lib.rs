//! Generator assembly for the price-gap jump-diffusion.
//!
//! [`GeneratorBuilder`] discretizes `κ·∂xx - θ·I + θ·δ₀` on a
//! [`GridSpec`](gapflow_space::GridSpec) under a chosen
//! [`BoundaryRegime`](gapflow_space::BoundaryRegime). The result is a
//! [`Generator`]: a conservative sparse rate matrix stored in CSR form
//! ([`SparseMatrix`]) that implements
//! [`RateOperator`](gapflow_core::RateOperator).

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod builder;
pub mod generator;
pub mod sparse;

pub use builder::{build_generator, GeneratorBuilder};
pub use generator::Generator;
pub use sparse::SparseMatrix;
