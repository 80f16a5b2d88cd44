//! Error types for the gapflow pipeline.
//!
//! One enum per subsystem: generator construction, stationary solve,
//! time propagation, and shock construction. Grid errors live next to
//! the grid in `gapflow-space`.

use std::error::Error;
use std::fmt;

/// Errors from generator construction.
///
/// Both variants are the "invalid parameter" failure kind: the caller
/// must change κ, θ, or the grid before rebuilding.
#[derive(Clone, Debug, PartialEq)]
pub enum GeneratorError {
    /// κ or θ is negative, NaN, or infinite.
    InvalidParameter {
        /// Parameter name (`"kappa"` or `"theta"`).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
    /// The reset point 0 lies outside the grid, so no reset node exists.
    NoResetNode {
        /// Lower grid bound.
        x_min: f64,
        /// Upper grid bound.
        x_max: f64,
    },
}

impl fmt::Display for GeneratorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParameter { name, value } => {
                write!(f, "invalid parameter: {name} must be finite and >= 0, got {value}")
            }
            Self::NoResetNode { x_min, x_max } => {
                write!(f, "invalid parameter: reset point 0 outside grid [{x_min}, {x_max}]")
            }
        }
    }
}

impl Error for GeneratorError {}

/// Errors from the stationary solve.
#[derive(Clone, Debug, PartialEq)]
pub enum SolveError {
    /// The numerical null space does not have dimension one.
    DegenerateNullSpace {
        /// Number of singular values at or below the rank tolerance.
        dimension: usize,
    },
    /// The sign-corrected null vector has a significantly negative entry.
    NegativeDensity {
        /// Index of the most negative entry.
        index: usize,
        /// Its value relative to the largest entry magnitude.
        value: f64,
    },
    /// The decomposition did not produce right singular vectors.
    DecompositionFailed,
    /// The generator is too large for the dense decomposition.
    TooLarge {
        /// Generator dimension.
        node_count: usize,
        /// Configured dense limit.
        limit: usize,
    },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DegenerateNullSpace { dimension } => {
                write!(f, "degenerate null space: dimension {dimension}, expected 1")
            }
            Self::NegativeDensity { index, value } => {
                write!(f, "negative density {value:e} at node {index}")
            }
            Self::DecompositionFailed => write!(f, "singular value decomposition failed"),
            Self::TooLarge { node_count, limit } => {
                write!(f, "{node_count} nodes exceed the dense solve limit of {limit}")
            }
        }
    }
}

impl Error for SolveError {}

/// Errors from the time propagator.
#[derive(Clone, Debug, PartialEq)]
pub enum PropagateError {
    /// A non-finite value appeared while evaluating `exp(G·τ)·v`.
    NumericalInstability {
        /// The sample time being evaluated.
        tau: f64,
        /// Index of the first non-finite entry.
        index: usize,
    },
    /// The initial density does not match the operator dimension.
    LengthMismatch {
        /// Operator dimension.
        expected: usize,
        /// Density length.
        actual: usize,
    },
    /// A sample time is negative or non-finite.
    InvalidTime {
        /// Position in the caller's sample list.
        index: usize,
        /// The rejected value.
        tau: f64,
    },
    /// The Taylor substeps required for a span exceed a caller-set budget.
    StepBudgetExceeded {
        /// Substeps the span would need.
        required: u64,
        /// Configured maximum.
        budget: u64,
    },
    /// The span is longer than `2^64` base steps and repeated squaring
    /// never reached a fixed point. Rate matrices always settle.
    UnresolvedHorizon {
        /// The sample time being evaluated.
        tau: f64,
    },
}

impl fmt::Display for PropagateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NumericalInstability { tau, index } => {
                write!(f, "numerical instability at tau={tau}: non-finite value at node {index}")
            }
            Self::LengthMismatch { expected, actual } => {
                write!(f, "density has {actual} entries, operator has dimension {expected}")
            }
            Self::InvalidTime { index, tau } => {
                write!(f, "sample {index}: tau must be finite and >= 0, got {tau}")
            }
            Self::StepBudgetExceeded { required, budget } => {
                write!(f, "span needs {required} substeps, budget is {budget}")
            }
            Self::UnresolvedHorizon { tau } => {
                write!(f, "tau={tau}: powers of the base transition matrix did not settle")
            }
        }
    }
}

impl Error for PropagateError {}

/// Errors from shock (shifted initial condition) construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShockError {
    /// The shift would move every node off the grid.
    InvalidDisplacement {
        /// Requested displacement in nodes.
        displacement: i64,
        /// Grid node count.
        node_count: usize,
    },
    /// The density does not match the grid.
    LengthMismatch {
        /// Grid node count.
        expected: usize,
        /// Density length.
        actual: usize,
    },
}

impl fmt::Display for ShockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidDisplacement {
                displacement,
                node_count,
            } => write!(
                f,
                "invalid displacement: |{displacement}| must be below node count {node_count}"
            ),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "density has {actual} entries, grid has {expected} nodes")
            }
        }
    }
}

impl Error for ShockError {}
