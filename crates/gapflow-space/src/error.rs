//! Error types for grid construction.

use std::fmt;

/// Errors arising from grid construction (the invalid-grid failure kind).
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// `step` is zero, negative, or not finite.
    InvalidStep {
        /// The offending step.
        step: f64,
    },
    /// `x_max <= x_min`, or a bound is not finite.
    InvalidBounds {
        /// Lower bound.
        x_min: f64,
        /// Upper bound.
        x_max: f64,
    },
    /// The grid would have more nodes than [`GridSpec::MAX_NODES`](crate::GridSpec::MAX_NODES).
    TooManyNodes {
        /// Node count implied by the bounds and step.
        count: f64,
        /// Maximum supported.
        max: usize,
    },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidStep { step } => {
                write!(f, "invalid grid: step must be finite and positive, got {step}")
            }
            Self::InvalidBounds { x_min, x_max } => {
                write!(f, "invalid grid: bounds [{x_min}, {x_max}] must be finite with x_max > x_min")
            }
            Self::TooManyNodes { count, max } => {
                write!(f, "invalid grid: {count} nodes exceeds maximum of {max}")
            }
        }
    }
}

impl std::error::Error for GridError {}
