//! The engine-level error wrapping every pipeline stage.

use std::error::Error;
use std::fmt;

use crate::config::ConfigError;
use gapflow_core::{GeneratorError, PropagateError, ShockError, SolveError};
use gapflow_space::GridError;

/// Any failure from running a scenario, tagged by stage.
#[derive(Clone, Debug, PartialEq)]
pub enum ScenarioError {
    /// The configuration failed validation.
    Config(ConfigError),
    /// Grid construction failed.
    Grid(GridError),
    /// Generator construction failed.
    Generator(GeneratorError),
    /// The stationary solve failed.
    Solve(SolveError),
    /// Time propagation failed.
    Propagate(PropagateError),
    /// Shock construction failed.
    Shock(ShockError),
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Grid(e) => write!(f, "grid: {e}"),
            Self::Generator(e) => write!(f, "generator: {e}"),
            Self::Solve(e) => write!(f, "stationary solve: {e}"),
            Self::Propagate(e) => write!(f, "propagation: {e}"),
            Self::Shock(e) => write!(f, "shock: {e}"),
        }
    }
}

impl Error for ScenarioError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            Self::Grid(e) => Some(e),
            Self::Generator(e) => Some(e),
            Self::Solve(e) => Some(e),
            Self::Propagate(e) => Some(e),
            Self::Shock(e) => Some(e),
        }
    }
}

impl From<ConfigError> for ScenarioError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<GridError> for ScenarioError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<GeneratorError> for ScenarioError {
    fn from(e: GeneratorError) -> Self {
        Self::Generator(e)
    }
}

impl From<SolveError> for ScenarioError {
    fn from(e: SolveError) -> Self {
        Self::Solve(e)
    }
}

impl From<PropagateError> for ScenarioError {
    fn from(e: PropagateError) -> Self {
        Self::Propagate(e)
    }
}

impl From<ShockError> for ScenarioError {
    fn from(e: ShockError) -> Self {
        Self::Shock(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_stage() {
        let e = ScenarioError::from(SolveError::DegenerateNullSpace { dimension: 3 });
        let msg = format!("{e}");
        assert!(msg.starts_with("stationary solve: "));
        assert!(msg.contains("dimension 3"));
    }

    #[test]
    fn source_is_the_wrapped_error() {
        let inner = ShockError::InvalidDisplacement {
            displacement: 5,
            node_count: 5,
        };
        let e = ScenarioError::from(inner.clone());
        let src = e.source().unwrap();
        assert_eq!(src.to_string(), inner.to_string());
    }
}
