//! Model parameters for the diffusion-with-reset process.

use crate::error::GeneratorError;

/// Diffusivity and reset intensity of the price-gap process.
///
/// `kappa` scales the diffusion term `κ·∂xx`; `theta` is the Poisson
/// rate at which the state jumps back to the reset point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Parameters {
    kappa: f64,
    theta: f64,
}

impl Parameters {
    /// Validate and bundle κ and θ.
    ///
    /// Returns `Err(GeneratorError::InvalidParameter)` if either value is
    /// negative, NaN, or infinite.
    ///
    /// ```
    /// use gapflow_core::Parameters;
    ///
    /// assert!(Parameters::new(0.05, 0.1).is_ok());
    /// assert!(Parameters::new(0.05, -0.1).is_err());
    /// ```
    pub fn new(kappa: f64, theta: f64) -> Result<Self, GeneratorError> {
        check_rate("kappa", kappa)?;
        check_rate("theta", theta)?;
        Ok(Self { kappa, theta })
    }

    /// Diffusivity κ.
    pub fn kappa(&self) -> f64 {
        self.kappa
    }

    /// Reset intensity θ.
    pub fn theta(&self) -> f64 {
        self.theta
    }
}

fn check_rate(name: &'static str, value: f64) -> Result<(), GeneratorError> {
    if !value.is_finite() || value < 0.0 {
        return Err(GeneratorError::InvalidParameter { name, value });
    }
    Ok(())
}
