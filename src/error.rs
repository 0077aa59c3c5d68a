use num_traits::float::FloatCore;

#[cfg(feature = "std")]
use thiserror::Error;

/// Reasons a controller configuration is rejected by `validate`.
///
/// Validation is opt-in: `update` never checks its configuration, and a bad
/// one shows up as `NaN` or `±inf` in the controller state instead.
#[cfg_attr(feature = "std", derive(Error))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    /// A gain is `NaN` or infinite.
    #[cfg_attr(feature = "std", error("gain is NaN or infinite"))]
    NonFiniteGain,
    /// The output limits are `NaN` or `output_min > output_max`.
    #[cfg_attr(feature = "std", error("output limits are flipped or NaN"))]
    InvalidOutputLimits,
    /// The integral limits are `NaN` or `integral_min > integral_max`.
    #[cfg_attr(feature = "std", error("integral limits are flipped or NaN"))]
    InvalidIntegralLimits,
    /// The derivative low-pass time constant is zero.
    #[cfg_attr(feature = "std", error("low-pass time constant is zero"))]
    ZeroLowPassTimeConstant,
    /// The integral discharge time constant is zero.
    #[cfg_attr(feature = "std", error("integral discharge time constant is zero"))]
    ZeroDischargeTimeConstant,
}

pub(crate) fn check_gains<T: FloatCore>(gains: &[T]) -> Result<(), ConfigError> {
    if gains.iter().all(|gain| gain.is_finite()) {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteGain)
    }
}

// Fails on NaN as well as on a flipped range.
pub(crate) fn check_limits<T: FloatCore>(lo: T, hi: T, error: ConfigError) -> Result<(), ConfigError> {
    if lo <= hi {
        Ok(())
    } else {
        Err(error)
    }
}
