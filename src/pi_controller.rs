//! PI controller whose integral is clamped directly.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::time::Duration;
use num_traits::float::FloatCore;

use crate::error::{check_gains, check_limits, ConfigError};
use crate::float::{clamp, seconds};
use crate::Pid;

/// Gains and integral bounds for a [`PiController`].
///
/// `integral_min <= integral_max` is expected but only checked by
/// [`validate`](Self::validate).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PiControllerConfig<T: FloatCore = f32> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Lower bound of the accumulated error integral
    pub integral_min: T,
    /// Upper bound of the accumulated error integral
    pub integral_max: T,
}

impl<T: FloatCore> PiControllerConfig<T> {
    /// Checks gains and integral bounds.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gains(&[self.kp, self.ki])?;
        check_limits(
            self.integral_min,
            self.integral_max,
            ConfigError::InvalidIntegralLimits,
        )
    }
}

/// Mutable state of a [`PiController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PiControllerState<T: FloatCore = f32> {
    /// Control error integrated over time, kept within the configured bounds
    pub integral: T,
    /// Controller output
    pub output: T,
}

impl<T: FloatCore> Default for PiControllerState<T> {
    fn default() -> Self {
        Self {
            integral: T::zero(),
            output: T::zero(),
        }
    }
}

/// Per-cycle input to a [`PiController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PiControllerInput<T: FloatCore = f32> {
    /// Value the loop is driving towards
    pub setpoint: T,
    /// Current value of the controlled signal
    pub measurement: T,
    /// Time elapsed since the previous update
    pub dt: Duration,
}

/// PI controller with anti-windup by clamping the integral after every step.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct PiController<T: FloatCore = f32> {
    /// Tuning parameters
    pub config: PiControllerConfig<T>,
    /// Current state
    pub state: PiControllerState<T>,
}

impl<T: FloatCore> PiController<T> {
    /// Create a controller with zeroed state. The configuration is not checked.
    pub fn new(config: PiControllerConfig<T>) -> Self {
        Self {
            config,
            state: PiControllerState::default(),
        }
    }

    /// Create a controller after validating its configuration.
    pub fn try_new(config: PiControllerConfig<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Advance the controller by one sampling interval.
    pub fn update(&mut self, input: PiControllerInput<T>) {
        let error = input.setpoint - input.measurement;
        self.state.integral = clamp(
            self.state.integral + error * seconds::<T>(input.dt),
            self.config.integral_min,
            self.config.integral_max,
        );
        self.state.output = self.config.kp * error + self.config.ki * self.state.integral;
    }

    /// Zero all state.
    pub fn reset(&mut self) {
        self.state = PiControllerState::default();
    }
}

impl<T: FloatCore> Pid for PiController<T> {
    type Input = PiControllerInput<T>;
    type State = PiControllerState<T>;

    fn update(&mut self, input: Self::Input) {
        PiController::update(self, input)
    }

    fn reset(&mut self) {
        PiController::reset(self)
    }

    fn state(&self) -> &Self::State {
        &self.state
    }
}
