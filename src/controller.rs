//! Basic PID controller: no saturation, no derivative filtering, no anti-windup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::time::Duration;
use num_traits::float::FloatCore;

use crate::error::{check_gains, ConfigError};
use crate::float::seconds;
use crate::Pid;

/// Gains for a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ControllerConfig<T: FloatCore = f32> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Derivative gain
    pub kd: T,
}

impl<T: FloatCore> ControllerConfig<T> {
    /// Checks that every gain is finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gains(&[self.kp, self.ki, self.kd])
    }
}

/// Mutable state of a [`Controller`], updated in place every cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState<T: FloatCore = f32> {
    /// Setpoint minus measurement
    pub error: T,
    /// Control error integrated over time
    pub integral: T,
    /// Unfiltered rate of change of the control error
    pub derivative: T,
    /// Controller output
    pub output: T,
}

impl<T: FloatCore> Default for ControllerState<T> {
    fn default() -> Self {
        Self {
            error: T::zero(),
            integral: T::zero(),
            derivative: T::zero(),
            output: T::zero(),
        }
    }
}

/// Per-cycle input to a [`Controller`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct ControllerInput<T: FloatCore = f32> {
    /// Value the loop is driving towards
    pub setpoint: T,
    /// Current value of the controlled signal
    pub measurement: T,
    /// Time elapsed since the previous update; must be non-zero
    pub dt: Duration,
}

/// Textbook PID controller.
///
/// The derivative is the raw finite difference of the error and the integral
/// is unbounded, so this controller suits clean signals and plants that never
/// saturate. Reach for [`AntiWindupController`](crate::AntiWindupController)
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct Controller<T: FloatCore = f32> {
    /// Tuning parameters
    pub config: ControllerConfig<T>,
    /// Current state
    pub state: ControllerState<T>,
}

impl<T: FloatCore> Controller<T> {
    /// Create a controller with zeroed state. The configuration is not checked.
    pub fn new(config: ControllerConfig<T>) -> Self {
        Self {
            config,
            state: ControllerState::default(),
        }
    }

    /// Create a controller after validating its configuration.
    pub fn try_new(config: ControllerConfig<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Advance the controller by one sampling interval.
    pub fn update(&mut self, input: ControllerInput<T>) {
        let dt = seconds::<T>(input.dt);
        let previous_error = self.state.error;

        self.state.error = input.setpoint - input.measurement;
        self.state.derivative = (self.state.error - previous_error) / dt;
        self.state.integral = self.state.integral + self.state.error * dt;
        self.state.output = self.config.kp * self.state.error
            + self.config.ki * self.state.integral
            + self.config.kd * self.state.derivative;
    }

    /// Zero all state.
    pub fn reset(&mut self) {
        self.state = ControllerState::default();
    }
}

impl<T: FloatCore> Pid for Controller<T> {
    type Input = ControllerInput<T>;
    type State = ControllerState<T>;

    fn update(&mut self, input: Self::Input) {
        Controller::update(self, input)
    }

    fn reset(&mut self) {
        Controller::reset(self)
    }

    fn state(&self) -> &Self::State {
        &self.state
    }
}
