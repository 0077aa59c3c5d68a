//! PID controller with a low-pass filtered derivative, feed-forward, output
//! saturation and anti-windup.
//!
//! The anti-windup scheme models the actuator saturation: the difference
//! between the saturated and the unsaturated output is fed back into the
//! integrand, scaled by `antiwindup_gain`, so the integral stops growing in
//! the direction the actuator can no longer follow. See chapter 6 of Åström
//! and Murray, *Feedback Systems*, 2008.
//!
//! Error, integrand, integral and derivative are kept finite by saturating
//! them to `[-T::max_value(), T::max_value()]` after every update. `NaN` is
//! not clamped.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::time::Duration;
use num_traits::float::FloatCore;

use crate::error::{check_gains, check_limits, ConfigError};
use crate::float::{clamp, discharge_factor, saturate, seconds};
use crate::Pid;

/// Tuning parameters for an [`AntiWindupController`].
///
/// `output_min <= output_max` and non-zero time constants are the caller's
/// responsibility; [`validate`](Self::validate) checks them on request.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct AntiWindupControllerConfig<T: FloatCore = f32> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Derivative gain
    pub kd: T,
    /// Gain of the saturation feedback into the integrand
    pub antiwindup_gain: T,
    /// Time for [`AntiWindupController::discharge_integral`] to fully drain the integral
    pub integral_discharge_time_constant: Duration,
    /// Derivative low-pass filter time constant; the cut-off frequency is its inverse
    pub low_pass_time_constant: Duration,
    /// Lower output bound
    pub output_min: T,
    /// Upper output bound
    pub output_max: T,
}

impl<T: FloatCore> AntiWindupControllerConfig<T> {
    /// Checks gains, output limits and time constants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_gains(&[self.kp, self.ki, self.kd, self.antiwindup_gain])?;
        check_limits(
            self.output_min,
            self.output_max,
            ConfigError::InvalidOutputLimits,
        )?;
        if self.low_pass_time_constant.is_zero() {
            return Err(ConfigError::ZeroLowPassTimeConstant);
        }
        if self.integral_discharge_time_constant.is_zero() {
            return Err(ConfigError::ZeroDischargeTimeConstant);
        }
        Ok(())
    }
}

/// Mutable state of an [`AntiWindupController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AntiWindupControllerState<T: FloatCore = f32> {
    /// Setpoint minus measurement
    pub error: T,
    /// Control error plus the anti-windup correction; integrated on the next update
    pub integrand: T,
    /// Integrand integrated over time
    pub integral: T,
    /// Low-pass filtered rate of change of the control error
    pub derivative: T,
    /// Output before saturation
    pub unsaturated_output: T,
    /// Output after saturation, within `[output_min, output_max]`
    pub output: T,
}

impl<T: FloatCore> Default for AntiWindupControllerState<T> {
    fn default() -> Self {
        Self {
            error: T::zero(),
            integrand: T::zero(),
            integral: T::zero(),
            derivative: T::zero(),
            unsaturated_output: T::zero(),
            output: T::zero(),
        }
    }
}

/// Per-cycle input to an [`AntiWindupController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct AntiWindupControllerInput<T: FloatCore = f32> {
    /// Value the loop is driving towards
    pub setpoint: T,
    /// Current value of the controlled signal
    pub measurement: T,
    /// Open-loop contribution added to the output
    pub feed_forward: T,
    /// Time elapsed since the previous update
    pub dt: Duration,
}

/// PID controller with derivative filtering, feed-forward and anti-windup.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct AntiWindupController<T: FloatCore = f32> {
    /// Tuning parameters
    pub config: AntiWindupControllerConfig<T>,
    /// Current state
    pub state: AntiWindupControllerState<T>,
}

impl<T: FloatCore> AntiWindupController<T> {
    /// Create a controller with zeroed state. The configuration is not checked.
    pub fn new(config: AntiWindupControllerConfig<T>) -> Self {
        Self {
            config,
            state: AntiWindupControllerState::default(),
        }
    }

    /// Create a controller after validating its configuration.
    pub fn try_new(config: AntiWindupControllerConfig<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Advance the controller by one sampling interval.
    ///
    /// The integral accumulates the integrand of the *previous* update, so the
    /// anti-windup correction takes effect one step later.
    pub fn update(&mut self, input: AntiWindupControllerInput<T>) {
        let dt = seconds::<T>(input.dt);
        let tau = seconds::<T>(self.config.low_pass_time_constant);

        let error = input.setpoint - input.measurement;
        let integral = self.state.integrand * dt + self.state.integral;
        let derivative = ((T::one() / tau) * (error - self.state.error) + self.state.derivative)
            / (dt / tau + T::one());

        self.state.unsaturated_output = error * self.config.kp
            + self.config.ki * integral
            + self.config.kd * derivative
            + input.feed_forward;
        self.state.output = clamp(
            self.state.unsaturated_output,
            self.config.output_min,
            self.config.output_max,
        );
        let integrand = error
            + self.config.antiwindup_gain * (self.state.output - self.state.unsaturated_output);

        self.state.integrand = saturate(integrand);
        self.state.integral = saturate(integral);
        self.state.derivative = saturate(derivative);
        self.state.error = saturate(error);
    }

    /// Bleed off the integral while the controller is idle.
    ///
    /// Zeroes the integrand and scales the integral by
    /// `1 - dt / integral_discharge_time_constant`, bounded to `[0, 1]`.
    pub fn discharge_integral(&mut self, dt: Duration) {
        self.state.integrand = T::zero();
        self.state.integral = discharge_factor::<T>(dt, self.config.integral_discharge_time_constant)
            * self.state.integral;
    }

    /// Zero all state.
    pub fn reset(&mut self) {
        self.state = AntiWindupControllerState::default();
    }
}

impl<T: FloatCore> Pid for AntiWindupController<T> {
    type Input = AntiWindupControllerInput<T>;
    type State = AntiWindupControllerState<T>;

    fn update(&mut self, input: Self::Input) {
        AntiWindupController::update(self, input)
    }

    fn reset(&mut self) {
        AntiWindupController::reset(self)
    }

    fn state(&self) -> &Self::State {
        &self.state
    }
}
