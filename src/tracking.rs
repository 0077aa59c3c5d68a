//! PID controller with tracking-mode anti-windup and bumpless transfer.
//!
//! Instead of modelling the saturation itself, the controller is told which
//! output the actuator really applied and pulls its integrand towards it.
//! That covers saturations it does not know about, and keeps the integral
//! consistent with the plant while another controller (or an operator) is in
//! charge, so handing control back causes no jump in the output. See chapter
//! 6 of Åström and Murray, *Feedback Systems*, 2008.
//!
//! Error, integrand, integral and derivative are kept finite by saturating
//! them to `[-T::max_value(), T::max_value()]` after every update.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use core::time::Duration;
use num_traits::float::FloatCore;

use crate::error::{check_gains, check_limits, ConfigError};
use crate::float::{clamp, discharge_factor, saturate, seconds};
use crate::Pid;

/// Tuning parameters for a [`TrackingController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TrackingControllerConfig<T: FloatCore = f32> {
    /// Proportional gain
    pub kp: T,
    /// Integral gain
    pub ki: T,
    /// Derivative gain
    pub kd: T,
    /// Gain of the tracking feedback into the integrand
    pub antiwindup_gain: T,
    /// Time for [`TrackingController::discharge_integral`] to fully drain the integral
    pub integral_discharge_time_constant: Duration,
    /// Derivative low-pass filter time constant
    pub low_pass_time_constant: Duration,
    /// Lower output bound
    pub output_min: T,
    /// Upper output bound
    pub output_max: T,
}

impl<T: FloatCore> TrackingControllerConfig<T> {
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

/// Mutable state of a [`TrackingController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TrackingControllerState<T: FloatCore = f32> {
    /// Setpoint minus measurement
    pub error: T,
    /// Control error plus the tracking correction
    pub integrand: T,
    /// Integrand integrated over time
    pub integral: T,
    /// Low-pass filtered rate of change of the control error
    pub derivative: T,
    /// Output before saturation, compared against the applied output
    pub unsaturated_output: T,
    /// Output after saturation
    pub output: T,
}

impl<T: FloatCore> Default for TrackingControllerState<T> {
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

/// Per-cycle input to a [`TrackingController`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TrackingControllerInput<T: FloatCore = f32> {
    /// Value the loop is driving towards
    pub setpoint: T,
    /// Current value of the controlled signal
    pub measurement: T,
    /// Open-loop contribution added to the output
    pub feed_forward: T,
    /// Command the actuator actually executed, whoever issued it
    pub applied_output: T,
    /// Time elapsed since the previous update
    pub dt: Duration,
}

/// PID controller tracking the applied actuator command.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Deserialize, Serialize))]
pub struct TrackingController<T: FloatCore = f32> {
    /// Tuning parameters
    pub config: TrackingControllerConfig<T>,
    /// Current state
    pub state: TrackingControllerState<T>,
}

impl<T: FloatCore> TrackingController<T> {
    /// Create a controller with zeroed state. The configuration is not checked.
    pub fn new(config: TrackingControllerConfig<T>) -> Self {
        Self {
            config,
            state: TrackingControllerState::default(),
        }
    }

    /// Create a controller after validating its configuration.
    pub fn try_new(config: TrackingControllerConfig<T>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Advance the controller by one sampling interval.
    pub fn update(&mut self, input: TrackingControllerInput<T>) {
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
        // Track what the actuator did, not what this controller asked for.
        let integrand = error
            + self.config.antiwindup_gain * (input.applied_output - self.state.unsaturated_output);

        self.state.integrand = saturate(integrand);
        self.state.integral = saturate(integral);
        self.state.derivative = saturate(derivative);
        self.state.error = saturate(error);
    }

    /// Bleed off the integral while the controller is idle.
    pub fn discharge_integral(&mut self, dt: Duration) {
        self.state.integrand = T::zero();
        self.state.integral = discharge_factor::<T>(dt, self.config.integral_discharge_time_constant)
            * self.state.integral;
    }

    /// Zero all state.
    pub fn reset(&mut self) {
        self.state = TrackingControllerState::default();
    }
}

impl<T: FloatCore> Pid for TrackingController<T> {
    type Input = TrackingControllerInput<T>;
    type State = TrackingControllerState<T>;

    fn update(&mut self, input: Self::Input) {
        TrackingController::update(self, input)
    }

    fn reset(&mut self) {
        TrackingController::reset(self)
    }

    fn state(&self) -> &Self::State {
        &self.state
    }
}
