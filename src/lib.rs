//! # Discrete-time PID controllers with anti-windup
//!
//! Small, allocation-free PID controllers for fixed-interval control loops on
//! embedded and real-time targets. The caller owns the loop: it supplies the
//! measurements and the elapsed sampling interval, calls `update` once per
//! period and reads the results back from the controller's `state`.
//!
//! ## Controllers
//! - [`Controller`]: plain PID, unfiltered derivative, unbounded integral
//! - [`PiController`]: PI with the integral clamped to fixed bounds
//! - [`AntiWindupController`]: low-pass filtered derivative, feed-forward,
//!   output saturation and anti-windup from an actuator saturation model
//! - [`TrackingController`]: as above, but the anti-windup tracks the output the
//!   actuator actually applied, giving **bumpless transfer** between modes
//!
//! Each controller is a plain value holding a `config` and a `state`.
//! Controllers share nothing, so independent instances may run on separate
//! threads; a single instance needs exactly one owner driving it.
//!
//! ## Numeric policy
//! Nothing in this crate returns an error at runtime. Saturation is done by
//! clamping, and `NaN` is never clamped away: a zero sampling interval or a
//! zero time constant shows up as `NaN` or `±inf` in the state on the next
//! read. Call `validate` on a config (or construct with `try_new`) to catch
//! such mistakes up front.
//!
//! ## Example
//! ```
//! use antiwindup_pid::{Controller, ControllerConfig, ControllerInput};
//! use core::time::Duration;
//!
//! let mut pid: Controller = Controller::new(ControllerConfig {
//!     kp: 2.0,
//!     ki: 1.0,
//!     kd: 1.0,
//! });
//!
//! pid.update(ControllerInput {
//!     setpoint: 10.0,
//!     measurement: 0.0,
//!     dt: Duration::from_millis(100),
//! });
//! assert_eq!(pid.state.error, 10.0);
//! assert_eq!(pid.state.integral, 1.0);
//! assert_eq!(pid.state.derivative, 100.0);
//! assert_eq!(pid.state.output, 121.0);
//!
//! pid.reset();
//! assert_eq!(pid.state.output, 0.0);
//! ```
//!
//! ## Features
//! - `std` (default): `std::error::Error` for [`ConfigError`]
//! - `serde`: serialize configs, inputs and states, e.g. to persist state
//!   across restarts
//! - `defmt`: `defmt::Format` for states and [`ConfigError`]

#![cfg_attr(not(feature = "std"), no_std)]

pub mod anti_windup;
pub mod controller;
pub mod error;
pub mod float;
pub mod pi_controller;
pub mod tracking;

pub use anti_windup::{
    AntiWindupController, AntiWindupControllerConfig, AntiWindupControllerInput,
    AntiWindupControllerState,
};
pub use controller::{Controller, ControllerConfig, ControllerInput, ControllerState};
pub use error::ConfigError;
pub use float::MAX_FLOAT32;
pub use pi_controller::{PiController, PiControllerConfig, PiControllerInput, PiControllerState};
pub use tracking::{
    TrackingController, TrackingControllerConfig, TrackingControllerInput,
    TrackingControllerState,
};

/// Operations shared by every controller in this crate.
///
/// Each controller keeps its own input and state types; this trait only lets
/// generic code drive any of them.
pub trait Pid {
    /// Per-cycle input
    type Input;
    /// State read back after each update
    type State;

    /// Advance the controller by one sampling interval.
    fn update(&mut self, input: Self::Input);

    /// Zero all state.
    fn reset(&mut self);

    /// Current state.
    fn state(&self) -> &Self::State;
}
