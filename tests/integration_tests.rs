use antiwindup_pid::{
    AntiWindupController, AntiWindupControllerConfig, AntiWindupControllerInput, Controller,
    ControllerConfig, ControllerInput, Pid, PiController, PiControllerConfig, PiControllerInput,
    TrackingController, TrackingControllerConfig, TrackingControllerInput,
};
use approx::assert_relative_eq;
use core::fmt::Debug;
use std::time::Duration;

const DT: Duration = Duration::from_millis(100);

fn anti_windup_config(output_min: f32, output_max: f32) -> AntiWindupControllerConfig {
    AntiWindupControllerConfig {
        kp: 1.0,
        ki: 1.0,
        kd: 0.0,
        antiwindup_gain: 1.0,
        integral_discharge_time_constant: Duration::from_secs(4),
        low_pass_time_constant: Duration::from_millis(100),
        output_min,
        output_max,
    }
}

fn tracking_config(output_min: f32, output_max: f32) -> TrackingControllerConfig {
    TrackingControllerConfig {
        kp: 1.0,
        ki: 1.0,
        kd: 0.0,
        antiwindup_gain: 1.0,
        integral_discharge_time_constant: Duration::from_secs(4),
        low_pass_time_constant: Duration::from_millis(100),
        output_min,
        output_max,
    }
}

// Deterministic, bounded, irregular test signal.
fn wobble(i: usize, scale: f32) -> f32 {
    let t = i as f32;
    ((t * 0.37).sin() + (t * 1.91).cos() * 0.5) * scale
}

fn assert_reset_zeroes<C>(mut controller: C, input: C::Input)
where
    C: Pid,
    C::State: Default + PartialEq + Debug,
{
    controller.update(input);
    assert_ne!(*controller.state(), C::State::default());

    controller.reset();
    assert_eq!(*controller.state(), C::State::default());

    controller.reset();
    assert_eq!(*controller.state(), C::State::default());
}

#[test]
fn test_reset_zeroes_every_controller() {
    assert_reset_zeroes(
        Controller::new(ControllerConfig {
            kp: 2.0f32,
            ki: 1.0,
            kd: 1.0,
        }),
        ControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            dt: DT,
        },
    );
    assert_reset_zeroes(
        PiController::new(PiControllerConfig {
            kp: 1.0f32,
            ki: 1.0,
            integral_min: -5.0,
            integral_max: 5.0,
        }),
        PiControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            dt: DT,
        },
    );
    assert_reset_zeroes(
        AntiWindupController::new(anti_windup_config(-5.0, 5.0)),
        AntiWindupControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            feed_forward: 1.0,
            dt: DT,
        },
    );
    assert_reset_zeroes(
        TrackingController::new(tracking_config(-5.0, 5.0)),
        TrackingControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            feed_forward: 1.0,
            applied_output: 2.0,
            dt: DT,
        },
    );
}

#[test]
fn test_basic_control_loop() {
    let mut pi: PiController = PiController::new(PiControllerConfig {
        kp: 1.0,
        ki: 0.5,
        integral_min: -10.0,
        integral_max: 10.0,
    });

    let mut value = 0.0;
    for _ in 0..200 {
        pi.update(PiControllerInput {
            setpoint: 5.0,
            measurement: value,
            dt: DT,
        });
        value += pi.state.output * 0.1;
    }

    assert!((value - 5.0).abs() < 0.05, "value = {}", value);
}

#[test]
fn test_pi_integral_stays_within_bounds() {
    let mut pi: PiController = PiController::new(PiControllerConfig {
        kp: 0.8,
        ki: 3.0,
        integral_min: -2.0,
        integral_max: 1.5,
    });

    for i in 0..2000 {
        pi.update(PiControllerInput {
            setpoint: wobble(i, 400.0),
            measurement: wobble(i + 7, 150.0),
            dt: Duration::from_millis(1 + (i % 50) as u64),
        });
        assert!(
            pi.state.integral >= -2.0 && pi.state.integral <= 1.5,
            "step {}: integral = {}",
            i,
            pi.state.integral
        );
    }
}

#[test]
fn test_anti_windup_output_stays_within_bounds() {
    let mut pid = AntiWindupController::new(AntiWindupControllerConfig {
        kp: 3.0,
        ki: 2.0,
        kd: 0.05,
        antiwindup_gain: 0.7,
        integral_discharge_time_constant: Duration::from_secs(4),
        low_pass_time_constant: Duration::from_millis(20),
        output_min: -12.0,
        output_max: 8.0,
    });

    let mut saturated_steps = 0;
    let mut linear_steps = 0;
    for i in 0..2000 {
        pid.update(AntiWindupControllerInput {
            setpoint: wobble(i, 10.0),
            measurement: wobble(i + 3, 4.0),
            feed_forward: wobble(i + 11, 2.0),
            dt: Duration::from_millis(5 + (i % 20) as u64),
        });

        let state = pid.state;
        assert!(state.output >= -12.0 && state.output <= 8.0);
        if state.unsaturated_output >= -12.0 && state.unsaturated_output <= 8.0 {
            assert_eq!(state.output, state.unsaturated_output);
            assert_eq!(state.integrand, state.error);
            linear_steps += 1;
        } else {
            saturated_steps += 1;
        }
    }

    // Both regimes must actually have been exercised.
    assert!(saturated_steps > 0 && linear_steps > 0);
}

#[test]
fn test_tracking_output_stays_within_bounds() {
    let mut pid = TrackingController::new(tracking_config(-3.0, 3.0));

    for i in 0..2000 {
        let applied_output = pid.state.output;
        pid.update(TrackingControllerInput {
            setpoint: wobble(i, 10.0),
            measurement: wobble(i + 5, 3.0),
            feed_forward: 0.0,
            applied_output,
            dt: DT,
        });

        let state = pid.state;
        assert!(state.output >= -3.0 && state.output <= 3.0);
        if state.unsaturated_output >= -3.0 && state.unsaturated_output <= 3.0 {
            assert_eq!(state.output, state.unsaturated_output);
        }
    }
}

#[test]
fn test_anti_windup_integral_converges_while_saturated() {
    let mut pid = AntiWindupController::new(anti_windup_config(-1.0, 1.0));
    let mut basic: Controller = Controller::new(ControllerConfig {
        kp: 1.0,
        ki: 1.0,
        kd: 0.0,
    });

    for _ in 0..300 {
        pid.update(AntiWindupControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            feed_forward: 0.0,
            dt: DT,
        });
        basic.update(ControllerInput {
            setpoint: 10.0,
            measurement: 0.0,
            dt: DT,
        });
        assert_eq!(pid.state.output, 1.0);
    }

    // integrand = 10 + (1 - (10 + integral)) settles at integral = 1
    assert_relative_eq!(pid.state.integral, 1.0, epsilon = 1e-4);
    assert!(basic.state.integral > 250.0);
}

#[test]
fn test_tracking_integral_converges_while_saturated() {
    let mut pid = TrackingController::new(tracking_config(-1.0, 1.0));

    for _ in 0..300 {
        let applied_output = pid.state.output;
        pid.update(TrackingControllerInput {
            setpoint: -10.0,
            measurement: 0.0,
            feed_forward: 0.0,
            applied_output,
            dt: DT,
        });
    }

    assert_eq!(pid.state.output, -1.0);
    assert_relative_eq!(pid.state.integral, -1.0, epsilon = 1e-4);
}

#[test]
fn test_state_stays_finite_under_extreme_inputs() {
    // A nanosecond step with a nanosecond filter pushes the derivative and the
    // unsaturated output to infinity on every update.
    let mut anti_windup = AntiWindupController::new(AntiWindupControllerConfig {
        kp: 1.0,
        ki: 0.0,
        kd: 1.0,
        low_pass_time_constant: Duration::from_nanos(1),
        ..anti_windup_config(-1.0, 1.0)
    });
    let mut tracking = TrackingController::new(TrackingControllerConfig {
        kp: 1.0,
        ki: 0.0,
        kd: 1.0,
        low_pass_time_constant: Duration::from_nanos(1),
        ..tracking_config(-1.0, 1.0)
    });

    for i in 0..200 {
        let setpoint = if i % 2 == 0 { 1e38 } else { -1e38 };
        let dt = Duration::from_nanos(1);
        anti_windup.update(AntiWindupControllerInput {
            setpoint,
            measurement: 0.0,
            feed_forward: 0.0,
            dt,
        });
        let applied_output = tracking.state.output;
        tracking.update(TrackingControllerInput {
            setpoint,
            measurement: 0.0,
            feed_forward: 0.0,
            applied_output,
            dt,
        });

        let a = anti_windup.state;
        let t = tracking.state;
        for value in [
            a.error,
            a.integrand,
            a.integral,
            a.derivative,
            t.error,
            t.integrand,
            t.integral,
            t.derivative,
        ] {
            assert!(value.is_finite(), "step {}: {:?} / {:?}", i, a, t);
        }
        assert!(a.unsaturated_output.is_infinite());
        assert!(a.output.abs() == 1.0 && t.output.abs() == 1.0);
    }
}

#[test]
fn test_discharge_integral_scales_linearly() {
    let mut pid = AntiWindupController::new(anti_windup_config(-100.0, 100.0));
    pid.state.integral = 10.0;
    pid.state.integrand = 2.0;

    pid.discharge_integral(Duration::ZERO);
    assert_eq!(pid.state.integral, 10.0);
    assert_eq!(pid.state.integrand, 0.0);

    pid.discharge_integral(Duration::from_secs(1));
    assert_eq!(pid.state.integral, 7.5);
    pid.discharge_integral(Duration::from_secs(1));
    assert_eq!(pid.state.integral, 5.625);

    pid.discharge_integral(Duration::from_secs(4));
    assert_eq!(pid.state.integral, 0.0);
}

#[test]
fn test_discharged_integral_is_not_reaccumulated() {
    let mut pid = TrackingController::new(tracking_config(-100.0, 100.0));
    for _ in 0..20 {
        pid.update(TrackingControllerInput {
            setpoint: 5.0,
            measurement: 0.0,
            feed_forward: 0.0,
            applied_output: 5.0,
            dt: DT,
        });
    }
    assert!(pid.state.integral > 0.0);

    pid.discharge_integral(Duration::from_secs(10));
    assert_eq!(pid.state.integral, 0.0);

    // The zeroed integrand means the next update integrates nothing.
    pid.update(TrackingControllerInput {
        setpoint: 5.0,
        measurement: 0.0,
        feed_forward: 0.0,
        applied_output: 5.0,
        dt: DT,
    });
    assert_eq!(pid.state.integral, 0.0);
}

#[test]
fn test_bumpless_transfer() {
    let manual_command = 4.0;
    let mut tracking = TrackingController::new(tracking_config(-10.0, 10.0));
    let mut anti_windup = AntiWindupController::new(anti_windup_config(-10.0, 10.0));

    // Operator in charge: both controllers run in the background.
    for _ in 0..100 {
        tracking.update(TrackingControllerInput {
            setpoint: 20.0,
            measurement: 20.0,
            feed_forward: 0.0,
            applied_output: manual_command,
            dt: DT,
        });
        anti_windup.update(AntiWindupControllerInput {
            setpoint: 20.0,
            measurement: 20.0,
            feed_forward: 0.0,
            dt: DT,
        });
    }

    // Automatic mode: each controller's own output drives the actuator.
    let applied_output = tracking.state.output;
    tracking.update(TrackingControllerInput {
        setpoint: 20.0,
        measurement: 20.0,
        feed_forward: 0.0,
        applied_output,
        dt: DT,
    });
    anti_windup.update(AntiWindupControllerInput {
        setpoint: 20.0,
        measurement: 20.0,
        feed_forward: 0.0,
        dt: DT,
    });

    assert_relative_eq!(tracking.state.output, manual_command, epsilon = 1e-2);
    assert_eq!(anti_windup.state.output, 0.0);
}

#[test]
fn test_try_new_validates_config() {
    assert!(AntiWindupController::try_new(anti_windup_config(-1.0, 1.0)).is_ok());
    assert_eq!(
        TrackingController::try_new(tracking_config(1.0, -1.0)).unwrap_err(),
        antiwindup_pid::ConfigError::InvalidOutputLimits
    );
    assert_eq!(
        TrackingController::try_new(TrackingControllerConfig {
            low_pass_time_constant: Duration::ZERO,
            ..tracking_config(-1.0, 1.0)
        })
        .unwrap_err(),
        antiwindup_pid::ConfigError::ZeroLowPassTimeConstant
    );
}
