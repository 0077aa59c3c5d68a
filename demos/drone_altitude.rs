//! Drone altitude hold with gravity feed-forward and throttle saturation
//! Run with: cargo run --example drone_altitude

use antiwindup_pid::{AntiWindupController, AntiWindupControllerConfig, AntiWindupControllerInput};
use std::time::Duration;

const GRAVITY: f32 = 9.81;
const MAX_THRUST: f32 = 20.0; // m/s² at 100% throttle

fn main() {
    println!("=== Drone Altitude Hold ===\n");

    // Output is throttle in percent; feed-forward supplies the hover throttle
    let mut pid: AntiWindupController = AntiWindupController::try_new(AntiWindupControllerConfig {
        kp: 12.0,
        ki: 3.0,
        kd: 9.0,
        antiwindup_gain: 0.5,
        integral_discharge_time_constant: Duration::from_secs(2),
        low_pass_time_constant: Duration::from_millis(50),
        output_min: 0.0,
        output_max: 100.0,
    })
    .expect("valid altitude controller config");

    let hover_throttle = GRAVITY / MAX_THRUST * 100.0;

    let mut target = 10.0;
    let mut altitude: f32 = 0.0;
    let mut velocity: f32 = 0.0;
    let dt = Duration::from_millis(20); // 50 Hz

    println!("Time(s) | Alt(m) | Vel(m/s) | Throttle(%) | Unsat(%)");
    println!("--------|--------|----------|-------------|---------");

    for i in 0..1500 {
        let time = i as f32 * dt.as_secs_f32();

        if i == 750 {
            target = 15.0;
            println!(">> New target: 15m");
        }

        pid.update(AntiWindupControllerInput {
            setpoint: target,
            measurement: altitude,
            feed_forward: hover_throttle,
            dt,
        });
        let throttle = pid.state.output;

        // Simulate physics
        let thrust = throttle / 100.0 * MAX_THRUST;
        let drag = velocity * 0.1;
        let accel = thrust - GRAVITY - drag;

        velocity += accel * dt.as_secs_f32();
        altitude = (altitude + velocity * dt.as_secs_f32()).max(0.0);

        if i % 50 == 0 {
            println!(
                "{:7.1} | {:6.2} | {:8.2} | {:11.1} | {:8.1}",
                time, altitude, velocity, throttle, pid.state.unsaturated_output
            );
        }
    }

    // Motors disarmed: bleed off the integral instead of dropping it at once
    for _ in 0..5 {
        pid.discharge_integral(Duration::from_millis(500));
        println!(">> Disarmed, integral: {:.3}", pid.state.integral);
    }

    println!("\n✓ Flight complete");
}
