//! Simple temperature control with a clamped-integral PI controller
//! Run with: cargo run --example basic_temperature

use antiwindup_pid::{PiController, PiControllerConfig, PiControllerInput};
use std::time::Duration;

fn main() {
    println!("=== Basic Temperature Control ===\n");

    let mut pi: PiController = PiController::try_new(PiControllerConfig {
        kp: 8.0,
        ki: 0.6,
        integral_min: -50.0,
        integral_max: 50.0,
    })
    .expect("valid PI config");

    // Target temperature: 25°C
    let setpoint = 25.0;
    let mut temperature = 20.0;
    let dt = Duration::from_millis(100);

    println!("Time(s) | Temp(°C) | Heater(%) | Integral");
    println!("--------|----------|-----------|---------");

    for i in 0..600 {
        let time = i as f32 * dt.as_secs_f32();

        pi.update(PiControllerInput {
            setpoint,
            measurement: temperature,
            dt,
        });

        // Heater can only heat, and only up to 100%
        let heater = pi.state.output.clamp(0.0, 100.0);

        temperature += heater * 0.002;
        temperature -= (temperature - 20.0) * 0.002; // Heat loss

        if i % 50 == 0 {
            println!(
                "{:7.1} | {:8.2} | {:9.2} | {:8.2}",
                time, temperature, heater, pi.state.integral
            );
        }
    }

    println!("\n✓ Final temperature: {:.2}°C", temperature);
}
