//! Manual to automatic handover with a tracking controller
//! Run with: cargo run --example manual_handover

use antiwindup_pid::{TrackingController, TrackingControllerConfig, TrackingControllerInput};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Mode {
    Manual,
    Automatic,
}

fn main() {
    println!("=== Valve Manual/Automatic Handover ===\n");

    let mut pid: TrackingController = TrackingController::try_new(TrackingControllerConfig {
        kp: 0.8,
        ki: 0.4,
        kd: 0.05,
        antiwindup_gain: 2.0,
        integral_discharge_time_constant: Duration::from_secs(5),
        low_pass_time_constant: Duration::from_millis(200),
        output_min: 0.0,
        output_max: 100.0,
    })
    .expect("valid tracking controller config");

    let setpoint = 60.0; // Flow, percent of nominal
    let mut flow: f32 = 35.0;
    let mut valve: f32 = 35.0; // Operator's manual opening
    let mut mode = Mode::Manual;
    let dt = Duration::from_millis(100);

    println!("Time(s) | Mode      | Flow(%) | Valve(%) | PID out(%)");
    println!("--------|-----------|---------|----------|-----------");

    for i in 0..400 {
        let time = i as f32 * dt.as_secs_f32();

        if i == 100 {
            mode = Mode::Automatic;
            println!(">> Switching to automatic at valve {:.2}%", valve);
        }

        // The controller always sees what the valve actually did
        pid.update(TrackingControllerInput {
            setpoint,
            measurement: flow,
            feed_forward: 0.0,
            applied_output: valve,
            dt,
        });

        if mode == Mode::Automatic {
            valve = pid.state.output;
        }

        // First-order valve to flow response
        flow += (valve - flow) * 0.05;

        if i % 20 == 0 || i == 100 {
            println!(
                "{:7.1} | {:9} | {:7.2} | {:8.2} | {:10.2}",
                time,
                format!("{:?}", mode),
                flow,
                valve,
                pid.state.output
            );
        }
    }

    println!("\n✓ Flow settled at {:.2}%", flow);
}
