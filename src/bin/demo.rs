//! Minimal end-to-end wiring: builds a small rocket, runs it to landing,
//! and writes CSV telemetry next to the binary. Mirrors the teacher's
//! `main.rs` wiring style (`pretty_env_logger::init()` first, then build
//! and run) without the Rerun/MAVLink surface this engine doesn't have.
use std::collections::HashMap;
use std::f64::consts::PI;

use apogee::aerodynamics::{AeroCoefficients, Aerodynamics};
use apogee::atmosphere::AtmosphereIsa;
use apogee::events::ParachuteStatus;
use apogee::geometry::{BodyTube, FinSet, NoseCone, NoseShape, Parachute, RocketGeometry};
use apogee::launch_rail::LaunchRail;
use apogee::motor::Motor;
use apogee::plugin::PluginHost;
use apogee::rigid_body::MassContribution;
use apogee::telemetry::{csv_file_sink, DynamicsRow, EventRow, MotionRow};
use apogee::SimulationDriver;

fn main() -> apogee::Result<()> {
    pretty_env_logger::init();

    let geometry = RocketGeometry {
        nose: NoseCone {
            shape: NoseShape::Ogive,
            length: 0.3,
            base_radius: 0.05,
        },
        body_tube: BodyTube {
            length: 1.2,
            outer_radius: 0.05,
            thickness: 0.002,
            material_density: 1600.0,
        },
        fins: Some(FinSet {
            count: 4,
            root_chord: 0.15,
            tip_chord: 0.05,
            span: 0.1,
            sweep: 0.05,
            thickness: 0.003,
        }),
        parachute: Some(Parachute {
            drag_area: 1.5,
            deployment_altitude: 300.0,
        }),
    };
    geometry.validate()?;

    let (structural_mass, structural_xcg, structural_inertia) = geometry.aggregate_structural();
    let structural_contributions = vec![MassContribution {
        mass: structural_mass,
        xcg: structural_xcg,
        inertia_about_own_cg: structural_inertia,
    }];

    let motor = Motor::new(
        "H128",
        &[(0.0, 0.0), (0.1, 130.0), (1.0, 120.0), (1.1, 0.0)],
        128.0,
        0.242,
        0.146,
        0.29,
        0.054,
    )?;

    let aerodynamics = Aerodynamics::new(
        Box::new(AtmosphereIsa::default()),
        geometry.reference_area(),
        AeroCoefficients {
            lift_slope_per_rad: 8.0,
            moment_slope_per_rad: -2.0,
            center_of_pressure_offset_m: 0.2,
        },
    );

    let launch_rail = LaunchRail::new(2.0, 5.0 * PI / 180.0, 0.0);

    let mut driver = SimulationDriver::new(
        0.005,
        120.0,
        9.80665,
        100.0,
        structural_contributions,
        motor,
        nalgebra::Vector3::new(geometry.overall_length() + 0.05, 0.0, 0.0),
        aerodynamics,
        launch_rail,
        PluginHost::new(),
        HashMap::new(),
    )?;

    driver.attach_motion_sink(csv_file_sink::<MotionRow>("motion", "motion.csv")?);
    driver.attach_dynamics_sink(csv_file_sink::<DynamicsRow>("dynamics", "dynamics.csv")?);
    driver.attach_events_sink(csv_file_sink::<EventRow>("events", "events.csv")?);

    let reason = driver.run();
    log::info!("termination reason: {reason:?}");

    for record in driver.events() {
        let parachute = match record.parachute_status {
            ParachuteStatus::Stowed => "stowed",
            ParachuteStatus::Drogue => "drogue",
            ParachuteStatus::Main => "main",
        };
        log::info!(
            "t={:.3}s {:?} motor={:?} parachute={}",
            record.time_s,
            record.event,
            record.motor_status,
            parachute
        );
    }

    Ok(())
}
