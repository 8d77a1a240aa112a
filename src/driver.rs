//! Simulation driver (C11, §4.11): owns every subsystem and runs the fixed
//! step loop in the teacher's `SingleThreadedRunner` shape (`runner.rs`) —
//! a struct built once from config/subsystems with a single blocking `run`
//! entry point, `log` lifecycle messages at start/stop, cooperative
//! cancellation — minus the Rerun/thread-per-concern wiring that shape
//! doesn't need here.
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Vector3;

use crate::accumulator::{self, GROUND_TOLERANCE_M};
use crate::aerodynamics::{AeroState, Aerodynamics};
use crate::error::EngineError;
use crate::events::{EventRecord, FlightEvent, ParachuteStatus};
use crate::flight_rules::{FlightRules, RulesContext};
use crate::launch_rail::LaunchRail;
use crate::math::Vec3Ext;
use crate::motor::{Motor, MotorState};
use crate::plugin::{PhysicsState, PluginHost};
use crate::rigid_body::{MassContribution, RigidBody};
use crate::telemetry::sink::ChannelTelemetrySink;
use crate::telemetry::rows::{DynamicsRow, EventRow, MotionRow};

#[derive(Debug, Clone, PartialEq)]
pub enum TerminationReason {
    Landed,
    MaxTimeReached,
    Cancelled,
    Failed(EngineError),
}

pub struct SimulationDriver {
    step_s: f64,
    max_time_s: f64,
    gravity_m_s2: f64,
    main_deploy_altitude_m: f64,

    time_s: f64,
    previous_velocity_y: f64,
    parachute_status: ParachuteStatus,

    body: RigidBody,
    motor: Motor,
    motor_xcg: Vector3<f64>,
    structural_contributions: Vec<MassContribution>,
    aerodynamics: Aerodynamics,
    launch_rail: LaunchRail,
    rules: FlightRules,
    plugin_host: PluginHost,

    motion_sink: Option<ChannelTelemetrySink<MotionRow>>,
    dynamics_sink: Option<ChannelTelemetrySink<DynamicsRow>>,
    events_sink: Option<ChannelTelemetrySink<EventRow>>,

    events: Vec<EventRecord>,
    cancel: Arc<AtomicBool>,
}

#[allow(clippy::too_many_arguments)]
impl SimulationDriver {
    pub fn new(
        step_s: f64,
        max_time_s: f64,
        gravity_m_s2: f64,
        main_deploy_altitude_m: f64,
        structural_contributions: Vec<MassContribution>,
        motor: Motor,
        motor_xcg: Vector3<f64>,
        aerodynamics: Aerodynamics,
        launch_rail: LaunchRail,
        mut plugin_host: PluginHost,
        plugin_configs: HashMap<String, HashMap<String, String>>,
    ) -> Result<Self, EngineError> {
        if !(step_s > 0.0 && step_s <= accumulator::MAX_STEP_S) {
            return Err(EngineError::InvalidStep(step_s));
        }

        let contributions = Self::contributions_with_motor(&structural_contributions, &motor, motor_xcg);
        let body = RigidBody::from_mass_contributions(&contributions)?;

        plugin_host.initialize_all(&plugin_configs)?;

        Ok(SimulationDriver {
            step_s,
            max_time_s,
            gravity_m_s2,
            main_deploy_altitude_m,
            time_s: 0.0,
            previous_velocity_y: 0.0,
            parachute_status: ParachuteStatus::Stowed,
            body,
            motor,
            motor_xcg,
            structural_contributions,
            aerodynamics,
            launch_rail,
            rules: FlightRules::new(),
            plugin_host,
            motion_sink: None,
            dynamics_sink: None,
            events_sink: None,
            events: Vec::new(),
            cancel: Arc::new(AtomicBool::new(false)),
        })
    }

    fn contributions_with_motor(
        structural: &[MassContribution],
        motor: &Motor,
        motor_xcg: Vector3<f64>,
    ) -> Vec<MassContribution> {
        let mut contributions: Vec<MassContribution> = structural
            .iter()
            .map(|c| MassContribution {
                mass: c.mass,
                xcg: c.xcg,
                inertia_about_own_cg: c.inertia_about_own_cg,
            })
            .collect();
        contributions.push(MassContribution {
            mass: motor.current_mass(),
            xcg: motor_xcg,
            inertia_about_own_cg: nalgebra::Matrix3::zeros(),
        });
        contributions
    }

    pub fn attach_motion_sink(&mut self, sink: ChannelTelemetrySink<MotionRow>) {
        self.motion_sink = Some(sink);
    }

    pub fn attach_dynamics_sink(&mut self, sink: ChannelTelemetrySink<DynamicsRow>) {
        self.dynamics_sink = Some(sink);
    }

    pub fn attach_events_sink(&mut self, sink: ChannelTelemetrySink<EventRow>) {
        self.events_sink = Some(sink);
    }

    /// A clone of the cooperative cancellation flag: setting it makes the
    /// loop stop cleanly at the start of the next step.
    pub fn cancel_handle(&self) -> Arc<AtomicBool> {
        self.cancel.clone()
    }

    pub fn events(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn body(&self) -> &RigidBody {
        &self.body
    }

    pub fn time_s(&self) -> f64 {
        self.time_s
    }

    /// Run the fixed-step loop to completion (§4.11). Recoverable per-step
    /// failures stop the loop and are reported via `Failed` rather than
    /// unwinding, so sinks are always flushed on the way out.
    pub fn run(&mut self) -> TerminationReason {
        log::info!("simulation starting: step = {:.4} s, max_time = {:.1} s", self.step_s, self.max_time_s);

        let reason = loop {
            if self.cancel.load(Ordering::Relaxed) {
                break TerminationReason::Cancelled;
            }
            if self.rules.is_landed() {
                break TerminationReason::Landed;
            }
            if self.time_s >= self.max_time_s {
                break TerminationReason::MaxTimeReached;
            }

            if let Err(e) = self.step() {
                log::error!("simulation step failed at t = {:.4} s: {e}", self.time_s);
                break TerminationReason::Failed(e);
            }
        };

        log::info!("simulation ended at t = {:.4} s: {:?}", self.time_s, reason);
        self.shutdown();
        reason
    }

    fn step(&mut self) -> Result<(), EngineError> {
        self.motor.update(self.step_s);
        self.body
            .update_mass_properties(&Self::contributions_with_motor(
                &self.structural_contributions,
                &self.motor,
                self.motor_xcg,
            ))?;

        self.body.reset_accumulators();

        {
            let mut state = PhysicsState {
                time_s: self.time_s,
                body: &mut self.body,
            };
            self.plugin_host.before_step_all(&mut state)?;
        }

        let weight_n = self.gravity_m_s2 * self.body.mass;
        self.body.add_force(Vector3::new(0.0, -weight_n, 0.0));

        let thrust_n = self.motor.current_thrust();
        let thrust_world = self.body.orientation * Vector3::new(thrust_n, 0.0, 0.0);
        self.body.add_force(thrust_world);

        let v_body = self.body.orientation.inverse() * self.body.velocity;
        let w_body = self.body.orientation.inverse() * self.body.angular_velocity;
        let aero = self.aerodynamics.calc(&AeroState {
            altitude_m: self.body.position.y,
            v_body,
            angular_velocity_body: w_body,
        });
        self.body.add_force(self.body.orientation * aero.forces_body);
        self.body.add_moment(self.body.orientation * aero.moments_body);

        let rail_exited_this_step = self.launch_rail.constrain(&mut self.body);

        let previous_velocity_y = self.previous_velocity_y;
        accumulator::integrate(&mut self.body, self.step_s)?;
        self.previous_velocity_y = self.body.velocity.y;

        let grounded =
            self.body.position.y <= GROUND_TOLERANCE_M && !self.launch_rail.is_on_rail();
        let ctx = RulesContext {
            thrust_n,
            weight_n,
            rail_exited: rail_exited_this_step || !self.launch_rail.is_on_rail(),
            motor_burned_out: self.motor.state() == MotorState::Burnout,
            velocity_y: self.body.velocity.y,
            previous_velocity_y,
            altitude_m: self.body.position.y,
            main_deploy_altitude_m: self.main_deploy_altitude_m,
            grounded,
        };
        let fired = self.rules.step(ctx);
        self.record_events(&fired);

        {
            let mut state = PhysicsState {
                time_s: self.time_s,
                body: &mut self.body,
            };
            self.plugin_host.after_step_all(&mut state)?;
        }

        if !self.body.mass.is_finite() || self.body.mass <= 0.0 {
            return Err(EngineError::InvalidMass(self.body.mass));
        }
        self.body.position.require_finite("driver: position")?;
        self.body.velocity.require_finite("driver: velocity")?;
        self.body.acceleration.require_finite("driver: acceleration")?;

        self.emit_telemetry();

        self.time_s += self.step_s;
        Ok(())
    }

    fn record_events(&mut self, fired: &[FlightEvent]) {
        for &event in fired {
            match event {
                FlightEvent::DrogueDeploy => self.parachute_status = ParachuteStatus::Drogue,
                FlightEvent::MainDeploy => self.parachute_status = ParachuteStatus::Main,
                _ => {}
            }
            let record = EventRecord {
                time_s: self.time_s,
                event,
                motor_status: self.motor.state(),
                parachute_status: self.parachute_status,
            };
            self.events.push(record);
            if let Some(sink) = &self.events_sink {
                let _ = sink.emit(EventRow {
                    time: record.time_s,
                    event_name: event.name().to_string(),
                    motor_status: format!("{:?}", record.motor_status),
                    parachute_status: format!("{:?}", record.parachute_status),
                });
            }
        }
    }

    fn emit_telemetry(&self) {
        if let Some(sink) = &self.motion_sink {
            let _ = sink.emit(MotionRow {
                time: self.time_s,
                altitude: self.body.position.y,
                velocity: self.body.velocity.norm(),
                acceleration: self.body.acceleration.norm(),
                thrust: self.motor.current_thrust(),
            });
        }
        if let Some(sink) = &self.dynamics_sink {
            let _ = sink.emit(DynamicsRow {
                time: self.time_s,
                position_x: self.body.position.x,
                position_y: self.body.position.y,
                position_z: self.body.position.z,
                velocity_x: self.body.velocity.x,
                velocity_y: self.body.velocity.y,
                velocity_z: self.body.velocity.z,
                acceleration_x: self.body.acceleration.x,
                acceleration_y: self.body.acceleration.y,
                acceleration_z: self.body.acceleration.z,
                orientation_x: self.body.orientation.coords.x,
                orientation_y: self.body.orientation.coords.y,
                orientation_z: self.body.orientation.coords.z,
                orientation_w: self.body.orientation.coords.w,
            });
        }
    }

    fn shutdown(&mut self) {
        if let Err(e) = self.plugin_host.cleanup_all() {
            log::error!("plugin cleanup failed: {e}");
        }
        if let Some(sink) = &mut self.motion_sink {
            let _ = sink.stop();
        }
        if let Some(sink) = &mut self.dynamics_sink {
            let _ = sink.stop();
        }
        if let Some(sink) = &mut self.events_sink {
            let _ = sink.stop();
        }
    }
}
