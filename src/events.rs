//! Flight events (§4.8, §6): the discrete milestones `FlightRules` emits as
//! the simulation crosses phase boundaries, and the record shape telemetry
//! writes them out as. Mirrors the teacher's `SimEvent`/`Event` wrapping in
//! `crater/sim/events.rs`, reduced to this engine's closed event set.
use crate::motor::MotorState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightEvent {
    Liftoff,
    RailExit,
    Burnout,
    Apogee,
    DrogueDeploy,
    MainDeploy,
    Touchdown,
}

impl FlightEvent {
    pub fn name(&self) -> &'static str {
        match self {
            FlightEvent::Liftoff => "liftoff",
            FlightEvent::RailExit => "rail_exit",
            FlightEvent::Burnout => "burnout",
            FlightEvent::Apogee => "apogee",
            FlightEvent::DrogueDeploy => "drogue_deploy",
            FlightEvent::MainDeploy => "main_deploy",
            FlightEvent::Touchdown => "touchdown",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParachuteStatus {
    Stowed,
    Drogue,
    Main,
}

/// A single emitted event together with the status fields spec §6's
/// `events` telemetry schema requires alongside it.
#[derive(Debug, Clone, Copy)]
pub struct EventRecord {
    pub time_s: f64,
    pub event: FlightEvent,
    pub motor_status: MotorState,
    pub parachute_status: ParachuteStatus,
}
