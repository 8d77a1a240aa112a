//! Telemetry row schemas (§6): column layout is part of the engine's public
//! contract, so field names and order here are load-bearing, not cosmetic.
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MotionRow {
    pub time: f64,
    pub altitude: f64,
    pub velocity: f64,
    pub acceleration: f64,
    pub thrust: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventRow {
    pub time: f64,
    pub event_name: String,
    pub motor_status: String,
    pub parachute_status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DynamicsRow {
    pub time: f64,
    pub position_x: f64,
    pub position_y: f64,
    pub position_z: f64,
    pub velocity_x: f64,
    pub velocity_y: f64,
    pub velocity_z: f64,
    pub acceleration_x: f64,
    pub acceleration_y: f64,
    pub acceleration_z: f64,
    pub orientation_x: f64,
    pub orientation_y: f64,
    pub orientation_z: f64,
    pub orientation_w: f64,
}
