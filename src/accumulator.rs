//! Per-step numerical integration (C6, §4.6): translates accumulated
//! force/moment into updated kinematic state. Translational motion uses the
//! shared `RungeKutta4` solver (§4.6 step 5); orientation uses the
//! semi-implicit quaternion update of `QuaternionExt::integrate_angular_rate`
//! (§4.6 step 6), both held over a fixed step validated against the same
//! `(0, 0.01]` s bound the teacher's node loop enforces implicitly via its
//! fixed-dt runner.
use nalgebra::{SVector, UnitQuaternion, Vector3};

use crate::error::EngineError;
use crate::math::ode::{OdeProblem, OdeSolver, RungeKutta4};
use crate::math::{Matrix3Ext, QuaternionExt};
use crate::rigid_body::RigidBody;

pub const MAX_STEP_S: f64 = 0.01;

/// Below this world-frame altitude the body is considered in contact with
/// the ground: position is clamped to it and downward velocity/acceleration
/// are zeroed (§4.6 step 7).
pub const GROUND_TOLERANCE_M: f64 = 0.01;

struct TranslationalProblem {
    acceleration: Vector3<f64>,
}

impl OdeProblem<6> for TranslationalProblem {
    fn derivative(&self, _t: f64, y: SVector<f64, 6>) -> SVector<f64, 6> {
        let velocity = y.fixed_rows::<3>(3).into_owned();
        let mut d = SVector::<f64, 6>::zeros();
        d.fixed_rows_mut::<3>(0).copy_from(&velocity);
        d.fixed_rows_mut::<3>(3).copy_from(&self.acceleration);
        d
    }
}

fn validate_step(dt: f64) -> Result<(), EngineError> {
    if dt > 0.0 && dt <= MAX_STEP_S && dt.is_finite() {
        Ok(())
    } else {
        Err(EngineError::InvalidStep(dt))
    }
}

/// Advance `body`'s kinematic state by `dt`, consuming its currently
/// accumulated force and moment (§4.6 steps 3-7). Does not reset the
/// accumulators or advance mass properties; the driver does that around
/// this call per the ordering in §4.11.
pub fn integrate(body: &mut RigidBody, dt: f64) -> Result<(), EngineError> {
    validate_step(dt)?;

    let acceleration = body.net_force() / body.mass;

    let inertia_world = body
        .inertia_body
        .transform_inertia_body_to_world(&body.orientation);
    let inverse_inertia_world = inertia_world.try_invert_inertia()?;
    let angular_acceleration = inverse_inertia_world * body.net_moment();

    let problem = TranslationalProblem { acceleration };
    let mut y0 = SVector::<f64, 6>::zeros();
    y0.fixed_rows_mut::<3>(0).copy_from(&body.position);
    y0.fixed_rows_mut::<3>(3).copy_from(&body.velocity);
    let y1 = RungeKutta4.solve(&problem, 0.0, dt, y0);

    body.position = y1.fixed_rows::<3>(0).into_owned();
    body.velocity = y1.fixed_rows::<3>(3).into_owned();
    body.acceleration = acceleration;

    let angular_velocity_body = body.orientation.inverse() * body.angular_velocity;
    body.orientation = body.orientation.integrate_angular_rate(&angular_velocity_body, dt);
    body.angular_velocity += angular_acceleration * dt;
    body.angular_acceleration = angular_acceleration;

    clamp_to_ground(body);

    Ok(())
}

fn clamp_to_ground(body: &mut RigidBody) {
    if body.position.y <= GROUND_TOLERANCE_M {
        body.position.y = 0.0;
        body.velocity.y = body.velocity.y.max(0.0);
        body.acceleration.y = body.acceleration.y.max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rigid_body::MassContribution;
    use approx::assert_relative_eq;
    use nalgebra::Matrix3;

    fn unit_body() -> RigidBody {
        RigidBody::from_mass_contributions(&[
            MassContribution {
                mass: 0.5,
                xcg: Vector3::new(-0.1, 0.0, 0.0),
                inertia_about_own_cg: Matrix3::from_diagonal(&Vector3::new(0.01, 0.02, 0.02)),
            },
            MassContribution {
                mass: 0.5,
                xcg: Vector3::new(0.1, 0.0, 0.0),
                inertia_about_own_cg: Matrix3::from_diagonal(&Vector3::new(0.01, 0.02, 0.02)),
            },
        ])
        .unwrap()
    }

    #[test]
    fn rejects_step_outside_bounds() {
        let mut body = unit_body();
        assert!(matches!(
            integrate(&mut body, 0.0),
            Err(EngineError::InvalidStep(_))
        ));
        assert!(matches!(
            integrate(&mut body, 0.02),
            Err(EngineError::InvalidStep(_))
        ));
    }

    #[test]
    fn free_fall_under_gravity_matches_kinematics() {
        let mut body = unit_body();
        body.position.y = 100.0;
        let dt = 0.001;
        for _ in 0..100 {
            body.reset_accumulators();
            body.add_force(Vector3::new(0.0, -9.80665 * body.mass, 0.0));
            integrate(&mut body, dt).unwrap();
        }
        let t = 0.1;
        let expected_y = 100.0 - 0.5 * 9.80665 * t * t;
        assert_relative_eq!(body.position.y, expected_y, epsilon = 1e-6);
    }

    #[test]
    fn ground_clamp_zeroes_downward_velocity_and_acceleration() {
        let mut body = unit_body();
        body.position.y = 0.005;
        body.velocity.y = -3.0;
        body.reset_accumulators();
        body.add_force(Vector3::new(0.0, -9.80665 * body.mass, 0.0));
        integrate(&mut body, 0.001).unwrap();
        assert_eq!(body.position.y, 0.0);
        assert!(body.velocity.y >= 0.0);
        assert!(body.acceleration.y >= 0.0);
    }

    #[test]
    fn world_frame_angular_velocity_is_converted_to_body_frame_before_integration() {
        // Body is yawed 90 deg about world Y. A world-X angular rate expressed
        // in this body frame is a body-Z rate, not a body-X rate, so treating
        // `angular_velocity` as already body-frame (the bug this guards
        // against) would drift the orientation about the wrong axis.
        let initial = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f64::consts::FRAC_PI_2);
        let mut body = unit_body();
        body.orientation = initial;
        body.angular_velocity = Vector3::new(1.0, 0.0, 0.0);
        body.reset_accumulators();
        integrate(&mut body, 0.001).unwrap();

        let naive = initial.integrate_angular_rate(&Vector3::new(1.0, 0.0, 0.0), 0.001);
        assert!(body.orientation.angle_to(&naive).abs() > 1e-6);
    }

    #[test]
    fn orientation_stays_unit_norm_after_integration() {
        let mut body = unit_body();
        body.angular_velocity = Vector3::new(0.5, -0.3, 0.2);
        body.reset_accumulators();
        body.add_moment(Vector3::new(0.01, 0.0, 0.0));
        integrate(&mut body, 0.005).unwrap();
        assert_relative_eq!(body.orientation.norm(), 1.0, epsilon = 1e-9);
    }
}
