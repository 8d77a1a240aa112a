//! Extension operations on `nalgebra::UnitQuaternion<f64>` / `Quaternion<f64>`
//! (C1, body→world orientation). Grounded on the quaternion-kinematics
//! pattern in the teacher's `Rocket::odefun` (`qw`/`qdot` construction from a
//! pure-vector angular-rate quaternion), generalized into reusable methods.
use nalgebra::{Quaternion, UnitQuaternion, Vector3};

use crate::error::EngineError;

pub trait QuaternionExt: Sized {
    /// Unit quaternion rotating `axis` through `angle_rad` (right-hand rule).
    fn from_axis_angle_checked(
        axis: &Vector3<f64>,
        angle_rad: f64,
    ) -> Result<UnitQuaternion<f64>, EngineError>;

    /// One semi-implicit Euler step of `q_dot = 0.5 * q ⊗ (0, w_body)`,
    /// renormalized, per spec §4.6 step 6.
    fn integrate_angular_rate(&self, w_body: &Vector3<f64>, dt: f64) -> UnitQuaternion<f64>;
}

impl QuaternionExt for UnitQuaternion<f64> {
    fn from_axis_angle_checked(
        axis: &Vector3<f64>,
        angle_rad: f64,
    ) -> Result<UnitQuaternion<f64>, EngineError> {
        if !angle_rad.is_finite() {
            return Err(EngineError::NonFiniteArithmetic {
                context: "from_axis_angle",
            });
        }
        let unit_axis = nalgebra::Unit::try_new(*axis, super::vec3::NORMALIZE_EPSILON)
            .ok_or(EngineError::NonFiniteArithmetic {
                context: "from_axis_angle: degenerate axis",
            })?;
        Ok(UnitQuaternion::from_axis_angle(&unit_axis, angle_rad))
    }

    fn integrate_angular_rate(&self, w_body: &Vector3<f64>, dt: f64) -> UnitQuaternion<f64> {
        let omega = Quaternion::from_parts(0.0, *w_body);
        let q_dot = self.into_inner() * omega * 0.5;
        let updated = self.into_inner() + q_dot * dt;
        UnitQuaternion::from_quaternion(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn axis_angle_rotates_as_expected() {
        let q = UnitQuaternion::from_axis_angle_checked(&Vector3::z_axis(), FRAC_PI_2).unwrap();
        let rotated = q * Vector3::x();
        assert_relative_eq!(rotated, Vector3::y(), epsilon = 1e-9);
    }

    #[test]
    fn integration_preserves_unit_norm() {
        let q = UnitQuaternion::identity();
        let w = Vector3::new(0.1, 0.2, 0.3);
        let next = q.integrate_angular_rate(&w, 0.001);
        assert_relative_eq!(next.norm(), 1.0, epsilon = 1e-9);
    }
}
