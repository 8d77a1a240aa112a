//! Launch rail constraint (C7, §4.7): while on the rail, the body is free
//! to slide along a single fixed direction only — net force off-axis is
//! discarded and no moments are generated — until it has traveled the rail
//! length, at which point it is released to unconstrained 6-DoF flight.
use nalgebra::{UnitQuaternion, Vector3};

use crate::rigid_body::RigidBody;

#[derive(Debug, Clone)]
pub struct LaunchRail {
    pub rail_length_m: f64,
    /// Angle from vertical (0 = straight up), radians.
    pub angle_from_vertical_rad: f64,
    /// Azimuth from north, radians.
    pub azimuth_from_north_rad: f64,

    on_rail: bool,
    launch_position: Vector3<f64>,
}

impl LaunchRail {
    pub fn new(rail_length_m: f64, angle_from_vertical_rad: f64, azimuth_from_north_rad: f64) -> Self {
        LaunchRail {
            rail_length_m,
            angle_from_vertical_rad,
            azimuth_from_north_rad,
            on_rail: true,
            launch_position: Vector3::zeros(),
        }
    }

    pub fn is_on_rail(&self) -> bool {
        self.on_rail
    }

    /// Unit vector along the rail, world frame: X = north, Y = up, Z = east.
    pub fn direction(&self) -> Vector3<f64> {
        let tilt = self.angle_from_vertical_rad;
        let az = self.azimuth_from_north_rad;
        Vector3::new(
            tilt.sin() * az.cos(),
            tilt.cos(),
            tilt.sin() * az.sin(),
        )
    }

    pub fn arm(&mut self, launch_position: Vector3<f64>) {
        self.on_rail = true;
        self.launch_position = launch_position;
    }

    /// Project the body's accumulated force onto the rail direction and
    /// zero its moments, then check whether it has cleared the rail.
    /// Returns `true` the step rail exit occurs.
    pub fn constrain(&mut self, body: &mut RigidBody) -> bool {
        if !self.on_rail {
            return false;
        }

        let direction = self.direction();
        let axial_force = body.net_force().dot(&direction) * direction;
        body.add_moment(-body.net_moment());
        let discarded = body.net_force() - axial_force;
        body.add_force(-discarded);

        body.angular_velocity = Vector3::zeros();
        body.orientation = UnitQuaternion::rotation_between(&Vector3::x(), &direction)
            .unwrap_or_else(|| UnitQuaternion::from_axis_angle(&Vector3::z_axis(), std::f64::consts::PI));

        let traveled = (body.position - self.launch_position).dot(&direction);
        if traveled >= self.rail_length_m {
            self.on_rail = false;
            return true;
        }
        false
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
    fn vertical_rail_direction_is_straight_up() {
        let rail = LaunchRail::new(2.0, 0.0, 0.0);
        assert_relative_eq!(rail.direction(), Vector3::new(0.0, 1.0, 0.0), epsilon = 1e-12);
    }

    #[test]
    fn off_axis_force_is_discarded_while_on_rail() {
        let mut rail = LaunchRail::new(2.0, 0.0, 0.0);
        let mut body = unit_body();
        body.add_force(Vector3::new(5.0, 10.0, -3.0));
        body.add_moment(Vector3::new(1.0, 1.0, 1.0));
        rail.constrain(&mut body);
        assert_relative_eq!(body.net_force(), Vector3::new(0.0, 10.0, 0.0), epsilon = 1e-9);
        assert_relative_eq!(body.net_moment(), Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn orientation_is_locked_to_rail_direction_while_constrained() {
        let mut rail = LaunchRail::new(2.0, 30.0_f64.to_radians(), 0.0);
        let mut body = unit_body();
        body.add_force(Vector3::new(0.0, 10.0, 0.0));
        rail.constrain(&mut body);
        assert_relative_eq!(
            body.orientation * Vector3::x(),
            rail.direction(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn exits_rail_once_travel_reaches_rail_length() {
        let mut rail = LaunchRail::new(1.0, 0.0, 0.0);
        let mut body = unit_body();
        rail.arm(Vector3::zeros());
        body.position = Vector3::new(0.0, 1.5, 0.0);
        body.add_force(Vector3::new(0.0, 10.0, 0.0));
        let exited = rail.constrain(&mut body);
        assert!(exited);
        assert!(!rail.is_on_rail());
    }
}
