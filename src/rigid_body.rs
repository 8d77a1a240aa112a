//! 6-DoF rigid body state (§3 `RigidBody`, C5). Construction aggregates the
//! structural mass properties from `geometry::RocketGeometry` with the
//! motor's current contribution using the same parallel-axis theorem the
//! teacher's `RocketMassProperties::calc_mass` applies to engine + body.
use nalgebra::{Matrix3, UnitQuaternion, Vector3};

use crate::error::EngineError;
use crate::geometry::parallel_axis_matrix;
use crate::math::Matrix3Ext;

#[derive(Debug, Clone)]
pub struct RigidBody {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,

    pub orientation: UnitQuaternion<f64>,
    pub angular_velocity: Vector3<f64>,
    pub angular_acceleration: Vector3<f64>,

    pub mass: f64,
    pub inertia_body: Matrix3<f64>,
    pub inverse_inertia_body: Matrix3<f64>,

    accumulated_force: Vector3<f64>,
    accumulated_moment: Vector3<f64>,
}

/// A single mass contributor to the aggregate rigid body: mass, axial
/// center-of-mass position (body X from the nose tip), and inertia tensor
/// about its own centroid. Structural components and the motor both reduce
/// to this shape before aggregation.
pub struct MassContribution {
    pub mass: f64,
    pub xcg: Vector3<f64>,
    pub inertia_about_own_cg: Matrix3<f64>,
}

impl RigidBody {
    /// Build a rigid body at rest at the origin from a set of mass
    /// contributions (structural components plus the motor's current
    /// wet-mass contribution), aggregating mass, center of mass, and
    /// inertia via the parallel-axis theorem.
    pub fn from_mass_contributions(contributions: &[MassContribution]) -> Result<Self, EngineError> {
        let total_mass: f64 = contributions.iter().map(|c| c.mass).sum();
        if !total_mass.is_finite() || total_mass <= 0.0 {
            return Err(EngineError::InvalidMass(total_mass));
        }

        let xcg: Vector3<f64> = contributions
            .iter()
            .map(|c| c.mass * c.xcg)
            .sum::<Vector3<f64>>()
            / total_mass;

        let inertia: Matrix3<f64> = contributions
            .iter()
            .map(|c| c.inertia_about_own_cg + c.mass * parallel_axis_matrix(xcg - c.xcg))
            .sum();

        let inverse_inertia = inertia.try_invert_inertia()?;

        Ok(RigidBody {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            acceleration: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            angular_velocity: Vector3::zeros(),
            angular_acceleration: Vector3::zeros(),
            mass: total_mass,
            inertia_body: inertia,
            inverse_inertia_body: inverse_inertia,
            accumulated_force: Vector3::zeros(),
            accumulated_moment: Vector3::zeros(),
        })
    }

    /// Replace the mass/inertia properties in place as the motor depletes,
    /// keeping kinematic state (position, velocity, orientation, rates)
    /// untouched. Called once per step before force accumulation (§4.6).
    pub fn update_mass_properties(
        &mut self,
        contributions: &[MassContribution],
    ) -> Result<(), EngineError> {
        let rebuilt = Self::from_mass_contributions(contributions)?;
        self.mass = rebuilt.mass;
        self.inertia_body = rebuilt.inertia_body;
        self.inverse_inertia_body = rebuilt.inverse_inertia_body;
        Ok(())
    }

    pub fn reset_accumulators(&mut self) {
        self.accumulated_force = Vector3::zeros();
        self.accumulated_moment = Vector3::zeros();
    }

    pub fn add_force(&mut self, force_world: Vector3<f64>) {
        self.accumulated_force += force_world;
    }

    pub fn add_moment(&mut self, moment_world: Vector3<f64>) {
        self.accumulated_moment += moment_world;
    }

    /// Add a force acting at `offset_world` from the center of mass,
    /// contributing both the force itself and the moment `offset x F` it
    /// induces about the center of mass.
    pub fn add_force_at(&mut self, force_world: Vector3<f64>, offset_world: Vector3<f64>) {
        self.add_force(force_world);
        self.add_moment(offset_world.cross(&force_world));
    }

    pub fn net_force(&self) -> Vector3<f64> {
        self.accumulated_force
    }

    pub fn net_moment(&self) -> Vector3<f64> {
        self.accumulated_moment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn point_mass(mass: f64, xcg: Vector3<f64>) -> MassContribution {
        MassContribution {
            mass,
            xcg,
            inertia_about_own_cg: Matrix3::zeros(),
        }
    }

    #[test]
    fn aggregates_mass_and_center_of_gravity() {
        let body = RigidBody::from_mass_contributions(&[
            point_mass(1.0, Vector3::new(0.0, 0.0, 0.0)),
            point_mass(1.0, Vector3::new(2.0, 0.0, 0.0)),
        ])
        .unwrap();
        assert_relative_eq!(body.mass, 2.0, epsilon = 1e-12);
        assert!(body.inertia_body.try_inverse().is_some());
    }

    #[test]
    fn rejects_non_positive_total_mass() {
        let err = RigidBody::from_mass_contributions(&[point_mass(0.0, Vector3::zeros())])
            .unwrap_err();
        assert!(matches!(err, EngineError::InvalidMass(_)));
    }

    #[test]
    fn rejects_singular_aggregate_inertia() {
        // A single point mass at the aggregate center of mass contributes
        // zero parallel-axis correction and zero own-inertia: singular.
        let err =
            RigidBody::from_mass_contributions(&[point_mass(1.0, Vector3::zeros())]).unwrap_err();
        assert!(matches!(err, EngineError::SingularInertia));
    }

    #[test]
    fn force_at_offset_contributes_expected_moment() {
        let mut body = RigidBody::from_mass_contributions(&[
            point_mass(1.0, Vector3::new(-0.5, 0.0, 0.0)),
            point_mass(1.0, Vector3::new(0.5, 0.0, 0.0)),
        ])
        .unwrap();
        body.add_force_at(Vector3::new(0.0, 0.0, 10.0), Vector3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(body.net_force(), Vector3::new(0.0, 0.0, 10.0), epsilon = 1e-12);
        assert_relative_eq!(body.net_moment(), Vector3::new(0.0, -10.0, 0.0), epsilon = 1e-12);
    }
}
