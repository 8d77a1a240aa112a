//! Extension operations on `nalgebra::Matrix3<f64>` (C1, inertia tensors).
use nalgebra::{Matrix3, UnitQuaternion};

use crate::error::EngineError;

pub trait Matrix3Ext: Sized {
    /// `R * I_body * R^T`, transforming a body-frame inertia tensor into
    /// the world frame given the current body→world orientation (§4.6 step 4).
    fn transform_inertia_body_to_world(&self, orientation: &UnitQuaternion<f64>) -> Matrix3<f64>;

    /// Symmetric positive-definite inverse, or `SingularInertia` if the
    /// tensor cannot be inverted.
    fn try_invert_inertia(&self) -> Result<Matrix3<f64>, EngineError>;
}

impl Matrix3Ext for Matrix3<f64> {
    fn transform_inertia_body_to_world(&self, orientation: &UnitQuaternion<f64>) -> Matrix3<f64> {
        let r = orientation.to_rotation_matrix();
        r.matrix() * self * r.matrix().transpose()
    }

    fn try_invert_inertia(&self) -> Result<Matrix3<f64>, EngineError> {
        self.try_inverse().ok_or(EngineError::SingularInertia)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn identity_orientation_leaves_inertia_unchanged() {
        let i = Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
        let world = i.transform_inertia_body_to_world(&UnitQuaternion::identity());
        assert_relative_eq!(world, i, epsilon = 1e-12);
    }

    #[test]
    fn singular_inertia_fails_to_invert() {
        let i = Matrix3::zeros();
        assert!(i.try_invert_inertia().is_err());
    }

    #[test]
    fn rotation_is_similarity_transform_preserving_eigenvalues() {
        let i = Matrix3::from_diagonal(&nalgebra::Vector3::new(1.0, 2.0, 3.0));
        let q = UnitQuaternion::from_axis_angle(&nalgebra::Vector3::z_axis(), FRAC_PI_2);
        let world = i.transform_inertia_body_to_world(&q);
        assert_relative_eq!(world.trace(), i.trace(), epsilon = 1e-9);
    }
}
