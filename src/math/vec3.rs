//! Extension operations on `nalgebra::Vector3<f64>` (C1, world/body frame
//! vectors). Kept as a thin trait over `nalgebra` rather than a hand-rolled
//! vector type: every repo in the reference pack leans on `nalgebra` for
//! this, and a bespoke `Vec3` would just be a worse `Vector3`.
use nalgebra::Vector3;

use crate::error::EngineError;

/// Below this norm, `normalize()` is considered ill-conditioned and fails
/// rather than dividing by a near-zero length.
pub const NORMALIZE_EPSILON: f64 = 1.0e-9;

pub trait Vec3Ext: Sized {
    fn is_finite_vec(&self) -> bool;
    fn require_finite(&self, context: &'static str) -> Result<(), EngineError>;
    fn try_normalize_checked(&self, context: &'static str) -> Result<Vector3<f64>, EngineError>;
}

impl Vec3Ext for Vector3<f64> {
    fn is_finite_vec(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    fn require_finite(&self, context: &'static str) -> Result<(), EngineError> {
        if self.is_finite_vec() {
            Ok(())
        } else {
            Err(EngineError::NonFiniteArithmetic { context })
        }
    }

    fn try_normalize_checked(&self, context: &'static str) -> Result<Vector3<f64>, EngineError> {
        self.require_finite(context)?;
        let norm = self.norm();
        if norm < NORMALIZE_EPSILON {
            return Err(EngineError::NonFiniteArithmetic { context });
        }
        Ok(self / norm)
    }
}
