//! Rocket geometry (§3 `RocketGeometry`) and structural mass/inertia
//! aggregation (C5). The component breakdown and parallel-axis
//! aggregation are grounded on the teacher's
//! `RocketMassProperties::calc_mass`/`skew_matrix`/`parallel_axis_matrix`
//! (`crater/sim/rocket/mass.rs`), generalized from "engine + one body mass"
//! to "motor + a small fixed set of structural components".
//!
//! Body-frame convention (§9): origin at the nose tip, +X increasing aft
//! along the body tube toward the tail; this is the frame in which every
//! component's axial position below is expressed.
use nalgebra::{Matrix3, Vector3};

use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoseShape {
    Conical,
    Ogive,
    Elliptical,
}

#[derive(Debug, Clone)]
pub struct NoseCone {
    pub shape: NoseShape,
    pub length: f64,
    pub base_radius: f64,
}

#[derive(Debug, Clone)]
pub struct BodyTube {
    pub length: f64,
    pub outer_radius: f64,
    pub thickness: f64,
    pub material_density: f64,
}

#[derive(Debug, Clone)]
pub struct FinSet {
    pub count: u32,
    pub root_chord: f64,
    pub tip_chord: f64,
    pub span: f64,
    pub sweep: f64,
    pub thickness: f64,
}

#[derive(Debug, Clone)]
pub struct Parachute {
    /// C_D * A, the drag area used by the recovery subsystem.
    pub drag_area: f64,
    pub deployment_altitude: f64,
}

#[derive(Debug, Clone)]
pub struct RocketGeometry {
    pub nose: NoseCone,
    pub body_tube: BodyTube,
    pub fins: Option<FinSet>,
    pub parachute: Option<Parachute>,
}

/// A single structural component's contribution to the aggregate: its
/// mass, axial center-of-mass position (body X, from the nose tip), and
/// inertia tensor about its *own* centroid in body axes.
struct MassComponent {
    mass: f64,
    xcg: Vector3<f64>,
    inertia_about_own_cg: Matrix3<f64>,
}

/// Thin-walled cylindrical shell about its own centroid: hoop moment
/// `m*r^2` about the axial direction, `m*(6r^2 + h^2)/12` transverse.
fn thin_shell_cylinder_inertia(mass: f64, radius: f64, length: f64) -> Matrix3<f64> {
    let axial = mass * radius * radius;
    let transverse = mass * (6.0 * radius * radius + length * length) / 12.0;
    Matrix3::from_diagonal(&Vector3::new(axial, transverse, transverse))
}

impl RocketGeometry {
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.nose.length <= 0.0 || self.nose.base_radius <= 0.0 {
            return Err(EngineError::InvalidGeometry(
                "nose cone length and base radius must be positive".into(),
            ));
        }
        if self.body_tube.length <= 0.0
            || self.body_tube.outer_radius <= 0.0
            || self.body_tube.thickness <= 0.0
            || self.body_tube.thickness >= self.body_tube.outer_radius
            || self.body_tube.material_density <= 0.0
        {
            return Err(EngineError::InvalidGeometry(
                "body tube dimensions and material density must be positive and consistent"
                    .into(),
            ));
        }
        if let Some(fins) = &self.fins {
            if fins.count == 0 || fins.root_chord <= 0.0 || fins.span <= 0.0 {
                return Err(EngineError::InvalidGeometry(
                    "fin set must have at least one fin with positive chord and span".into(),
                ));
            }
        }
        Ok(())
    }

    /// Reference area for aerodynamic force scaling: π·(body_radius)².
    pub fn reference_area(&self) -> f64 {
        std::f64::consts::PI * self.body_tube.outer_radius * self.body_tube.outer_radius
    }

    pub fn overall_length(&self) -> f64 {
        self.nose.length + self.body_tube.length
    }

    fn components(&self) -> Vec<MassComponent> {
        let mut out = Vec::with_capacity(3);

        // Nose cone modeled as a thin conical shell of the body tube's
        // material/thickness: centroid at 2/3 of its length from the apex,
        // inertia approximated with the same shell formulas as the body
        // tube using the nose's mean radius.
        let nose_area = std::f64::consts::PI * self.nose.base_radius * (self.nose.length.hypot(self.nose.base_radius));
        let nose_mass = self.body_tube.material_density * self.body_tube.thickness * nose_area;
        out.push(MassComponent {
            mass: nose_mass,
            xcg: Vector3::new(self.nose.length * 2.0 / 3.0, 0.0, 0.0),
            inertia_about_own_cg: thin_shell_cylinder_inertia(
                nose_mass,
                self.nose.base_radius * 0.5,
                self.nose.length,
            ),
        });

        // Body tube: thin cylindrical shell.
        let tube_area =
            2.0 * std::f64::consts::PI * self.body_tube.outer_radius * self.body_tube.length;
        let tube_mass = self.body_tube.material_density * self.body_tube.thickness * tube_area;
        out.push(MassComponent {
            mass: tube_mass,
            xcg: Vector3::new(self.nose.length + self.body_tube.length / 2.0, 0.0, 0.0),
            inertia_about_own_cg: thin_shell_cylinder_inertia(
                tube_mass,
                self.body_tube.outer_radius,
                self.body_tube.length,
            ),
        });

        if let Some(fins) = &self.fins {
            let fin_area = 0.5 * (fins.root_chord + fins.tip_chord) * fins.span;
            let fin_mass =
                fins.count as f64 * self.body_tube.material_density * fins.thickness * fin_area;
            // Flat-plate approximation: contributes mostly to transverse
            // (pitch/yaw) inertia via the span, negligible about the roll
            // axis beyond the parallel-axis term added below.
            let i_roll = fin_mass * fins.span * fins.span / 12.0;
            let i_transverse = fin_mass * fins.root_chord * fins.root_chord / 12.0;
            out.push(MassComponent {
                mass: fin_mass,
                xcg: Vector3::new(
                    self.nose.length + self.body_tube.length - fins.root_chord / 2.0,
                    0.0,
                    0.0,
                ),
                inertia_about_own_cg: Matrix3::from_diagonal(&Vector3::new(
                    i_roll,
                    i_transverse,
                    i_transverse,
                )),
            });
        }

        out
    }

    /// Aggregate structural (non-motor) mass, center of mass (body X from
    /// the nose tip), and inertia tensor about that center of mass, via
    /// the parallel-axis theorem.
    pub fn aggregate_structural(&self) -> (f64, Vector3<f64>, Matrix3<f64>) {
        let components = self.components();

        let total_mass: f64 = components.iter().map(|c| c.mass).sum();
        let xcg: Vector3<f64> = components.iter().map(|c| c.mass * c.xcg).sum::<Vector3<f64>>() / total_mass;

        let inertia: Matrix3<f64> = components
            .iter()
            .map(|c| c.inertia_about_own_cg + c.mass * parallel_axis_matrix(xcg - c.xcg))
            .sum();

        (total_mass, xcg, inertia)
    }
}

/// `(skew(d))^T * skew(d))`, the parallel-axis correction for a point
/// offset `d` from the reference center of mass — verbatim from the
/// teacher's `RocketMassProperties::parallel_axis_matrix`.
pub fn parallel_axis_matrix(offset: Vector3<f64>) -> Matrix3<f64> {
    let cross = skew_matrix(offset);
    cross.transpose() * cross
}

pub fn skew_matrix(v: Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_geometry() -> RocketGeometry {
        RocketGeometry {
            nose: NoseCone {
                shape: NoseShape::Conical,
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
        }
    }

    #[test]
    fn validates_sane_geometry() {
        assert!(sample_geometry().validate().is_ok());
    }

    #[test]
    fn rejects_non_positive_dimensions() {
        let mut g = sample_geometry();
        g.body_tube.length = 0.0;
        assert!(g.validate().is_err());
    }

    #[test]
    fn reference_area_is_pi_r_squared() {
        let g = sample_geometry();
        assert!((g.reference_area() - std::f64::consts::PI * 0.05 * 0.05).abs() < 1e-12);
    }

    #[test]
    fn aggregate_mass_is_positive_and_inertia_symmetric() {
        let g = sample_geometry();
        let (mass, _cg, inertia) = g.aggregate_structural();
        assert!(mass > 0.0);
        let asymmetry = inertia - inertia.transpose();
        let max_abs = asymmetry.iter().fold(0.0f64, |acc, v| acc.max(v.abs()));
        assert!(max_abs < 1e-9);
        assert!(inertia.try_inverse().is_some());
    }
}
