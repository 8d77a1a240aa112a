//! Aerodynamics model (C4): drag/lift coefficients and center-of-pressure
//! per component, reduced to the closed-form regimes of spec §4.4. The
//! surrounding shape — an injected `Atmosphere`, an `AeroState` in /
//! `AerodynamicsResult` out, reference geometry held by the struct — is
//! kept from the teacher's `Aerodynamics`/`AeroState`/`AerodynamicsResult`
//! (`crater/sim/aero/aerodynamics.rs`); the coefficient build-up itself is
//! replaced by spec's piecewise `C_D(M)`.
use nalgebra::Vector3;

use crate::atmosphere::{mach_number, Atmosphere};

/// Below this airspeed, aerodynamic contributions are zero (§4.4).
pub const MIN_AIRSPEED_M_S: f64 = 1.0e-3;

#[derive(Debug, Clone, Copy)]
pub struct AeroCoefficients {
    pub lift_slope_per_rad: f64,
    pub moment_slope_per_rad: f64,
    /// Center-of-pressure offset from the center of mass, along body +X
    /// (positive = aft of CG, the stabilizing convention).
    pub center_of_pressure_offset_m: f64,
}

pub struct AeroState {
    pub altitude_m: f64,
    pub v_body: Vector3<f64>,
    pub angular_velocity_body: Vector3<f64>,
}

#[derive(Debug, Clone, Copy)]
pub struct AerodynamicsResult {
    pub alpha_rad: f64,
    pub mach: f64,
    pub drag_coefficient: f64,
    pub forces_body: Vector3<f64>,
    pub moments_body: Vector3<f64>,
}

impl AerodynamicsResult {
    fn zero() -> Self {
        AerodynamicsResult {
            alpha_rad: 0.0,
            mach: 0.0,
            drag_coefficient: 0.0,
            forces_body: Vector3::zeros(),
            moments_body: Vector3::zeros(),
        }
    }
}

/// `C_D(M)`: continuous piecewise drag coefficient (§4.4, §8 boundary
/// property: continuous at M=0.8 and M=1.2).
pub fn drag_coefficient(mach: f64) -> f64 {
    if mach < 0.8 {
        0.2 + 0.1 * mach
    } else if mach <= 1.2 {
        0.5 + 0.5 * (std::f64::consts::PI * (mach - 0.8) / 0.4).sin()
    } else {
        0.8 / (1.0 + mach.sqrt())
    }
}

pub struct Aerodynamics {
    atmosphere: Box<dyn Atmosphere>,
    reference_area_m2: f64,
    coefficients: AeroCoefficients,
}

impl Aerodynamics {
    pub fn new(
        atmosphere: Box<dyn Atmosphere>,
        reference_area_m2: f64,
        coefficients: AeroCoefficients,
    ) -> Self {
        Aerodynamics {
            atmosphere,
            reference_area_m2,
            coefficients,
        }
    }

    /// Angle of attack in the body XZ plane, safe against a near-zero
    /// axial component (teacher's `Aerodynamics::alpha` pattern).
    fn angle_of_attack(v_body: &Vector3<f64>) -> f64 {
        const V_SMALL: f64 = 1.0e-6;
        if v_body.x.abs() >= V_SMALL {
            (v_body.z / v_body.x).atan()
        } else if v_body.z.abs() >= V_SMALL {
            std::f64::consts::FRAC_PI_2 * v_body.z.signum()
        } else {
            0.0
        }
    }

    pub fn calc(&self, state: &AeroState) -> AerodynamicsResult {
        let v_norm = state.v_body.norm();
        if v_norm < MIN_AIRSPEED_M_S {
            return AerodynamicsResult::zero();
        }

        let density = self.atmosphere.density(state.altitude_m);
        let speed_of_sound = self.atmosphere.speed_of_sound(state.altitude_m);
        let mach = mach_number(v_norm, speed_of_sound);

        let alpha = Self::angle_of_attack(&state.v_body);
        let cd = drag_coefficient(mach);

        let dynamic_pressure = 0.5 * density * v_norm * v_norm;

        let drag_force = -dynamic_pressure * self.reference_area_m2 * cd * (state.v_body / v_norm);

        let lift_force = Vector3::new(
            0.0,
            0.0,
            -dynamic_pressure * self.reference_area_m2 * self.coefficients.lift_slope_per_rad * alpha,
        );

        let forces_body = drag_force + lift_force;

        let cp_arm = Vector3::new(self.coefficients.center_of_pressure_offset_m, 0.0, 0.0);
        let moment_from_lift = cp_arm.cross(&lift_force);

        let direct_pitch_moment = dynamic_pressure
            * self.reference_area_m2
            * self.coefficients.moment_slope_per_rad
            * alpha;

        let moments_body = moment_from_lift + Vector3::new(0.0, direct_pitch_moment, 0.0);

        AerodynamicsResult {
            alpha_rad: alpha,
            mach,
            drag_coefficient: cd,
            forces_body,
            moments_body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atmosphere::AtmosphereIsa;
    use approx::assert_relative_eq;

    #[test]
    fn drag_coefficient_is_continuous_at_regime_boundaries() {
        let just_below = drag_coefficient(0.8 - 1e-9);
        let at_subsonic_edge = drag_coefficient(0.8);
        assert_relative_eq!(just_below, at_subsonic_edge, epsilon = 1e-6);

        let at_transonic_edge = drag_coefficient(1.2);
        let just_above = drag_coefficient(1.2 + 1e-9);
        assert_relative_eq!(at_transonic_edge, just_above, epsilon = 1e-6);
    }

    #[test]
    fn below_min_airspeed_aero_is_zero() {
        let aero = Aerodynamics::new(
            Box::new(AtmosphereIsa::default()),
            0.01,
            AeroCoefficients {
                lift_slope_per_rad: 2.0,
                moment_slope_per_rad: -0.5,
                center_of_pressure_offset_m: 0.2,
            },
        );
        let result = aero.calc(&AeroState {
            altitude_m: 0.0,
            v_body: Vector3::new(1e-4, 0.0, 0.0),
            angular_velocity_body: Vector3::zeros(),
        });
        assert_eq!(result.forces_body, Vector3::zeros());
        assert_eq!(result.moments_body, Vector3::zeros());
    }

    #[test]
    fn drag_opposes_axial_velocity() {
        let aero = Aerodynamics::new(
            Box::new(AtmosphereIsa::default()),
            0.01,
            AeroCoefficients {
                lift_slope_per_rad: 0.0,
                moment_slope_per_rad: 0.0,
                center_of_pressure_offset_m: 0.2,
            },
        );
        let result = aero.calc(&AeroState {
            altitude_m: 0.0,
            v_body: Vector3::new(100.0, 0.0, 0.0),
            angular_velocity_body: Vector3::zeros(),
        });
        assert!(result.forces_body.x < 0.0);
        assert_relative_eq!(result.forces_body.y, 0.0, epsilon = 1e-12);
        assert_relative_eq!(result.forces_body.z, 0.0, epsilon = 1e-9);
    }
}
