//! Atmosphere model (C2): density/pressure/temperature/speed-of-sound as a
//! function of altitude. Grounded on the teacher's `AtmosphereIsa`
//! (`crater/aero/atmosphere.rs`), kept almost verbatim, with the
//! clamp-to-domain-and-log-once behavior of spec §4.2 added.
use std::sync::Once;

#[derive(Debug, Clone)]
pub struct AtmosphereSample {
    pub density: f64,
    pub pressure: f64,
    pub temperature: f64,
    pub speed_of_sound: f64,
}

/// Upper bound of the ISA model's validity domain; altitudes above this
/// are clamped (§4.2).
pub const ISA_DOMAIN_MAX_M: f64 = 86_000.0;

pub trait Atmosphere: Send {
    fn density(&self, altitude_m: f64) -> f64;
    fn pressure(&self, altitude_m: f64) -> f64;
    fn temperature(&self, altitude_m: f64) -> f64;
    fn speed_of_sound(&self, altitude_m: f64) -> f64;

    fn sample(&self, altitude_m: f64) -> AtmosphereSample {
        AtmosphereSample {
            density: self.density(altitude_m),
            pressure: self.pressure(altitude_m),
            temperature: self.temperature(altitude_m),
            speed_of_sound: self.speed_of_sound(altitude_m),
        }
    }
}

pub fn mach_number(v_air_norm_m_s: f64, speed_of_sound_m_s: f64) -> f64 {
    v_air_norm_m_s / speed_of_sound_m_s
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct IsaConfig {
    pub ground_temperature_k: f64,
    pub ground_pressure_pa: f64,
    pub gravity_m_s2: f64,
    pub lapse_rate_k_per_m: f64,
}

impl Default for IsaConfig {
    fn default() -> Self {
        IsaConfig {
            ground_temperature_k: 288.15,
            ground_pressure_pa: 101_325.0,
            gravity_m_s2: 9.80665,
            lapse_rate_k_per_m: -0.0065,
        }
    }
}

/// International Standard Atmosphere, valid to `ISA_DOMAIN_MAX_M`.
#[derive(Debug, Clone)]
pub struct AtmosphereIsa {
    config: IsaConfig,
    density_0: f64,
    specific_gas_constant: f64,
    clamp_warned: std::sync::Arc<Once>,
}

impl Default for AtmosphereIsa {
    fn default() -> Self {
        AtmosphereIsa::new(IsaConfig::default())
    }
}

impl AtmosphereIsa {
    const SPECIFIC_GAS_CONSTANT_AIR: f64 = 287.052874;

    pub fn new(config: IsaConfig) -> Self {
        let density_0 =
            config.ground_pressure_pa / (Self::SPECIFIC_GAS_CONSTANT_AIR * config.ground_temperature_k);

        AtmosphereIsa {
            config,
            density_0,
            specific_gas_constant: Self::SPECIFIC_GAS_CONSTANT_AIR,
            clamp_warned: std::sync::Arc::new(Once::new()),
        }
    }

    fn clamp_altitude(&self, altitude_m: f64) -> f64 {
        if altitude_m < 0.0 || altitude_m > ISA_DOMAIN_MAX_M {
            self.clamp_warned.call_once(|| {
                log::warn!(
                    "altitude {altitude_m:.1} m outside ISA domain [0, {ISA_DOMAIN_MAX_M}], clamping"
                );
            });
        }
        altitude_m.clamp(0.0, ISA_DOMAIN_MAX_M)
    }
}

impl Atmosphere for AtmosphereIsa {
    fn temperature(&self, altitude_m: f64) -> f64 {
        let h = self.clamp_altitude(altitude_m);
        self.config.ground_temperature_k + self.config.lapse_rate_k_per_m * h
    }

    fn pressure(&self, altitude_m: f64) -> f64 {
        let h = self.clamp_altitude(altitude_m);
        let t = self.temperature(h);
        let exponent = -self.config.gravity_m_s2 / (self.config.lapse_rate_k_per_m * self.specific_gas_constant);
        (t / self.config.ground_temperature_k).powf(exponent) * self.config.ground_pressure_pa
    }

    fn density(&self, altitude_m: f64) -> f64 {
        let h = self.clamp_altitude(altitude_m);
        let t = self.temperature(h);
        let exponent =
            -(self.config.gravity_m_s2 / (self.config.lapse_rate_k_per_m * self.specific_gas_constant) + 1.0);
        (t / self.config.ground_temperature_k).powf(exponent) * self.density_0
    }

    fn speed_of_sound(&self, altitude_m: f64) -> f64 {
        const HEAT_CAPACITY_RATIO_AIR: f64 = 1.4;
        f64::sqrt(HEAT_CAPACITY_RATIO_AIR * self.pressure(altitude_m) / self.density(altitude_m))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_isa_matches_known_values() {
        let isa = AtmosphereIsa::default();

        assert_relative_eq!(isa.temperature(0.0), 288.15, epsilon = 0.01);
        assert_relative_eq!(isa.temperature(1219.2), 280.23, epsilon = 0.01);

        assert_relative_eq!(isa.pressure(0.0), 101_325.0, epsilon = 1.0);
        assert_relative_eq!(isa.pressure(1219.2), 87_511.0, epsilon = 1.0);

        assert_relative_eq!(isa.density(0.0), 1.2250, epsilon = 0.0005);
        assert_relative_eq!(isa.density(1219.2), 1.0879, epsilon = 0.0005);
    }

    #[test]
    fn altitude_is_clamped_outside_domain() {
        let isa = AtmosphereIsa::default();
        assert_relative_eq!(isa.density(-100.0), isa.density(0.0), epsilon = 1e-12);
        assert_relative_eq!(
            isa.density(200_000.0),
            isa.density(ISA_DOMAIN_MAX_M),
            epsilon = 1e-12
        );
    }

    #[test]
    fn mach_number_is_velocity_over_speed_of_sound() {
        assert_relative_eq!(mach_number(343.0, 343.0), 1.0, epsilon = 1e-12);
    }
}
