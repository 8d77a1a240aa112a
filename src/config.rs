//! Resolved simulation configuration (§6). This module types the config
//! value the driver is constructed from; parsing a config *file* into this
//! shape is an external collaborator's job (TOML/YAML/JSON, whichever the
//! embedding application already uses), same division of labor the
//! teacher's `ParameterMap` sits behind (`parameters::ParameterMap`) even
//! though here the shape is a plain `serde::Deserialize` struct rather than
//! an untyped parameter tree.
use std::collections::HashMap;

use serde::Deserialize;

use crate::atmosphere::IsaConfig;
use crate::error::EngineError;

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSection {
    pub step_s: f64,
    pub max_time_s: f64,
    #[serde(default = "default_ground_tolerance_m")]
    pub ground_tolerance_m: f64,
}

fn default_ground_tolerance_m() -> f64 {
    0.01
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AtmosphereKind {
    Isa,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AtmosphereSection {
    pub kind: AtmosphereKind,
    #[serde(default)]
    pub isa: IsaConfig,
}

impl Default for AtmosphereSection {
    fn default() -> Self {
        AtmosphereSection {
            kind: AtmosphereKind::Isa,
            isa: IsaConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EnvironmentSection {
    #[serde(default = "default_gravity_m_s2")]
    pub gravity_m_s2: f64,
    #[serde(default)]
    pub atmosphere: AtmosphereSection,
}

fn default_gravity_m_s2() -> f64 {
    9.80665
}

impl Default for EnvironmentSection {
    fn default() -> Self {
        EnvironmentSection {
            gravity_m_s2: default_gravity_m_s2(),
            atmosphere: AtmosphereSection::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LaunchRailSection {
    pub length_m: f64,
    pub angle_rad_from_vertical: f64,
    pub azimuth_rad_from_north: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecoverySection {
    pub main_deploy_altitude_m: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationConfig {
    pub simulation: SimulationSection,
    #[serde(default)]
    pub environment: EnvironmentSection,
    pub launchrail: LaunchRailSection,
    pub recovery: RecoverySection,
    #[serde(default)]
    pub plugins: Vec<PluginConfig>,
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !(self.simulation.step_s > 0.0 && self.simulation.step_s <= 0.01) {
            return Err(EngineError::InvalidStep(self.simulation.step_s));
        }
        if self.simulation.max_time_s <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "simulation.max_time_s must be positive".into(),
            ));
        }
        if self.launchrail.length_m <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "launchrail.length_m must be positive".into(),
            ));
        }
        if self.recovery.main_deploy_altitude_m <= 0.0 {
            return Err(EngineError::InvalidConfig(
                "recovery.main_deploy_altitude_m must be positive".into(),
            ));
        }
        Ok(())
    }
}
