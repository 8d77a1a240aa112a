//! Engine-wide error taxonomy.
//!
//! Every fallible boundary of the engine returns `EngineError` rather than
//! an opaque `anyhow::Error`: the driver's caller needs to distinguish
//! construction-time validation failures from per-step state-integrity
//! failures from subsystem/plugin failures, and a closed enum is how that
//! distinction survives the crate boundary.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("simulation step {0} is outside (0, 0.01] seconds")]
    InvalidStep(f64),

    #[error("invalid thrust curve: {0}")]
    InvalidThrustCurve(String),

    #[error("invalid rocket geometry: {0}")]
    InvalidGeometry(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("mass became non-positive or non-finite: {0}")]
    InvalidMass(f64),

    #[error("aggregate inertia tensor is singular and cannot be inverted")]
    SingularInertia,

    #[error("arithmetic operation produced a non-finite value in {context}")]
    NonFiniteArithmetic { context: &'static str },

    #[error("orientation quaternion denormalized: |q| = {norm}")]
    OrientationDenormalized { norm: f64 },

    #[error("plugin '{plugin_name}' failed during {phase}: {cause}")]
    PluginError {
        plugin_name: String,
        phase: &'static str,
        cause: String,
    },

    #[error("flight rules reached an inconsistent state: {0}")]
    RulesInconsistency(String),

    #[error("telemetry sink '{0}' is already started")]
    SinkAlreadyStarted(String),

    #[error("telemetry sink '{0}' is unavailable: {1}")]
    SinkUnavailable(String, String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
