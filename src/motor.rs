//! Motor model (C3): thrust-curve interpolation, mass depletion, state
//! machine. Thrust interpolation reuses the teacher's binary-search
//! `find_index`/`interpolate` (`math/interp/interp.rs`) rather than
//! re-deriving linear interpolation.
use crate::error::EngineError;
use crate::math::interp::{find_index, interpolate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Idle,
    Burning,
    Burnout,
}

/// One `(time_s, thrust_n)` sample of a thrust curve.
pub type ThrustSample = (f64, f64);

#[derive(Debug, Clone)]
pub struct Motor {
    designation: String,
    total_impulse: f64,
    burn_time: f64,
    wet_mass: f64,
    dry_mass: f64,
    length: f64,
    diameter: f64,
    times: Vec<f64>,
    thrusts: Vec<f64>,

    elapsed_burn_time: f64,
    state: MotorState,
}

impl Motor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        designation: impl Into<String>,
        samples: &[ThrustSample],
        total_impulse: f64,
        wet_mass: f64,
        dry_mass: f64,
        length: f64,
        diameter: f64,
    ) -> Result<Self, EngineError> {
        if samples.is_empty() {
            return Err(EngineError::InvalidThrustCurve(
                "thrust curve has no samples".into(),
            ));
        }

        for w in samples.windows(2) {
            if w[1].0 <= w[0].0 {
                return Err(EngineError::InvalidThrustCurve(
                    "sample times are not strictly increasing".into(),
                ));
            }
        }

        if samples[0].0 != 0.0 {
            return Err(EngineError::InvalidThrustCurve(
                "first sample must be at t = 0".into(),
            ));
        }

        if samples.iter().any(|&(_, f)| f < 0.0) {
            return Err(EngineError::InvalidThrustCurve(
                "negative thrust sample".into(),
            ));
        }

        let burn_time = samples.last().unwrap().0;
        if burn_time <= 0.0 {
            return Err(EngineError::InvalidThrustCurve(
                "burn time must be positive".into(),
            ));
        }

        if wet_mass <= dry_mass {
            return Err(EngineError::InvalidThrustCurve(
                "wet mass must exceed dry mass".into(),
            ));
        }

        let (times, thrusts): (Vec<f64>, Vec<f64>) = samples.iter().copied().unzip();

        Ok(Motor {
            designation: designation.into(),
            total_impulse,
            burn_time,
            wet_mass,
            dry_mass,
            length,
            diameter,
            times,
            thrusts,
            elapsed_burn_time: 0.0,
            state: MotorState::Idle,
        })
    }

    pub fn designation(&self) -> &str {
        &self.designation
    }

    pub fn total_impulse(&self) -> f64 {
        self.total_impulse
    }

    pub fn burn_time(&self) -> f64 {
        self.burn_time
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn elapsed_burn_time(&self) -> f64 {
        self.elapsed_burn_time
    }

    /// Advance the motor's internal clock by `dt`, transitioning
    /// `Idle -> Burning` on the first call and `Burning -> Burnout` once
    /// `elapsed >= burn_time`. State never regresses (§3 invariant).
    pub fn update(&mut self, dt: f64) {
        if self.state == MotorState::Idle {
            self.state = MotorState::Burning;
        }

        if self.state == MotorState::Burning {
            self.elapsed_burn_time += dt;
            if self.elapsed_burn_time >= self.burn_time {
                self.elapsed_burn_time = self.burn_time;
                self.state = MotorState::Burnout;
            }
        }
    }

    /// Thrust at the motor's current elapsed burn time; exact zero once
    /// burnout has occurred.
    pub fn current_thrust(&self) -> f64 {
        self.thrust_at(self.elapsed_burn_time)
    }

    fn thrust_at(&self, t: f64) -> f64 {
        if self.state == MotorState::Burnout || t < 0.0 || t > self.burn_time {
            return 0.0;
        }

        let pos = find_index(&self.times, t);
        interpolate(&self.thrusts, pos).0
    }

    /// Current propellant mass under linear depletion by burn-time
    /// fraction (§3: this spec fixes linear-by-burn-time over the
    /// thrust-weighted alternative observed elsewhere in the source corpus).
    pub fn current_mass(&self) -> f64 {
        if self.elapsed_burn_time >= self.burn_time {
            return self.dry_mass;
        }
        let fraction_remaining = 1.0 - self.elapsed_burn_time / self.burn_time;
        self.dry_mass + (self.wet_mass - self.dry_mass) * fraction_remaining
    }

    pub fn current_mass_flow_rate(&self) -> f64 {
        if self.state != MotorState::Burning {
            return 0.0;
        }
        -(self.wet_mass - self.dry_mass) / self.burn_time
    }
}
