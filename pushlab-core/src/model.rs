//! Force laws and physical constants.
//!
//! A model is immutable for the lifetime of a run and is passed explicitly
//! into every integrator call.

use crate::error::ConfigError;
use crate::state::State;
use crate::vector::{project, Phase};
use glam::DVec3;
use std::f64::consts::TAU;

/// A force law expressed as acceleration
pub trait Model {
    type Vector: Phase;

    /// Reject constants the force law cannot be evaluated with
    fn validate(&self) -> Result<(), ConfigError>;

    fn acceleration(&self, position: Self::Vector, velocity: Self::Vector) -> Self::Vector;

    /// Conserved energy of the exact dynamics, evaluated at `state`
    fn energy(&self, state: &State<Self::Vector>) -> f64;
}

/// Simple harmonic oscillator, unit mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oscillator {
    pub angular_frequency: f64,
}

impl Oscillator {
    pub fn new(angular_frequency: f64) -> Self {
        Self { angular_frequency }
    }

    /// `-ω²·x`
    pub fn force_law(&self, position: f64) -> f64 {
        -(self.angular_frequency * self.angular_frequency) * position
    }

    /// 2π/|ω|; infinite for ω = 0
    pub fn period(&self) -> f64 {
        TAU / self.angular_frequency.abs()
    }
}

impl Model for Oscillator {
    type Vector = f64;

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.angular_frequency.is_finite() {
            return Err(ConfigError::NonFinite("angular frequency"));
        }
        Ok(())
    }

    fn acceleration(&self, position: f64, _velocity: f64) -> f64 {
        self.force_law(position)
    }

    fn energy(&self, state: &State<f64>) -> f64 {
        let w2 = self.angular_frequency * self.angular_frequency;
        0.5 * state.velocity * state.velocity + 0.5 * w2 * state.position * state.position
    }
}

/// Point charge in uniform, static electric and magnetic fields
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChargedParticle {
    pub charge: f64,
    pub mass: f64,
    pub electric: DVec3,
    pub magnetic: DVec3,
}

impl ChargedParticle {
    pub fn new(charge: f64, mass: f64, electric: DVec3, magnetic: DVec3) -> Self {
        Self {
            charge,
            mass,
            electric,
            magnetic,
        }
    }

    pub fn charge_to_mass(&self) -> f64 {
        self.charge / self.mass
    }

    /// Lorentz force divided by mass. Independent of position.
    pub fn lorentz_acceleration(&self, velocity: DVec3) -> DVec3 {
        (self.electric + velocity.cross(self.magnetic)) * self.charge_to_mass()
    }

    /// `|q|·|B|/|m|`, non-negative for either sign of charge or mass
    pub fn gyro_frequency(&self) -> f64 {
        self.charge.abs() * self.magnetic.length() / self.mass.abs()
    }

    pub fn gyro_period(&self) -> f64 {
        TAU / self.gyro_frequency()
    }

    /// E×B drift `E⊥ × B / |B|²`; zero when there is no magnetic field
    pub fn drift_velocity(&self) -> DVec3 {
        let b2 = self.magnetic.length_squared();
        if b2 == 0.0 {
            return DVec3::ZERO;
        }
        let (_, e_perp) = project(self.electric, self.magnetic);
        e_perp.cross(self.magnetic) / b2
    }

    pub fn has_magnetic_field(&self) -> bool {
        self.magnetic != DVec3::ZERO
    }
}

impl Model for ChargedParticle {
    type Vector = DVec3;

    fn validate(&self) -> Result<(), ConfigError> {
        if self.mass == 0.0 {
            return Err(ConfigError::ZeroMass);
        }
        if !self.mass.is_finite() {
            return Err(ConfigError::NonFinite("mass"));
        }
        if !self.charge.is_finite() {
            return Err(ConfigError::NonFinite("charge"));
        }
        if !self.electric.is_finite() {
            return Err(ConfigError::NonFinite("electric field"));
        }
        if !self.magnetic.is_finite() {
            return Err(ConfigError::NonFinite("magnetic field"));
        }
        Ok(())
    }

    fn acceleration(&self, _position: DVec3, velocity: DVec3) -> DVec3 {
        self.lorentz_acceleration(velocity)
    }

    /// Kinetic energy plus electrostatic potential energy `-qE·x`
    fn energy(&self, state: &State<DVec3>) -> f64 {
        0.5 * self.mass * state.velocity.length_squared()
            - self.charge * self.electric.dot(state.position)
    }
}
