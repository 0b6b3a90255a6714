//! Closed-form reference solutions.
//!
//! These never touch the integrators; they are sampled on the same time grid
//! for side-by-side comparison.

use crate::error::SetupError;
use crate::model::{ChargedParticle, Model, Oscillator};
use crate::state::{State, TimeGrid};
use crate::trajectory::Trajectory;
use crate::vector::{project, Phase};
use glam::DVec3;

/// An exact solution that can be evaluated at any time
pub trait Analytic {
    type Vector: Phase;

    fn state_at(&self, time: f64) -> State<Self::Vector>;

    fn sample(&self, grid: &TimeGrid) -> Trajectory<Self::Vector> {
        grid.iter().map(|t| self.state_at(t)).collect()
    }

    /// Evaluate at the time stamps of an existing trajectory
    fn sample_like<U>(&self, other: &Trajectory<U>) -> Trajectory<Self::Vector>
    where
        U: Copy,
    {
        other.times().map(|t| self.state_at(t)).collect()
    }
}

/// `x(t) = x₀ cos ωt + (v₀/ω) sin ωt`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HarmonicSolution {
    pub initial_position: f64,
    pub initial_velocity: f64,
    pub angular_frequency: f64,
}

impl HarmonicSolution {
    pub fn new(oscillator: &Oscillator, initial_position: f64, initial_velocity: f64) -> Self {
        Self {
            initial_position,
            initial_velocity,
            angular_frequency: oscillator.angular_frequency,
        }
    }

    /// Released from rest at `amplitude`: `x(t) = A cos ωt`
    pub fn from_amplitude(amplitude: f64, oscillator: &Oscillator) -> Self {
        Self::new(oscillator, amplitude, 0.0)
    }
}

impl Analytic for HarmonicSolution {
    type Vector = f64;

    fn state_at(&self, time: f64) -> State<f64> {
        let w = self.angular_frequency;
        let (x0, v0) = (self.initial_position, self.initial_velocity);
        if w == 0.0 {
            return State::new(time, x0 + v0 * time, v0);
        }
        let (sin, cos) = (w * time).sin_cos();
        let position = x0 * cos + (v0 / w) * sin;
        let velocity = -x0 * w * sin + v0 * cos;
        State::new(time, position, velocity)
    }
}

/// Drift plus gyration of a charge in uniform, static fields.
///
/// The guiding centre starts at `guiding_center` and moves with the E×B drift
/// plus uniformly accelerated motion along B. Around it the particle circles
/// with radius `r_L = |v⊥|/ω` and angular velocity `-(q/m)·B`. At t = 0 the
/// gyration velocity points along +y projected onto the plane normal to B
/// (+x when B is along y), whatever the direction of the input v⊥; only
/// its magnitude is kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GyroMotion {
    guiding_center: DVec3,
    field_direction: DVec3,
    drift: DVec3,
    parallel_speed: f64,
    parallel_acceleration: f64,
    perpendicular_speed: f64,
    gyro_frequency: f64,
    /// Gyration offset from the guiding centre at t = 0
    offset: DVec3,
    /// `Ω̂ × offset`, the offset a quarter turn later
    quarter_offset: DVec3,
}

impl GyroMotion {
    pub fn new(
        particle: &ChargedParticle,
        guiding_center: DVec3,
        input_velocity: DVec3,
    ) -> Result<Self, SetupError> {
        particle.validate()?;
        let omega = particle.gyro_frequency();
        if !particle.has_magnetic_field() || omega == 0.0 {
            return Err(SetupError::DegenerateField);
        }
        let b = particle.magnetic;
        let b_hat = b.normalize();
        let (v_par, v_perp) = project(input_velocity, b);
        let (e_par, _) = project(particle.electric, b);

        let perpendicular_speed = v_perp.length();

        // Angular velocity of the gyration, -(q/m)·B
        let spin = -b * particle.charge_to_mass();
        let spin_hat = spin / omega;

        let reference = {
            let (_, y_perp) = project(DVec3::Y, b);
            if y_perp.length_squared() > 1e-24 {
                y_perp.normalize()
            } else {
                project(DVec3::X, b).1.normalize()
            }
        };
        let w0 = reference * perpendicular_speed;
        // Ω × offset = w0 with offset ⊥ Ω
        let offset = w0.cross(spin) / (omega * omega);

        Ok(Self {
            guiding_center,
            field_direction: b_hat,
            drift: particle.drift_velocity(),
            parallel_speed: v_par.dot(b_hat),
            parallel_acceleration: particle.charge_to_mass() * e_par.dot(b_hat),
            perpendicular_speed,
            gyro_frequency: omega,
            offset,
            quarter_offset: spin_hat.cross(offset),
        })
    }

    pub fn gyro_frequency(&self) -> f64 {
        self.gyro_frequency
    }

    pub fn larmor_radius(&self) -> f64 {
        self.perpendicular_speed / self.gyro_frequency
    }

    pub fn drift_velocity(&self) -> DVec3 {
        self.drift
    }

    /// Signed velocity component along B
    pub fn parallel_speed(&self) -> f64 {
        self.parallel_speed
    }

    /// Gyration speed in the drift frame
    pub fn perpendicular_speed(&self) -> f64 {
        self.perpendicular_speed
    }

    /// Position and velocity the numerical run has to start from so that it
    /// follows the same gyro-centre and phase as [`Analytic::state_at`]
    pub fn aligned_initial_state(&self) -> State<DVec3> {
        self.state_at(0.0)
    }
}

impl Analytic for GyroMotion {
    type Vector = DVec3;

    fn state_at(&self, time: f64) -> State<DVec3> {
        let w = self.gyro_frequency;
        let (sin, cos) = (w * time).sin_cos();
        let along = self.parallel_speed * time + 0.5 * self.parallel_acceleration * time * time;

        let center = self.guiding_center + self.drift * time + self.field_direction * along;
        let gyration = self.offset * cos + self.quarter_offset * sin;
        let position = center + gyration;

        let center_velocity = self.drift
            + self.field_direction * (self.parallel_speed + self.parallel_acceleration * time);
        let gyration_velocity = (self.quarter_offset * cos - self.offset * sin) * w;
        State::new(time, position, center_velocity + gyration_velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmonic_from_rest() {
        let sol = HarmonicSolution::from_amplitude(0.1, &Oscillator::new(1.0));
        let s = sol.state_at(std::f64::consts::PI);
        assert!((s.position + 0.1).abs() < 1e-15);
        assert!(s.velocity.abs() < 1e-15);
    }

    #[test]
    fn test_gyro_requires_field() {
        let p = ChargedParticle::new(1.0, 1.0, DVec3::ZERO, DVec3::ZERO);
        assert_eq!(
            GyroMotion::new(&p, DVec3::ZERO, DVec3::X),
            Err(SetupError::DegenerateField)
        );
    }
}
