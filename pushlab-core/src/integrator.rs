//! Time-stepping schemes.
//!
//! Every scheme is a value-returning transformation: `step` reads the carried
//! value and produces a new one, so a caller never sees a half-updated state.

use crate::error::SetupError;
use crate::model::{ChargedParticle, Model};
use crate::state::{Staggered, State};
use crate::vector::Phase;
use glam::DVec3;

/// Advances a model's state by one time step
pub trait Integrator<M: Model> {
    /// What the scheme carries from one step to the next
    type Carry: Copy;

    fn name(&self) -> &'static str;

    /// Global order of accuracy
    fn order(&self) -> u32;

    /// Refuse models this scheme cannot push
    fn check(&self, _model: &M) -> Result<(), SetupError> {
        Ok(())
    }

    /// Build the carried value from the on-grid initial condition
    fn prime(&self, model: &M, initial: State<M::Vector>, dt: f64) -> Self::Carry;

    fn step(&self, model: &M, carry: &Self::Carry, dt: f64) -> Self::Carry;

    /// Synchronized on-grid state, as recorded in the trajectory
    fn observe(&self, carry: &Self::Carry) -> State<M::Vector>;
}

/// Which velocity the position update of [`ForwardEuler`] uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EulerOrdering {
    /// x advances with the velocity from the start of the step.
    /// Energy of an oscillator grows by `1 + ω²dt²` every step.
    #[default]
    Explicit,
    /// Velocity first, then x advances with the updated velocity
    SemiImplicit,
}

/// First-order forward difference, one force evaluation per step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardEuler {
    pub ordering: EulerOrdering,
}

impl ForwardEuler {
    pub fn new(ordering: EulerOrdering) -> Self {
        Self { ordering }
    }
}

impl<M: Model> Integrator<M> for ForwardEuler {
    type Carry = State<M::Vector>;

    fn name(&self) -> &'static str {
        match self.ordering {
            EulerOrdering::Explicit => "forward euler",
            EulerOrdering::SemiImplicit => "semi-implicit euler",
        }
    }

    fn order(&self) -> u32 {
        1
    }

    fn prime(&self, _model: &M, initial: State<M::Vector>, _dt: f64) -> Self::Carry {
        initial
    }

    fn step(&self, model: &M, state: &Self::Carry, dt: f64) -> Self::Carry {
        let acc = model.acceleration(state.position, state.velocity);
        let velocity = state.velocity + acc * dt;
        let position = match self.ordering {
            EulerOrdering::Explicit => state.position + state.velocity * dt,
            EulerOrdering::SemiImplicit => state.position + velocity * dt,
        };
        State::new(state.time + dt, position, velocity)
    }

    fn observe(&self, state: &Self::Carry) -> State<M::Vector> {
        *state
    }
}

/// Shared leapfrog bookkeeping: `kick(position, velocity, h)` advances a
/// velocity by `h` under the scheme's velocity law.
fn prime_staggered<V, K>(initial: State<V>, dt: f64, kick: K) -> Staggered<V>
where
    V: Phase,
    K: Fn(V, V, f64) -> V,
{
    Staggered {
        on_grid: initial,
        half_velocity: kick(initial.position, initial.velocity, -0.5 * dt),
    }
}

fn step_staggered<V, K>(carry: &Staggered<V>, dt: f64, kick: K) -> Staggered<V>
where
    V: Phase,
    K: Fn(V, V, f64) -> V,
{
    let here = carry.on_grid;
    let half_velocity = kick(here.position, carry.half_velocity, dt);
    let position = here.position + half_velocity * dt;
    let velocity = kick(position, half_velocity, 0.5 * dt);
    Staggered {
        on_grid: State::new(here.time + dt, position, velocity),
        half_velocity,
    }
}

/// Leapfrog / Störmer–Verlet with velocities on the half-step grid.
///
/// Symplectic for position-dependent forces. With a velocity-dependent force
/// such as [`ChargedParticle`] the velocity law `v + a(x, v)·h` is the naive
/// explicit push.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Leapfrog;

impl Leapfrog {
    /// `v + a(x, v)·h`
    pub fn kick<M: Model>(model: &M, position: M::Vector, velocity: M::Vector, h: f64) -> M::Vector {
        velocity + model.acceleration(position, velocity) * h
    }
}

impl<M: Model> Integrator<M> for Leapfrog {
    type Carry = Staggered<M::Vector>;

    fn name(&self) -> &'static str {
        "leapfrog"
    }

    fn order(&self) -> u32 {
        2
    }

    fn prime(&self, model: &M, initial: State<M::Vector>, dt: f64) -> Self::Carry {
        prime_staggered(initial, dt, |x, v, h| Self::kick(model, x, v, h))
    }

    fn step(&self, model: &M, carry: &Self::Carry, dt: f64) -> Self::Carry {
        step_staggered(carry, dt, |x, v, h| Self::kick(model, x, v, h))
    }

    fn observe(&self, carry: &Self::Carry) -> State<M::Vector> {
        carry.on_grid
    }
}

/// Boris rotation for charged particles in electric and magnetic fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorisPusher;

impl BorisPusher {
    /// Advance `velocity` by `h`: half electric kick, exact-norm magnetic
    /// rotation, second half electric kick.
    pub fn kick(particle: &ChargedParticle, velocity: DVec3, h: f64) -> DVec3 {
        let qm_half = particle.charge_to_mass() * 0.5 * h;
        let half_kick = particle.electric * qm_half;

        let u = particle.magnetic * qm_half;
        let s = u * (2.0 / (1.0 + u.length_squared()));

        let v_minus = velocity + half_kick;
        let v_prime = v_minus + v_minus.cross(u);
        let v_plus = v_minus + v_prime.cross(s);
        v_plus + half_kick
    }
}

impl Integrator<ChargedParticle> for BorisPusher {
    type Carry = Staggered<DVec3>;

    fn name(&self) -> &'static str {
        "boris"
    }

    fn order(&self) -> u32 {
        2
    }

    fn check(&self, model: &ChargedParticle) -> Result<(), SetupError> {
        if !model.has_magnetic_field() {
            return Err(SetupError::DegenerateField);
        }
        Ok(())
    }

    fn prime(&self, model: &ChargedParticle, initial: State<DVec3>, dt: f64) -> Self::Carry {
        prime_staggered(initial, dt, |_, v, h| Self::kick(model, v, h))
    }

    fn step(&self, model: &ChargedParticle, carry: &Self::Carry, dt: f64) -> Self::Carry {
        step_staggered(carry, dt, |_, v, h| Self::kick(model, v, h))
    }

    fn observe(&self, carry: &Self::Carry) -> State<DVec3> {
        carry.on_grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Oscillator;

    #[test]
    fn test_explicit_euler_uses_old_velocity() {
        let osc = Oscillator::new(1.0);
        let euler = ForwardEuler::default();
        let s = State::new(0.0, 1.0, 2.0);
        let next = Integrator::<Oscillator>::step(&euler, &osc, &s, 0.1);
        assert!((next.velocity - 1.9).abs() < 1e-15);
        assert!((next.position - 1.2).abs() < 1e-15);
        assert!((next.time - 0.1).abs() < 1e-15);
    }

    #[test]
    fn test_semi_implicit_euler_uses_new_velocity() {
        let osc = Oscillator::new(1.0);
        let euler = ForwardEuler::new(EulerOrdering::SemiImplicit);
        let s = State::new(0.0, 1.0, 2.0);
        let next = Integrator::<Oscillator>::step(&euler, &osc, &s, 0.1);
        assert!((next.velocity - 1.9).abs() < 1e-15);
        assert!((next.position - 1.19).abs() < 1e-15);
    }

    #[test]
    fn test_leapfrog_prime_back_propagates_half_step() {
        let osc = Oscillator::new(1.0);
        let carry = Leapfrog.prime(&osc, State::at_rest(0.1), 0.1);
        // v(-dt/2) = 0 - ω²·x0·(-dt/2)
        assert!((carry.half_velocity - 0.005).abs() < 1e-15);
        assert_eq!(carry.on_grid.velocity, 0.0);
    }

    #[test]
    fn test_boris_kick_pure_rotation_keeps_speed() {
        let p = ChargedParticle::new(1.0, 1.0, DVec3::ZERO, DVec3::new(0.0, 0.0, 3.0));
        let v = DVec3::new(1.0, 2.0, 0.5);
        let rotated = BorisPusher::kick(&p, v, 5.0);
        assert!((rotated.length() - v.length()).abs() < 1e-14);
        assert!((rotated.z - v.z).abs() < 1e-15);
    }

    #[test]
    fn test_boris_rejects_zero_field() {
        let p = ChargedParticle::new(1.0, 1.0, DVec3::X, DVec3::ZERO);
        assert_eq!(BorisPusher.check(&p), Err(SetupError::DegenerateField));
    }
}
