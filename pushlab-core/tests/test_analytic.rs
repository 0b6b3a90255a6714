//! Exact reference solutions

use glam::DVec3;
use pushlab_core::tests::test_helpers::{
    approx_eq, approx_eq_vec, crossed_field_motion, crossed_field_particle,
};
use pushlab_core::{Analytic, ChargedParticle, GyroMotion, HarmonicSolution, Oscillator, TimeGrid};
use std::f64::consts::TAU;

#[test]
fn test_harmonic_sample_on_grid() {
    let osc = Oscillator::new(2.0);
    let sol = HarmonicSolution::from_amplitude(0.1, &osc);
    let traj = sol.sample(&TimeGrid::new(0.0, 0.01, 101));

    assert_eq!(traj.len(), 101);
    for state in &traj {
        assert!(approx_eq(state.position, 0.1 * (2.0 * state.time).cos(), 1e-15));
        assert!(approx_eq(state.velocity, -0.2 * (2.0 * state.time).sin(), 1e-15));
    }
}

#[test]
fn test_harmonic_with_initial_velocity() {
    let sol = HarmonicSolution::new(&Oscillator::new(1.0), 0.0, 1.0);
    let s = sol.state_at(TAU / 4.0);
    assert!(approx_eq(s.position, 1.0, 1e-15));
    assert!(approx_eq(s.velocity, 0.0, 1e-15));
}

#[test]
fn test_harmonic_zero_frequency_is_uniform_motion() {
    let sol = HarmonicSolution::new(&Oscillator::new(0.0), 1.0, 2.0);
    assert_eq!(sol.state_at(3.0).position, 7.0);
}

#[test]
fn test_crossed_field_decomposition() {
    let particle = crossed_field_particle();
    let motion = crossed_field_motion(&particle);

    assert!(approx_eq(motion.gyro_frequency(), 1.0, 1e-15));
    assert!(approx_eq(motion.larmor_radius(), 1.0, 1e-15));
    assert!(approx_eq(motion.parallel_speed(), 1.0, 1e-15));
    assert!(approx_eq_vec(motion.drift_velocity(), DVec3::new(0.1, -0.1, 0.0), 1e-15));

    let start = motion.aligned_initial_state();
    assert!(approx_eq_vec(start.position, DVec3::new(1.0, 0.0, 0.0), 1e-15));
    assert!(approx_eq_vec(start.velocity, DVec3::new(0.1, 0.9, 1.0), 1e-15));
}

#[test]
fn test_crossed_field_closed_form() {
    let particle = crossed_field_particle();
    let motion = crossed_field_motion(&particle);

    for t in [0.3, 1.7, 4.0, 12.5] {
        let s = motion.state_at(t);
        let expected = DVec3::new(0.1 * t + t.cos(), -0.1 * t + t.sin(), t);
        assert!(approx_eq_vec(s.position, expected, 1e-13));
    }
}

#[test]
fn test_positive_charge_gyrates_the_other_way() {
    let particle = ChargedParticle::new(1.0, 1.0, DVec3::new(0.1, 0.1, 0.0), DVec3::Z);
    let motion = GyroMotion::new(&particle, DVec3::ZERO, DVec3::new(1.0, 0.0, 1.0)).unwrap();

    let t = 0.8;
    let s = motion.state_at(t);
    let expected = DVec3::new(0.1 * t - t.cos(), -0.1 * t + t.sin(), t);
    assert!(approx_eq_vec(s.position, expected, 1e-13));
    assert!(approx_eq_vec(
        motion.aligned_initial_state().velocity,
        DVec3::new(0.1, 0.9, 1.0),
        1e-15
    ));
}

#[test]
fn test_exact_motion_obeys_lorentz_law() {
    let particle = ChargedParticle::new(
        2.0,
        3.0,
        DVec3::new(0.2, 0.1, -0.4),
        DVec3::new(0.3, -0.5, 1.2),
    );
    let motion =
        GyroMotion::new(&particle, DVec3::new(1.0, -1.0, 0.5), DVec3::new(0.4, 0.7, -0.2)).unwrap();
    let h = 1e-5;

    for t in [0.0, 0.9, 3.3] {
        let (before, here, after) = (
            motion.state_at(t - h),
            motion.state_at(t),
            motion.state_at(t + h),
        );
        let dxdt = (after.position - before.position) / (2.0 * h);
        let dvdt = (after.velocity - before.velocity) / (2.0 * h);
        assert!(approx_eq_vec(dxdt, here.velocity, 1e-8));
        assert!(approx_eq_vec(dvdt, particle.lorentz_acceleration(here.velocity), 1e-8));
    }
}

#[test]
fn test_gyration_speed_matches_input() {
    let particle = crossed_field_particle();
    let motion = GyroMotion::new(&particle, DVec3::ZERO, DVec3::new(0.0, 3.0, -2.0)).unwrap();
    assert!(approx_eq(motion.perpendicular_speed(), 3.0, 1e-15));
    assert!(approx_eq(motion.parallel_speed(), -2.0, 1e-15));
    assert!(approx_eq(motion.larmor_radius(), 3.0, 1e-15));
}
