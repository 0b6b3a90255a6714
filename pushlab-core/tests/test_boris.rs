//! Boris pusher invariants in magnetic and crossed fields

use glam::DVec3;
use pushlab_core::diagnostics::{gyration_speeds, max_position_error};
use pushlab_core::tests::test_helpers::{approx_eq, crossed_field_motion, crossed_field_particle};
use pushlab_core::{run, Analytic, BorisPusher, ChargedParticle, Leapfrog, RunConfig, State};

#[test]
fn test_boris_speed_constant_in_pure_magnetic_field() {
    let particle = ChargedParticle::new(1.0, 1.0, DVec3::ZERO, DVec3::new(0.0, 0.0, 2.0));
    let initial = State::new(0.0, DVec3::ZERO, DVec3::new(1.0, 2.0, 0.5));
    let speed = initial.velocity.length();

    for dt in [0.01, 1.0, 10.0] {
        let traj = run(&particle, &BorisPusher, initial, &RunConfig::new(dt, 200)).unwrap();
        for state in &traj {
            assert!(
                approx_eq(state.velocity.length(), speed, 1e-12 * speed),
                "speed drifted to {} at t = {} (dt = {})",
                state.velocity.length(),
                state.time,
                dt
            );
        }
    }
}

#[test]
fn test_naive_push_heats_particle() {
    let particle = ChargedParticle::new(1.0, 1.0, DVec3::ZERO, DVec3::Z);
    let initial = State::new(0.0, DVec3::ZERO, DVec3::X);
    let config = RunConfig::new(0.5, 100);

    let naive = run(&particle, &Leapfrog, initial, &config).unwrap();
    let boris = run(&particle, &BorisPusher, initial, &config).unwrap();

    assert!(naive.last().unwrap().velocity.length() > 10.0);
    assert!(approx_eq(boris.last().unwrap().velocity.length(), 1.0, 1e-12));
}

#[test]
fn test_crossed_fields_parallel_drift() {
    let particle = crossed_field_particle();
    let exact = crossed_field_motion(&particle);
    let dt = 0.1;
    let config = RunConfig::for_periods(dt, 5.0, particle.gyro_period()).unwrap();
    let traj = run(&particle, &BorisPusher, exact.aligned_initial_state(), &config).unwrap();

    assert_eq!(traj.len(), 315);
    for state in &traj {
        let z = exact.parallel_speed() * state.time;
        assert!(approx_eq(state.position.z, z, dt * dt));
    }
}

#[test]
fn test_crossed_fields_gyration_speed_constant() {
    let particle = crossed_field_particle();
    let exact = crossed_field_motion(&particle);
    let config = RunConfig::for_periods(0.1, 5.0, particle.gyro_period()).unwrap();
    let traj = run(&particle, &BorisPusher, exact.aligned_initial_state(), &config).unwrap();

    let speeds = gyration_speeds(&particle, &traj);
    assert!(approx_eq(speeds[0], exact.perpendicular_speed(), 1e-14));
    for s in speeds {
        assert!(approx_eq(s, exact.perpendicular_speed(), 1e-12));
    }
}

#[test]
fn test_crossed_fields_follow_exact_orbit() {
    let particle = crossed_field_particle();
    let exact = crossed_field_motion(&particle);
    let dt = 0.1;
    let config = RunConfig::for_periods(dt, 5.0, particle.gyro_period()).unwrap();
    let traj = run(&particle, &BorisPusher, exact.aligned_initial_state(), &config).unwrap();

    let err = max_position_error(&traj, &exact.sample_like(&traj));
    assert!(err < 5.0 * dt * dt, "max position error {} too large", err);
}

#[test]
fn test_oblique_fields_match_exact_solution() {
    let particle = ChargedParticle::new(
        2.0,
        3.0,
        DVec3::new(0.2, 0.1, -0.4),
        DVec3::new(0.3, -0.5, 1.2),
    );
    let exact = pushlab_core::GyroMotion::new(
        &particle,
        DVec3::new(1.0, -1.0, 0.5),
        DVec3::new(0.4, 0.7, -0.2),
    )
    .unwrap();
    let traj = run(
        &particle,
        &BorisPusher,
        exact.aligned_initial_state(),
        &RunConfig::new(0.01, 501),
    )
    .unwrap();

    assert!(max_position_error(&traj, &exact.sample_like(&traj)) < 1e-3);
}
