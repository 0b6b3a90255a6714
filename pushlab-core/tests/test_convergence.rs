//! Observed order of accuracy against the exact solutions

use pushlab_core::diagnostics::{convergence_order, max_position_error};
use pushlab_core::tests::test_helpers::{
    crossed_field_motion, crossed_field_particle, steps_to, unit_oscillator,
};
use pushlab_core::{compare, BorisPusher, ForwardEuler, HarmonicSolution, Leapfrog, RunConfig};

fn oscillator_error(integrator_is_leapfrog: bool, dt: f64) -> f64 {
    let (osc, initial) = unit_oscillator();
    let exact = HarmonicSolution::from_amplitude(initial.position, &osc);
    let config = RunConfig::new(dt, steps_to(2.0, dt));
    let comparison = if integrator_is_leapfrog {
        compare(&osc, &Leapfrog, &exact, initial, &config)
    } else {
        compare(&osc, &ForwardEuler::default(), &exact, initial, &config)
    }
    .expect("run failed");
    comparison.max_position_error()
}

#[test]
fn test_forward_euler_is_first_order() {
    let coarse = oscillator_error(false, 0.02);
    let fine = oscillator_error(false, 0.01);
    let order = convergence_order(coarse, fine, 2.0);
    assert!((0.8..1.2).contains(&order), "observed order {}", order);
}

#[test]
fn test_leapfrog_is_second_order() {
    let coarse = oscillator_error(true, 0.02);
    let fine = oscillator_error(true, 0.01);
    let order = convergence_order(coarse, fine, 2.0);
    assert!((1.8..2.2).contains(&order), "observed order {}", order);
}

#[test]
fn test_boris_is_second_order() {
    let particle = crossed_field_particle();
    let exact = crossed_field_motion(&particle);
    let error = |dt: f64| {
        let config = RunConfig::new(dt, steps_to(10.0, dt));
        let c = compare(&particle, &BorisPusher, &exact, exact.aligned_initial_state(), &config)
            .expect("run failed");
        max_position_error(&c.numerical, &c.analytic)
    };
    let order = convergence_order(error(0.05), error(0.025), 2.0);
    assert!((1.8..2.2).contains(&order), "observed order {}", order);
}

#[test]
fn test_errors_shrink_as_step_halves() {
    let errors: Vec<f64> = [0.04, 0.02, 0.01]
        .iter()
        .map(|&dt| oscillator_error(true, dt))
        .collect();
    assert!(errors.windows(2).all(|w| w[1] < w[0]));
}
