//! Trajectory diagnostics and error reporting.
//!
//! Energy bookkeeping, distances to a reference solution and convergence
//! orders, plus the formatting used by the command line front end.

use crate::error::SimError;
use crate::model::{ChargedParticle, Model};
use crate::trajectory::Trajectory;
use crate::vector::{project, Phase};
use glam::DVec3;

/// Energy of every state in `trajectory`
pub fn energy_series<M: Model>(model: &M, trajectory: &Trajectory<M::Vector>) -> Vec<f64> {
    trajectory.iter().map(|s| model.energy(s)).collect()
}

/// Summary of how an energy series strays from its first value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReport {
    pub initial: f64,
    pub min: f64,
    pub max: f64,
    /// `max |E_i − E_0| / |E_0|`
    pub max_relative_deviation: f64,
    /// `(E_last − E_0) / |E_0|`
    pub final_relative_drift: f64,
}

impl EnergyReport {
    /// `None` for an empty series. A zero initial energy reports absolute
    /// rather than relative deviations.
    pub fn from_series(series: &[f64]) -> Option<Self> {
        let (&initial, &last) = (series.first()?, series.last()?);
        let scale = if initial == 0.0 { 1.0 } else { initial.abs() };
        let (min, max) = series
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &e| {
                (lo.min(e), hi.max(e))
            });
        let max_dev = series
            .iter()
            .map(|e| (e - initial).abs())
            .fold(0.0, f64::max);
        Some(Self {
            initial,
            min,
            max,
            max_relative_deviation: max_dev / scale,
            final_relative_drift: (last - initial) / scale,
        })
    }
}

fn max_distance<V: Phase>(a: impl Iterator<Item = V>, b: impl Iterator<Item = V>) -> f64 {
    a.zip(b).map(|(p, q)| (p - q).length()).fold(0.0, f64::max)
}

/// Largest pointwise position distance; compares the common prefix
pub fn max_position_error<V: Phase>(numerical: &Trajectory<V>, reference: &Trajectory<V>) -> f64 {
    max_distance(numerical.positions(), reference.positions())
}

pub fn max_velocity_error<V: Phase>(numerical: &Trajectory<V>, reference: &Trajectory<V>) -> f64 {
    max_distance(numerical.velocities(), reference.velocities())
}

/// Speed of the gyration in the E×B drift frame, `|(v − v_E)⊥|`, per state
pub fn gyration_speeds(particle: &ChargedParticle, trajectory: &Trajectory<DVec3>) -> Vec<f64> {
    let drift = particle.drift_velocity();
    trajectory
        .velocities()
        .map(|v| project(v - drift, particle.magnetic).1.length())
        .collect()
}

/// Observed order from errors at step `h` and `h / refinement`
pub fn convergence_order(coarse_error: f64, fine_error: f64, refinement: f64) -> f64 {
    (coarse_error / fine_error).ln() / refinement.ln()
}

/// Format a run failure for display, including how far the run got
pub fn format_run_error<V: Copy>(error: &SimError<V>) -> String {
    let mut msg = format!("Simulation error: {}", error);
    if let Some(partial) = error.partial() {
        msg.push_str(&format!("\n  {} states recorded before the failure", partial.len()));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_report() {
        let report = EnergyReport::from_series(&[2.0, 2.5, 1.0, 3.0]).unwrap();
        assert_eq!(report.initial, 2.0);
        assert_eq!(report.min, 1.0);
        assert_eq!(report.max, 3.0);
        assert_eq!(report.max_relative_deviation, 0.5);
        assert_eq!(report.final_relative_drift, 0.5);
    }

    #[test]
    fn test_energy_report_empty() {
        assert_eq!(EnergyReport::from_series(&[]), None);
    }

    #[test]
    fn test_convergence_order() {
        assert!((convergence_order(0.4, 0.1, 2.0) - 2.0).abs() < 1e-12);
    }
}
