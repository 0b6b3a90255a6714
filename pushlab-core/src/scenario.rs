//! Scenario descriptions loaded from TOML or built from presets.
//!
//! ```toml
//! name = "leapfrog"
//! dt = 0.1
//! integrator = "leapfrog"
//! length = { periods = 4.0 }
//!
//! [model]
//! kind = "oscillator"
//! angular_frequency = 1.0
//! amplitude = 0.1
//! ```

use crate::analytic::{GyroMotion, HarmonicSolution};
use crate::error::{ConfigError, SetupError, SimError};
use crate::integrator::{BorisPusher, EulerOrdering, ForwardEuler, Leapfrog};
use crate::model::{ChargedParticle, Oscillator};
use crate::runtime::{compare, Comparison, RunConfig};
use crate::state::State;
use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("{integrator} cannot push a {model} model")]
    Unsupported {
        integrator: IntegratorKind,
        model: &'static str,
    },
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// The oscillator run stopped on a non-finite state; the error holds the
    /// states recorded before it
    #[error(transparent)]
    OscillatorDiverged(SimError<f64>),
    #[error(transparent)]
    ParticleDiverged(SimError<DVec3>),
}

impl From<ConfigError> for ScenarioError {
    fn from(err: ConfigError) -> Self {
        Self::Setup(err.into())
    }
}

impl From<SimError<f64>> for ScenarioError {
    fn from(err: SimError<f64>) -> Self {
        match err {
            SimError::Setup(e) => Self::Setup(e),
            diverged => Self::OscillatorDiverged(diverged),
        }
    }
}

impl From<SimError<DVec3>> for ScenarioError {
    fn from(err: SimError<DVec3>) -> Self {
        match err {
            SimError::Setup(e) => Self::Setup(e),
            diverged => Self::ParticleDiverged(diverged),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegratorKind {
    ForwardEuler,
    SemiImplicitEuler,
    Leapfrog,
    Boris,
}

impl IntegratorKind {
    pub const ALL: [IntegratorKind; 4] = [
        Self::ForwardEuler,
        Self::SemiImplicitEuler,
        Self::Leapfrog,
        Self::Boris,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForwardEuler => "forward_euler",
            Self::SemiImplicitEuler => "semi_implicit_euler",
            Self::Leapfrog => "leapfrog",
            Self::Boris => "boris",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == name)
    }
}

impl fmt::Display for IntegratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How long to run: whole periods of the model's natural motion, or an
/// explicit number of recorded states
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunLength {
    Periods(f64),
    Steps(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelConfig {
    /// Released from rest at `amplitude`
    Oscillator {
        angular_frequency: f64,
        amplitude: f64,
    },
    /// `position` is the initial guiding centre. The numerical start is
    /// shifted onto the gyro-orbit that matches the exact solution.
    ChargedParticle {
        charge: f64,
        mass: f64,
        electric: [f64; 3],
        magnetic: [f64; 3],
        velocity: [f64; 3],
        #[serde(default)]
        position: [f64; 3],
    },
}

impl ModelConfig {
    fn label(&self) -> &'static str {
        match self {
            Self::Oscillator { .. } => "oscillator",
            Self::ChargedParticle { .. } => "charged particle",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub dt: f64,
    pub length: RunLength,
    pub integrator: IntegratorKind,
    pub model: ModelConfig,
}

/// Result of running a scenario, by state space
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Oscillator {
        model: Oscillator,
        comparison: Comparison<f64>,
    },
    ChargedParticle {
        model: ChargedParticle,
        comparison: Comparison<DVec3>,
    },
}

impl Scenario {
    pub fn from_toml_str(source: &str) -> Result<Self, ScenarioError> {
        Ok(toml::from_str(source)?)
    }

    /// Forward difference oscillator: ω = 1, A = 0.1, dt = 0.05, 4 periods
    pub fn forward_oscillator() -> Self {
        Self {
            name: "forward".to_string(),
            dt: 0.05,
            length: RunLength::Periods(4.0),
            integrator: IntegratorKind::ForwardEuler,
            model: ModelConfig::Oscillator {
                angular_frequency: 1.0,
                amplitude: 0.1,
            },
        }
    }

    /// Leapfrog oscillator: ω = 1, A = 0.1, dt = 0.1, 4 periods
    pub fn leapfrog_oscillator() -> Self {
        Self {
            name: "leapfrog".to_string(),
            dt: 0.1,
            integrator: IntegratorKind::Leapfrog,
            ..Self::forward_oscillator()
        }
    }

    /// Electron-like charge in crossed fields, 5 gyro-periods with Boris
    pub fn crossed_fields() -> Self {
        Self {
            name: "gyration".to_string(),
            dt: 0.1,
            length: RunLength::Periods(5.0),
            integrator: IntegratorKind::Boris,
            model: ModelConfig::ChargedParticle {
                charge: -1.0,
                mass: 1.0,
                electric: [0.1, 0.1, 0.0],
                magnetic: [0.0, 0.0, 1.0],
                velocity: [1.0, 0.0, 1.0],
                position: [0.0, 0.0, 0.0],
            },
        }
    }

    pub fn presets() -> Vec<Self> {
        vec![
            Self::forward_oscillator(),
            Self::leapfrog_oscillator(),
            Self::crossed_fields(),
        ]
    }

    pub fn preset(name: &str) -> Option<Self> {
        Self::presets().into_iter().find(|s| s.name == name)
    }

    fn run_config(&self, period: f64) -> Result<RunConfig, ConfigError> {
        match self.length {
            RunLength::Periods(n) => RunConfig::for_periods(self.dt, n, period),
            RunLength::Steps(steps) => Ok(RunConfig::new(self.dt, steps)),
        }
    }

    pub fn run(&self) -> Result<Outcome, ScenarioError> {
        match self.model {
            ModelConfig::Oscillator {
                angular_frequency,
                amplitude,
            } => {
                let model = Oscillator::new(angular_frequency);
                let config = self.run_config(model.period())?;
                let exact = HarmonicSolution::from_amplitude(amplitude, &model);
                let initial = State::at_rest(amplitude);
                let comparison = match self.integrator {
                    IntegratorKind::ForwardEuler => {
                        compare(&model, &ForwardEuler::default(), &exact, initial, &config)?
                    }
                    IntegratorKind::SemiImplicitEuler => compare(
                        &model,
                        &ForwardEuler::new(EulerOrdering::SemiImplicit),
                        &exact,
                        initial,
                        &config,
                    )?,
                    IntegratorKind::Leapfrog => {
                        compare(&model, &Leapfrog, &exact, initial, &config)?
                    }
                    IntegratorKind::Boris => {
                        return Err(ScenarioError::Unsupported {
                            integrator: self.integrator,
                            model: self.model.label(),
                        })
                    }
                };
                Ok(Outcome::Oscillator { model, comparison })
            }
            ModelConfig::ChargedParticle {
                charge,
                mass,
                electric,
                magnetic,
                velocity,
                position,
            } => {
                let model = ChargedParticle::new(
                    charge,
                    mass,
                    DVec3::from_array(electric),
                    DVec3::from_array(magnetic),
                );
                let exact = GyroMotion::new(
                    &model,
                    DVec3::from_array(position),
                    DVec3::from_array(velocity),
                )?;
                let config = self.run_config(model.gyro_period())?;
                let initial = exact.aligned_initial_state();
                let comparison = match self.integrator {
                    IntegratorKind::Boris => {
                        compare(&model, &BorisPusher, &exact, initial, &config)?
                    }
                    IntegratorKind::Leapfrog => {
                        compare(&model, &Leapfrog, &exact, initial, &config)?
                    }
                    IntegratorKind::ForwardEuler => {
                        compare(&model, &ForwardEuler::default(), &exact, initial, &config)?
                    }
                    IntegratorKind::SemiImplicitEuler => compare(
                        &model,
                        &ForwardEuler::new(EulerOrdering::SemiImplicit),
                        &exact,
                        initial,
                        &config,
                    )?,
                };
                Ok(Outcome::ChargedParticle { model, comparison })
            }
        }
    }
}
