//! Error types for simulation setup and execution

use crate::trajectory::Trajectory;
use thiserror::Error;

/// Invalid run or model parameters, detected before any step is taken
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("time step must be finite and positive, got {0}")]
    InvalidTimeStep(f64),
    #[error("step count must be at least 1")]
    NoSteps,
    #[error("particle mass must be non-zero")]
    ZeroMass,
    #[error("{0} must be finite")]
    NonFinite(&'static str),
    #[error("period must be finite and positive, got {0}")]
    InvalidPeriod(f64),
    #[error("period count must be finite and non-negative, got {0}")]
    InvalidPeriodCount(f64),
    #[error("run would need {0:.3e} states, more than the limit of {limit}", limit = crate::runtime::MAX_STEPS)]
    TooManySteps(f64),
}

/// Reasons a run is refused before it starts
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SetupError {
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),
    #[error("gyro-frequency is zero (no magnetic field or no charge), gyration is undefined")]
    DegenerateField,
}

/// Failure of a single simulation run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError<V> {
    /// The run was never attempted
    #[error(transparent)]
    Setup(#[from] SetupError),
    /// Step `step` produced a non-finite state. `partial` holds every state
    /// before it, starting with the initial condition.
    #[error("numerical divergence at step {step} (t = {time}): non-finite position or velocity")]
    NumericalDivergence {
        step: usize,
        time: f64,
        partial: Trajectory<V>,
    },
}

impl<V> SimError<V> {
    pub fn partial(&self) -> Option<&Trajectory<V>> {
        match self {
            Self::Setup(_) => None,
            Self::NumericalDivergence { partial, .. } => Some(partial),
        }
    }

    pub fn is_degenerate_field(&self) -> bool {
        matches!(self, Self::Setup(SetupError::DegenerateField))
    }
}

impl<V> From<ConfigError> for SimError<V> {
    fn from(err: ConfigError) -> Self {
        Self::Setup(SetupError::Configuration(err))
    }
}
