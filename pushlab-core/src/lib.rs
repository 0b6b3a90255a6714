pub mod analytic;
pub mod diagnostics;
pub mod error;
pub mod integrator;
pub mod model;
pub mod runtime;
pub mod scenario;
pub mod state;
pub mod trajectory;
pub mod vector;

pub use analytic::{Analytic, GyroMotion, HarmonicSolution};
pub use error::{ConfigError, SetupError, SimError};
pub use integrator::{BorisPusher, EulerOrdering, ForwardEuler, Integrator, Leapfrog};
pub use model::{ChargedParticle, Model, Oscillator};
pub use runtime::{compare, run, Comparison, RunConfig, Simulator};
pub use scenario::{IntegratorKind, ModelConfig, Outcome, RunLength, Scenario, ScenarioError};
pub use state::{Staggered, State, TimeGrid};
pub use trajectory::Trajectory;
pub use vector::Phase;
