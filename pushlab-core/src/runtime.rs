use crate::analytic::Analytic;
use crate::error::{ConfigError, SimError};
use crate::integrator::Integrator;
use crate::model::Model;
use crate::state::{State, TimeGrid};
use crate::trajectory::Trajectory;
use crate::vector::Phase;
use log::{debug, info, warn};

/// Upper bound on recorded states per run. The trajectory is preallocated, so
/// anything larger is refused before allocation.
pub const MAX_STEPS: usize = 100_000_000;

/// Time step and trajectory length of one run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunConfig {
    pub dt: f64,
    /// Number of recorded states, including the initial condition
    pub steps: usize,
}

impl RunConfig {
    pub fn new(dt: f64, steps: usize) -> Self {
        Self { dt, steps }
    }

    /// Cover `periods` oscillations of length `period`: `⌊periods·T/dt⌋ + 1`
    /// states
    pub fn for_periods(dt: f64, periods: f64, period: f64) -> Result<Self, ConfigError> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(dt));
        }
        if !period.is_finite() || period <= 0.0 {
            return Err(ConfigError::InvalidPeriod(period));
        }
        if !periods.is_finite() || periods < 0.0 {
            return Err(ConfigError::InvalidPeriodCount(periods));
        }
        let states = (periods * period / dt).floor() + 1.0;
        if !states.is_finite() || states > MAX_STEPS as f64 {
            return Err(ConfigError::TooManySteps(states));
        }
        Ok(Self {
            dt,
            steps: states as usize,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if self.steps < 1 {
            return Err(ConfigError::NoSteps);
        }
        if self.steps > MAX_STEPS {
            return Err(ConfigError::TooManySteps(self.steps as f64));
        }
        Ok(())
    }

    /// Times at which a run starting at `start` records its states
    pub fn grid(&self, start: f64) -> TimeGrid {
        TimeGrid::new(start, self.dt, self.steps)
    }
}

/// Drives an integrator over a fixed number of steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Simulator {
    config: RunConfig,
}

impl Simulator {
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn run<M, I>(
        &self,
        model: &M,
        integrator: &I,
        initial: State<M::Vector>,
    ) -> Result<Trajectory<M::Vector>, SimError<M::Vector>>
    where
        M: Model,
        I: Integrator<M>,
    {
        run(model, integrator, initial, &self.config)
    }
}

/// Integrate `model` from `initial` and record every on-grid state.
///
/// Nothing is stepped unless the configuration, the model and the
/// integrator/model pairing are all valid. A non-finite step aborts the run;
/// the states recorded before it are returned inside the error.
pub fn run<M, I>(
    model: &M,
    integrator: &I,
    initial: State<M::Vector>,
    config: &RunConfig,
) -> Result<Trajectory<M::Vector>, SimError<M::Vector>>
where
    M: Model,
    I: Integrator<M>,
{
    if let Err(err) = check_setup(model, integrator, &initial, config) {
        warn!("{} run rejected: {}", integrator.name(), err);
        return Err(err);
    }

    let grid = config.grid(initial.time);
    info!(
        "running {} for {} steps (dt = {}, t = {} to {})",
        integrator.name(),
        config.steps,
        config.dt,
        grid.start,
        grid.end()
    );

    let mut trajectory = Trajectory::with_capacity(config.steps);
    trajectory.push(initial);

    let mut carry = integrator.prime(model, initial, config.dt);
    for step in 1..config.steps {
        carry = integrator.step(model, &carry, config.dt);
        let state = integrator.observe(&carry);
        if !state.is_finite() {
            warn!(
                "{} diverged at step {} (t = {})",
                integrator.name(),
                step,
                state.time
            );
            return Err(SimError::NumericalDivergence {
                step,
                time: state.time,
                partial: trajectory,
            });
        }
        trajectory.push(state);
    }

    debug!(
        "{} finished: {} states, t_end = {}",
        integrator.name(),
        trajectory.len(),
        trajectory.last().map_or(initial.time, |s| s.time)
    );
    Ok(trajectory)
}

fn check_setup<M, I>(
    model: &M,
    integrator: &I,
    initial: &State<M::Vector>,
    config: &RunConfig,
) -> Result<(), SimError<M::Vector>>
where
    M: Model,
    I: Integrator<M>,
{
    config.validate()?;
    model.validate()?;
    integrator.check(model)?;
    if !initial.is_finite() {
        return Err(ConfigError::NonFinite("initial state").into());
    }
    Ok(())
}

/// A numerical trajectory next to the exact solution on the same times
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison<V> {
    pub numerical: Trajectory<V>,
    pub analytic: Trajectory<V>,
}

impl<V: Phase> Comparison<V> {
    /// Largest pointwise distance between the two position sequences
    pub fn max_position_error(&self) -> f64 {
        crate::diagnostics::max_position_error(&self.numerical, &self.analytic)
    }

    pub fn max_velocity_error(&self) -> f64 {
        crate::diagnostics::max_velocity_error(&self.numerical, &self.analytic)
    }
}

/// Run the integrator, then sample `exact` on the resulting time stamps
pub fn compare<M, I, A>(
    model: &M,
    integrator: &I,
    exact: &A,
    initial: State<M::Vector>,
    config: &RunConfig,
) -> Result<Comparison<M::Vector>, SimError<M::Vector>>
where
    M: Model,
    I: Integrator<M>,
    A: Analytic<Vector = M::Vector>,
{
    let numerical = run(model, integrator, initial, config)?;
    let analytic = exact.sample_like(&numerical);
    Ok(Comparison {
        numerical,
        analytic,
    })
}
