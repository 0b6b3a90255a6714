use crate::vector::Phase;

/// A time-tagged point in phase space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State<V> {
    pub time: f64,
    pub position: V,
    pub velocity: V,
}

impl<V: Phase> State<V> {
    pub fn new(time: f64, position: V, velocity: V) -> Self {
        Self {
            time,
            position,
            velocity,
        }
    }

    /// State at t = 0 with zero velocity
    pub fn at_rest(position: V) -> Self {
        Self::new(0.0, position, V::ZERO)
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.position.all_finite() && self.velocity.all_finite()
    }
}

/// On-grid state paired with the velocity half a step behind it.
///
/// Leapfrog-type schemes advance position with `half_velocity` (v at
/// t − dt/2 relative to `on_grid.time`); `on_grid.velocity` is only the
/// synchronized estimate reported to callers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Staggered<V> {
    pub on_grid: State<V>,
    pub half_velocity: V,
}

/// Uniform time grid `start + i·dt` for `i` in `0..steps`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeGrid {
    pub start: f64,
    pub dt: f64,
    pub steps: usize,
}

impl TimeGrid {
    pub fn new(start: f64, dt: f64, steps: usize) -> Self {
        Self { start, dt, steps }
    }

    pub fn time(&self, index: usize) -> f64 {
        self.start + index as f64 * self.dt
    }

    pub fn len(&self) -> usize {
        self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }

    /// Time of the last grid point
    pub fn end(&self) -> f64 {
        self.time(self.steps.saturating_sub(1))
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.steps).map(move |i| self.time(i))
    }
}
