//! Ordered record of the states produced by one run.
//!
//! A trajectory is filled by the simulator and handed out read-only; only
//! code inside the crate can append to it.

use crate::state::State;
use std::ops::Index;

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory<V> {
    states: Vec<State<V>>,
}

impl<V: Copy> Trajectory<V> {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, state: State<V>) {
        self.states.push(state);
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&State<V>> {
        self.states.get(index)
    }

    pub fn first(&self) -> Option<&State<V>> {
        self.states.first()
    }

    pub fn last(&self) -> Option<&State<V>> {
        self.states.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, State<V>> {
        self.states.iter()
    }

    pub fn as_slice(&self) -> &[State<V>] {
        &self.states
    }

    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.states.iter().map(|s| s.time)
    }

    pub fn positions(&self) -> impl Iterator<Item = V> + '_ {
        self.states.iter().map(|s| s.position)
    }

    pub fn velocities(&self) -> impl Iterator<Item = V> + '_ {
        self.states.iter().map(|s| s.velocity)
    }
}

impl<V> Index<usize> for Trajectory<V> {
    type Output = State<V>;

    fn index(&self, index: usize) -> &State<V> {
        &self.states[index]
    }
}

impl<'a, V> IntoIterator for &'a Trajectory<V> {
    type Item = &'a State<V>;
    type IntoIter = std::slice::Iter<'a, State<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.states.iter()
    }
}

impl<V> FromIterator<State<V>> for Trajectory<V> {
    fn from_iter<I: IntoIterator<Item = State<V>>>(iter: I) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}
