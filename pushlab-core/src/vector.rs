//! Vector spaces the integrators operate on.
//!
//! The oscillator lives on the real line (`f64`) and the charged particle in
//! three dimensions (`DVec3`). Both implement [`Phase`], so the generic
//! integrators are written once.

use glam::DVec3;
use std::fmt::Debug;
use std::ops::{Add, Mul, Neg, Sub};

/// Position/velocity vector type usable by the integrators
pub trait Phase:
    Copy
    + Debug
    + PartialEq
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<f64, Output = Self>
    + Neg<Output = Self>
{
    const ZERO: Self;

    fn dot(self, other: Self) -> f64;

    fn length_squared(self) -> f64 {
        self.dot(self)
    }

    fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// True when every component is neither NaN nor infinite
    fn all_finite(self) -> bool;
}

impl Phase for f64 {
    const ZERO: Self = 0.0;

    fn dot(self, other: Self) -> f64 {
        self * other
    }

    fn length(self) -> f64 {
        self.abs()
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }
}

impl Phase for DVec3 {
    const ZERO: Self = DVec3::ZERO;

    fn dot(self, other: Self) -> f64 {
        DVec3::dot(self, other)
    }

    fn all_finite(self) -> bool {
        self.is_finite()
    }
}

/// Split `a` into the components parallel and perpendicular to `onto`.
///
/// `parallel = (a·b / |b|²)·b`, `perpendicular = a − parallel`. A zero
/// `onto` has no direction, so everything is perpendicular.
pub fn project(a: DVec3, onto: DVec3) -> (DVec3, DVec3) {
    let norm_sq = onto.length_squared();
    if norm_sq == 0.0 {
        return (DVec3::ZERO, a);
    }
    let parallel = onto * (a.dot(onto) / norm_sq);
    (parallel, a - parallel)
}
