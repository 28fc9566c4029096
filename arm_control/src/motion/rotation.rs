//! Angular axes with shortest-path wraparound.
//!
//! The stored angle is unbounded and accumulates past ±2π. Only the
//! distance to the target is computed on normalized angles, so a joint at
//! 350° heading for 10° travels 20°, not 340°.
//!
//! Sign convention (shared with forward kinematics): the shortest delta is
//! `norm(current) - norm(target)`; a negative delta grows the stored angle,
//! a positive delta shrinks it.

use std::f64::consts::{PI, TAU};

use arm_common::limits::AxisLimits;

use super::axis::{AxisStatus, MotionAxis};

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// Signed shortest arc `norm(current) - norm(target)`, folded into `(-π, π]`.
#[inline]
pub fn shortest_delta(current: f64, target: f64) -> f64 {
    let delta = normalize_angle(current) - normalize_angle(target);
    if delta > PI {
        delta - TAU
    } else if delta <= -PI {
        delta + TAU
    } else {
        delta
    }
}

/// One rotational degree of freedom (crane swing, elbow, wrist).
///
/// Units: radians, radians per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct RotationAxis {
    inner: MotionAxis,
}

impl RotationAxis {
    /// A stationary joint at `angle`.
    pub const fn new(angle: f64, limits: AxisLimits) -> Self {
        Self {
            inner: MotionAxis::new(angle, limits),
        }
    }

    /// Raw accumulated angle.
    #[inline]
    pub const fn angle(&self) -> f64 {
        self.inner.position()
    }

    /// Angle wrapped into `[0, 2π)`.
    #[inline]
    pub fn normalized(&self) -> f64 {
        normalize_angle(self.inner.position())
    }

    #[inline]
    pub const fn velocity(&self) -> f64 {
        self.inner.velocity()
    }

    #[inline]
    pub const fn target(&self) -> Option<f64> {
        self.inner.target()
    }

    #[inline]
    pub const fn limits(&self) -> &AxisLimits {
        self.inner.limits()
    }

    #[inline]
    pub const fn status(&self) -> AxisStatus {
        self.inner.status()
    }

    #[inline]
    pub const fn is_moving(&self) -> bool {
        self.inner.is_moving()
    }

    /// Rotate to an absolute angle along the shortest arc.
    pub fn rotate(&mut self, angle: f64) {
        self.inner.set_target(angle);
    }

    pub fn halt(&mut self) {
        self.inner.halt();
    }

    /// Advance one tick. Returns whether the joint changed.
    pub fn tick(&mut self) -> bool {
        let Some(target) = self.inner.target() else {
            return false;
        };
        let delta = shortest_delta(self.inner.position(), target);
        // Settling subtracts the delta from the raw angle, so the joint
        // never jumps by a full turn.
        self.inner.step(-delta, self.inner.position() - delta)
    }

    /// Turn by `amount` radians without affecting status or velocity.
    pub(crate) fn turn_by(&mut self, amount: f64) {
        self.inner.offset_position(amount);
    }
}
