//! Bounded-velocity point-to-point motion of one scalar axis.
//!
//! Each tick the axis gains `acceleration` of speed, capped at
//! `max_velocity`, and steps that far toward its target. Once the remaining
//! distance is within `cutoff` the axis settles: velocity drops to zero and
//! the target is cleared.
//!
//! There is no deceleration phase. `cutoff` is at least one max-speed step,
//! so the axis cannot step over its target and oscillate.

use arm_common::limits::{AxisLimits, SettlePolicy};
use tracing::trace;

/// Whether an axis is heading somewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisStatus {
    Stationary,
    Moving,
}

/// One linear degree of freedom (lift, gripper).
///
/// Units follow the limits: meters per tick for velocity, meters for
/// position and cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionAxis {
    position: f64,
    velocity: f64,
    target: Option<f64>,
    limits: AxisLimits,
}

impl MotionAxis {
    /// A stationary axis at `position`.
    pub const fn new(position: f64, limits: AxisLimits) -> Self {
        Self {
            position,
            velocity: 0.0,
            target: None,
            limits,
        }
    }

    #[inline]
    pub const fn position(&self) -> f64 {
        self.position
    }

    #[inline]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub const fn target(&self) -> Option<f64> {
        self.target
    }

    #[inline]
    pub const fn limits(&self) -> &AxisLimits {
        &self.limits
    }

    /// Moving exactly when a target is set.
    #[inline]
    pub const fn status(&self) -> AxisStatus {
        if self.target.is_some() {
            AxisStatus::Moving
        } else {
            AxisStatus::Stationary
        }
    }

    #[inline]
    pub const fn is_moving(&self) -> bool {
        self.target.is_some()
    }

    /// Head for `target`. The current speed is kept, so retargeting a
    /// moving axis continues from whatever velocity it already had.
    pub fn set_target(&mut self, target: f64) {
        self.target = Some(target);
    }

    /// Stop in place without moving.
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.target = None;
    }

    /// Advance one tick. Returns whether the axis changed.
    pub fn tick(&mut self) -> bool {
        match self.target {
            Some(target) => self.step(target - self.position, target),
            None => false,
        }
    }

    /// Shift the position without touching status or velocity.
    pub(crate) fn offset_position(&mut self, amount: f64) {
        self.position += amount;
    }

    /// Move by up to one step, given the signed distance still to cover
    /// (positive means the position has to grow) and the position a snap
    /// settle lands on.
    pub(crate) fn step(&mut self, remaining: f64, settled_position: f64) -> bool {
        if remaining.abs() <= self.limits.cutoff {
            if self.limits.settle == SettlePolicy::Snap {
                self.position = settled_position;
            }
            trace!(position = self.position, "axis settled");
            self.halt();
            return true;
        }

        self.velocity = (self.velocity + self.limits.acceleration).min(self.limits.max_velocity);
        self.position += remaining.signum() * self.velocity;
        true
    }
}
