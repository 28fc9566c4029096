//! Coupled x/z motion of the mobile base.
//!
//! Both planar axes share one speed budget. While walking, the per-tick
//! speed is split between x and z with a square-root heuristic:
//!
//! ```text
//! vx = sqrt(|dx| / (|dx| + |dz|)) · v
//! vz = sqrt(|dz| / (|dx| + |dz|)) · v
//! ```
//!
//! This is not a unit-vector decomposition: the combined step is slightly
//! longer than `v` off the axes. The split is kept as-is because recorded
//! trajectories depend on it.
//!
//! Pivoting (orbiting the wrist) is driven by the planner; this type only
//! stores the orbit parameters and the shared speed.

use arm_common::limits::{AxisLimits, SettlePolicy};
use tracing::trace;

use super::axis::AxisStatus;
use crate::kinematics::Point2;

/// What the base is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BaseMode {
    /// Standing still.
    Idle,
    /// Walking straight to a point.
    WalkingTo(Point2),
    /// Orbiting `center` at `radius` until the base reaches `bearing`
    /// (measured from the center), then walking to `destination`.
    PivotingAbout {
        center: Point2,
        radius: f64,
        bearing: f64,
        destination: Point2,
    },
}

/// Mobile base position and its shared velocity.
///
/// Units: meters, meters per tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BaseAxis {
    position: Point2,
    velocity: f64,
    mode: BaseMode,
    limits: AxisLimits,
}

impl BaseAxis {
    pub const fn new(position: Point2, limits: AxisLimits) -> Self {
        Self {
            position,
            velocity: 0.0,
            mode: BaseMode::Idle,
            limits,
        }
    }

    #[inline]
    pub const fn position(&self) -> Point2 {
        self.position
    }

    #[inline]
    pub const fn velocity(&self) -> f64 {
        self.velocity
    }

    #[inline]
    pub const fn mode(&self) -> BaseMode {
        self.mode
    }

    #[inline]
    pub const fn limits(&self) -> &AxisLimits {
        &self.limits
    }

    #[inline]
    pub const fn status(&self) -> AxisStatus {
        match self.mode {
            BaseMode::Idle => AxisStatus::Stationary,
            _ => AxisStatus::Moving,
        }
    }

    #[inline]
    pub const fn is_moving(&self) -> bool {
        !matches!(self.mode, BaseMode::Idle)
    }

    /// Walk straight to `destination`, keeping the current speed.
    pub fn walk_to(&mut self, destination: Point2) {
        self.mode = BaseMode::WalkingTo(destination);
    }

    /// Start orbiting `center`. See [`BaseMode::PivotingAbout`].
    pub fn pivot_about(&mut self, center: Point2, radius: f64, bearing: f64, destination: Point2) {
        self.mode = BaseMode::PivotingAbout {
            center,
            radius,
            bearing,
            destination,
        };
    }

    /// Stop in place.
    pub fn halt(&mut self) {
        self.velocity = 0.0;
        self.mode = BaseMode::Idle;
    }

    /// Gain one tick of speed and return it.
    pub(crate) fn accelerate(&mut self) -> f64 {
        self.velocity = (self.velocity + self.limits.acceleration).min(self.limits.max_velocity);
        self.velocity
    }

    pub(crate) fn set_position(&mut self, position: Point2) {
        self.position = position;
    }

    /// Advance one walking tick. Returns whether the base changed.
    ///
    /// Does nothing unless the mode is [`BaseMode::WalkingTo`].
    pub fn tick_walk(&mut self) -> bool {
        let BaseMode::WalkingTo(destination) = self.mode else {
            return false;
        };

        let dx = destination.x - self.position.x;
        let dz = destination.z - self.position.z;
        let manhattan = dx.abs() + dz.abs();

        if manhattan <= self.limits.cutoff {
            if self.limits.settle == SettlePolicy::Snap {
                self.position = destination;
            }
            trace!(x = self.position.x, z = self.position.z, "base arrived");
            self.halt();
            return true;
        }

        let v = self.accelerate();
        if manhattan > 0.0 {
            let vx = (dx.abs() / manhattan).sqrt() * v;
            let vz = (dz.abs() / manhattan).sqrt() * v;
            self.position.x += dx.signum() * vx;
            self.position.z += dz.signum() * vz;
        }
        true
    }
}
