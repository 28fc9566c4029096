//! Motion limits.
//!
//! Limits are configured in physical units (per second) and converted to
//! per-tick quantities once the tick period is known:
//!
//! - `max_step   = max_velocity · dt`
//! - `accel_step = acceleration · dt²`
//! - `cutoff` defaults to `max_step + accel_step`
//!
//! Keeping the conversion in one place means a tick-rate change never
//! rescales physical behavior.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::time::Duration;

/// What an axis does with its position when it settles inside the cutoff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SettlePolicy {
    /// Position is set exactly onto the target.
    #[default]
    Snap,
    /// Position stays where it is, leaving an error of at most `cutoff`.
    Residual,
}

/// Physical limits of one axis as written in the configuration.
///
/// Units: meters (linear axes) or radians (rotational axes), per second.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PhysicalLimits {
    /// Maximum speed. Units: m/s or rad/s
    pub max_velocity: f64,
    /// Speed gained per second. Units: m/s² or rad/s²
    pub acceleration: f64,
    /// Settle threshold. Derived from the other two limits when omitted.
    /// Units: m or rad
    #[serde(default)]
    pub cutoff: Option<f64>,
}

impl PhysicalLimits {
    /// Create limits with a derived cutoff.
    pub const fn new(max_velocity: f64, acceleration: f64) -> Self {
        Self {
            max_velocity,
            acceleration,
            cutoff: None,
        }
    }

    /// Convert to per-tick limits for the given tick period.
    pub fn per_tick(&self, tick: Duration, settle: SettlePolicy) -> AxisLimits {
        let dt = tick.as_secs_f64();
        let max_step = self.max_velocity * dt;
        let accel_step = self.acceleration * dt * dt;
        AxisLimits {
            max_velocity: max_step,
            acceleration: accel_step,
            cutoff: self.cutoff.unwrap_or(max_step + accel_step),
            settle,
        }
    }

    fn validate(&self, axis: &str, tick: Duration) -> Result<(), ConfigError> {
        if !self.max_velocity.is_finite() || self.max_velocity <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "limits.{axis}.max_velocity must be > 0 (got {})",
                self.max_velocity
            )));
        }
        if !self.acceleration.is_finite() || self.acceleration <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "limits.{axis}.acceleration must be > 0 (got {})",
                self.acceleration
            )));
        }
        if let Some(cutoff) = self.cutoff {
            let max_step = self.max_velocity * tick.as_secs_f64();
            if !cutoff.is_finite() || cutoff <= 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "limits.{axis}.cutoff must be > 0 (got {cutoff})"
                )));
            }
            // A cutoff below one max-speed step lets the axis jump over its
            // target and oscillate.
            if cutoff < max_step {
                return Err(ConfigError::ValidationError(format!(
                    "limits.{axis}.cutoff {cutoff} is smaller than one max-speed step {max_step}"
                )));
            }
        }
        Ok(())
    }
}

/// Limits of one axis in per-tick units, as consumed by the motion axes.
///
/// Units: meters or radians per tick (`max_velocity`), per tick per tick
/// (`acceleration`), meters or radians (`cutoff`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLimits {
    /// Largest displacement in one tick.
    pub max_velocity: f64,
    /// Displacement gained per tick on every tick.
    pub acceleration: f64,
    /// Distance below which the axis settles.
    pub cutoff: f64,
    /// What settling does to the position.
    pub settle: SettlePolicy,
}

impl AxisLimits {
    /// Per-tick limits with the default settle policy.
    pub const fn new(max_velocity: f64, acceleration: f64, cutoff: f64) -> Self {
        Self {
            max_velocity,
            acceleration,
            cutoff,
            settle: SettlePolicy::Snap,
        }
    }

    /// Same limits with a different settle policy.
    pub const fn with_settle(mut self, settle: SettlePolicy) -> Self {
        self.settle = settle;
        self
    }
}

fn default_base() -> PhysicalLimits {
    PhysicalLimits::new(0.5, 1.0)
}

fn default_crane_rotation() -> PhysicalLimits {
    PhysicalLimits::new(PI / 2.0, PI)
}

fn default_lift() -> PhysicalLimits {
    PhysicalLimits::new(0.1, 0.2)
}

fn default_joint() -> PhysicalLimits {
    PhysicalLimits::new(PI / 2.0, PI)
}

fn default_gripper() -> PhysicalLimits {
    PhysicalLimits::new(0.02, 0.05)
}

/// Physical limits of every axis of the robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotionLimits {
    /// Shared budget of the coupled base x/z motion (also drives the pivot).
    #[serde(default = "default_base")]
    pub base: PhysicalLimits,
    /// Crane swing.
    #[serde(default = "default_crane_rotation")]
    pub crane_rotation: PhysicalLimits,
    /// Crane lift.
    #[serde(default = "default_lift")]
    pub lift: PhysicalLimits,
    /// Elbow joint.
    #[serde(default = "default_joint")]
    pub elbow: PhysicalLimits,
    /// Wrist joint.
    #[serde(default = "default_joint")]
    pub wrist: PhysicalLimits,
    /// Gripper opening.
    #[serde(default = "default_gripper")]
    pub gripper: PhysicalLimits,
}

impl Default for MotionLimits {
    fn default() -> Self {
        Self {
            base: default_base(),
            crane_rotation: default_crane_rotation(),
            lift: default_lift(),
            elbow: default_joint(),
            wrist: default_joint(),
            gripper: default_gripper(),
        }
    }
}

impl MotionLimits {
    /// Validate every axis against the tick period.
    pub fn validate(&self, tick: Duration) -> Result<(), ConfigError> {
        self.base.validate("base", tick)?;
        self.crane_rotation.validate("crane_rotation", tick)?;
        self.lift.validate("lift", tick)?;
        self.elbow.validate("elbow", tick)?;
        self.wrist.validate("wrist", tick)?;
        self.gripper.validate("gripper", tick)?;
        Ok(())
    }
}
