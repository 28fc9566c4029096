//! Arm link geometry.
//!
//! Every body part is a box described by `{width, height, depth}` in meters.
//! The set is loaded once from the `[geometry]` section of the configuration
//! and never mutated afterwards.
//!
//! ```toml
//! [geometry.upper_arm]
//! width = 0.08
//! height = 0.1
//! depth = 0.5
//! ```

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};

/// Dimensions of one rigid body part.
///
/// Units: meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LinkDimensions {
    /// Extent across the link.
    pub width: f64,
    /// Vertical extent.
    pub height: f64,
    /// Extent along the link (its reach).
    pub depth: f64,
}

impl LinkDimensions {
    /// Create a new set of link dimensions.
    pub const fn new(width: f64, height: f64, depth: f64) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    fn validate(&self, part: &str) -> Result<(), ConfigError> {
        for (field, value) in [
            ("width", self.width),
            ("height", self.height),
            ("depth", self.depth),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "geometry.{part}.{field} must be finite and >= 0 (got {value})"
                )));
            }
        }
        Ok(())
    }
}

fn default_body() -> LinkDimensions {
    LinkDimensions::new(0.4, 0.5, 0.4)
}

fn default_upper_arm() -> LinkDimensions {
    LinkDimensions::new(0.08, 0.1, 0.5)
}

fn default_lower_arm() -> LinkDimensions {
    LinkDimensions::new(0.06, 0.08, 0.4)
}

fn default_hand() -> LinkDimensions {
    LinkDimensions::new(0.05, 0.1, 0.05)
}

fn default_gripper() -> LinkDimensions {
    LinkDimensions::new(0.08, 0.05, 0.04)
}

/// Immutable geometry of the whole robot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmGeometry {
    /// Mobile base body. Half its depth offsets the crane from the base center.
    #[serde(default = "default_body")]
    pub body: LinkDimensions,
    /// Link between the crane and the elbow.
    #[serde(default = "default_upper_arm")]
    pub upper_arm: LinkDimensions,
    /// Link between the elbow and the wrist.
    #[serde(default = "default_lower_arm")]
    pub lower_arm: LinkDimensions,
    /// Hand below the wrist.
    #[serde(default = "default_hand")]
    pub hand: LinkDimensions,
    /// Gripper jaws.
    #[serde(default = "default_gripper")]
    pub gripper: LinkDimensions,
}

impl Default for ArmGeometry {
    fn default() -> Self {
        Self {
            body: default_body(),
            upper_arm: default_upper_arm(),
            lower_arm: default_lower_arm(),
            hand: default_hand(),
            gripper: default_gripper(),
        }
    }
}

impl ArmGeometry {
    /// Planar distance from the base center to the elbow joint.
    ///
    /// Units: meters
    #[inline]
    pub fn upper_arm_reach(&self) -> f64 {
        self.upper_arm.depth + self.body.depth / 2.0
    }

    /// Planar distance from the elbow joint to the wrist.
    ///
    /// Units: meters
    #[inline]
    pub fn lower_arm_reach(&self) -> f64 {
        self.lower_arm.depth
    }

    /// Vertical offset between the crane lift position and the end effector.
    ///
    /// Units: meters
    #[inline]
    pub fn hanging_height(&self) -> f64 {
        self.upper_arm.height + self.lower_arm.height + self.hand.height
    }

    /// Smallest and largest planar base-to-wrist distance the arm can form.
    pub fn reach_range(&self) -> (f64, f64) {
        let upper = self.upper_arm_reach();
        let lower = self.lower_arm_reach();
        ((upper - lower).abs(), upper + lower)
    }

    /// Validate the geometry.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - any dimension is negative or not finite
    /// - the upper or lower arm has zero reach
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.body.validate("body")?;
        self.upper_arm.validate("upper_arm")?;
        self.lower_arm.validate("lower_arm")?;
        self.hand.validate("hand")?;
        self.gripper.validate("gripper")?;

        if self.upper_arm_reach() <= 0.0 {
            return Err(ConfigError::ValidationError(
                "upper arm reach (upper_arm.depth + body.depth / 2) must be > 0".to_string(),
            ));
        }
        if self.lower_arm_reach() <= 0.0 {
            return Err(ConfigError::ValidationError(
                "geometry.lower_arm.depth must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}
