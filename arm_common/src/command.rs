//! Inbound commands.
//!
//! Values are already in meters and radians. The JSON form is tagged by a
//! `type` field:
//!
//! ```json
//! {"type":"inverse_kinematic","x":0.6,"y":0.2,"z":0.0}
//! {"type":"move","x":1.0,"z":0.5,"keep_end_effector_still":true}
//! {"type":"stop"}
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A command applied by the scheduler at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ArmCommand {
    /// Move the base to `(x, z)`. With `keep_end_effector_still` the base
    /// first orbits the wrist, then walks in while the arm re-bends so the
    /// end effector ends where it started.
    Move {
        x: f64,
        z: f64,
        #[serde(default)]
        keep_end_effector_still: bool,
    },
    /// Swing the crane to an absolute angle.
    RotateCrane { phi: f64 },
    /// Raise or lower the crane.
    Lift { y: f64 },
    /// Lift and swing in one command.
    MoveCrane { y: f64, phi: f64 },
    /// Bend the elbow to an absolute angle.
    RotateElbow { phi: f64 },
    /// Turn the wrist to an absolute angle.
    RotateWrist { phi: f64 },
    /// Open the gripper jaws to `space` meters.
    OpenGripper { space: f64 },
    /// Place the end effector at `(x, y, z)` by walking the base and
    /// swinging the crane.
    InverseKinematic { x: f64, y: f64, z: f64 },
    /// Halt every axis in place.
    Stop,
    /// Publish a snapshot on the next tick even if nothing moved.
    GetSnapshot,
}

/// Rejection of a structurally valid but numerically unusable command.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommandError {
    /// A coordinate or angle was NaN or infinite.
    #[error("{command}: field '{field}' is not finite ({value})")]
    NonFinite {
        command: &'static str,
        field: &'static str,
        value: f64,
    },
    /// Gripper opening below zero.
    #[error("open_gripper: space must be >= 0 (got {0})")]
    NegativeGripperSpace(f64),
}

impl ArmCommand {
    /// Snake-case name, as used in the `type` tag.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Move { .. } => "move",
            Self::RotateCrane { .. } => "rotate_crane",
            Self::Lift { .. } => "lift",
            Self::MoveCrane { .. } => "move_crane",
            Self::RotateElbow { .. } => "rotate_elbow",
            Self::RotateWrist { .. } => "rotate_wrist",
            Self::OpenGripper { .. } => "open_gripper",
            Self::InverseKinematic { .. } => "inverse_kinematic",
            Self::Stop => "stop",
            Self::GetSnapshot => "get_snapshot",
        }
    }

    /// Check that every numeric field is usable by the motion engine.
    pub fn validate(&self) -> Result<(), CommandError> {
        let command = self.name();
        let finite = |field: &'static str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(CommandError::NonFinite {
                    command,
                    field,
                    value,
                })
            }
        };
        match *self {
            Self::Move { x, z, .. } => {
                finite("x", x)?;
                finite("z", z)
            }
            Self::RotateCrane { phi } | Self::RotateElbow { phi } | Self::RotateWrist { phi } => {
                finite("phi", phi)
            }
            Self::Lift { y } => finite("y", y),
            Self::MoveCrane { y, phi } => {
                finite("y", y)?;
                finite("phi", phi)
            }
            Self::OpenGripper { space } => {
                finite("space", space)?;
                if space < 0.0 {
                    return Err(CommandError::NegativeGripperSpace(space));
                }
                Ok(())
            }
            Self::InverseKinematic { x, y, z } => {
                finite("x", x)?;
                finite("y", y)?;
                finite("z", z)
            }
            Self::Stop | Self::GetSnapshot => Ok(()),
        }
    }
}
