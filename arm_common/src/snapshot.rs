//! Outbound robot snapshot.
//!
//! Published once per tick in which any axis changed and once per
//! on-demand request:
//!
//! ```json
//! {"base":{"x":0.0,"z":0.0},"crane":{"phi":0.0,"y":0.5},
//!  "elbow":{"phi":0.0},"wrist":{"phi":0.0},"gripper":{"space":0.0}}
//! ```
//!
//! Angles are the raw accumulated joint angles in radians; they are not
//! wrapped into `[0, 2π)`, so observers never see a 2π jump.

use serde::{Deserialize, Serialize};

/// Base position in the horizontal plane. Units: m
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BasePose {
    pub x: f64,
    pub z: f64,
}

/// Crane swing (rad) and lift (m).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CranePose {
    pub phi: f64,
    pub y: f64,
}

/// Single rotational joint. Units: rad
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct JointPose {
    pub phi: f64,
}

/// Gripper jaw opening. Units: m
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GripperPose {
    pub space: f64,
}

/// Full joint state of the robot at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RobotSnapshot {
    pub base: BasePose,
    pub crane: CranePose,
    pub elbow: JointPose,
    pub wrist: JointPose,
    pub gripper: GripperPose,
}
