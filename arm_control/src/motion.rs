//! Motion axes.
//!
//! - [`axis`] - Linear bounded-velocity axis (lift, gripper)
//! - [`rotation`] - Angular axis with shortest-path wraparound
//! - [`base`] - Coupled x/z base with walk and pivot modes

pub mod axis;
pub mod base;
pub mod rotation;

pub use axis::{AxisStatus, MotionAxis};
pub use base::{BaseAxis, BaseMode};
pub use rotation::{RotationAxis, normalize_angle, shortest_delta};
