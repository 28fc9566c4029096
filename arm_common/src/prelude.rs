//! Prelude module for common re-exports.
//!
//! ```rust
//! use arm_common::prelude::*;
//! ```

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{
    ArmConfig, ConfigError, ConfigLoader, SchedulerConfig, SharedConfig, load_config,
};
pub use crate::geometry::{ArmGeometry, LinkDimensions};
pub use crate::limits::{AxisLimits, MotionLimits, PhysicalLimits, SettlePolicy};

// ─── Commands & Snapshots ───────────────────────────────────────────
pub use crate::command::{ArmCommand, CommandError};
pub use crate::snapshot::{BasePose, CranePose, GripperPose, JointPose, RobotSnapshot};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{DEFAULT_TICK_RATE_HZ, DEGENERATE_EPSILON, GEOMETRY_TOLERANCE};
