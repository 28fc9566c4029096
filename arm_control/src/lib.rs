//! # Arm Control Library
//!
//! Motion engine of the mobile robot arm simulator: bounded-velocity axes,
//! planar forward kinematics, an inverse-kinematics planner with the
//! pivot-then-extend maneuver, and a fixed-rate scheduler that owns the
//! robot state and publishes snapshots.
//!
//! ## Data Flow
//!
//! commands → [`scheduler::SchedulerHandle`] (bounded queue) →
//! [`state::RobotState::apply`] (direct targets or [`planner`]) →
//! [`state::RobotState::tick`] → snapshot → [`publisher::SnapshotPublisher`]
//!
//! The [`adapter`] module turns JSON lines into commands for the binary.
//!
//! ## Units
//!
//! Meters and radians throughout. Axis limits inside the engine are per
//! tick; they are derived from the physical limits in the configuration
//! when the state is built.

pub mod adapter;
pub mod error;
pub mod kinematics;
pub mod motion;
pub mod planner;
pub mod publisher;
pub mod scheduler;
pub mod state;
