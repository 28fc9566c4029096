//! Error types of the motion engine.
//!
//! Planning errors leave the robot state untouched. Submission errors are
//! reported to the producer without blocking. Nothing here is raised from
//! inside a tick.

use arm_common::config::ConfigError;
use thiserror::Error;

/// A command that cannot be turned into axis targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    /// A law-of-cosines argument fell outside `[-1, 1]` (or was NaN): the
    /// requested triangle cannot be formed with the configured arm lengths.
    #[error("{operation}: target unreachable (law-of-cosines argument {argument})")]
    InvalidGeometry {
        operation: &'static str,
        argument: f64,
    },
}

/// Rejection of a non-blocking command submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// The bounded command queue is full.
    #[error("command queue full")]
    QueueFull,

    /// The scheduler has stopped and dropped its receiver.
    #[error("scheduler is not running")]
    Disconnected,
}

/// Failure to deliver a snapshot to its consumer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PublishError {
    #[error("snapshot serialization failed: {0}")]
    Serialize(String),

    #[error("snapshot write failed: {0}")]
    Io(String),

    #[error("snapshot consumer disconnected")]
    Closed,
}

/// Scheduler construction and startup errors.
#[derive(Debug, Clone, Error)]
pub enum SchedulerError {
    /// Configuration rejected by validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The scheduler thread could not be started.
    #[error("failed to spawn scheduler thread: {0}")]
    Spawn(String),
}
