//! System-wide constants for the arm simulator workspace.
//!
//! Single source of truth for numeric limits, tolerances and defaults.

/// Default scheduler tick rate in Hz.
pub const DEFAULT_TICK_RATE_HZ: u32 = 30;

/// Lowest accepted scheduler tick rate in Hz.
pub const MIN_TICK_RATE_HZ: u32 = 1;

/// Highest accepted scheduler tick rate in Hz.
pub const MAX_TICK_RATE_HZ: u32 = 1000;

/// Default capacity of the inbound command queue.
pub const DEFAULT_COMMAND_QUEUE_CAPACITY: usize = 64;

/// Upper bound for the inbound command queue capacity.
pub const MAX_COMMAND_QUEUE_CAPACITY: usize = 4096;

/// Offset applied when two points coincide exactly and a direction is needed.
pub const DEGENERATE_EPSILON: f64 = 1e-9;

/// Rounding slack accepted on a law-of-cosines argument before it is
/// treated as out of `[-1, 1]`. Arguments inside the slack are clamped.
pub const GEOMETRY_TOLERANCE: f64 = 1e-9;

/// Default service name used when running without a config file.
pub const DEFAULT_SERVICE_NAME: &str = "arm-sim";
