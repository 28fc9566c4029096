//! Arm Common Library
//!
//! Shared, transport-neutral types for the arm simulator workspace.
//!
//! # Module Structure
//!
//! - [`consts`] - Numeric limits, tolerances and defaults
//! - [`config`] - Configuration loading traits and types
//! - [`geometry`] - Immutable link dimensions and derived reaches
//! - [`limits`] - Physical and per-tick motion limits
//! - [`command`] - Inbound commands
//! - [`snapshot`] - Outbound joint-state snapshot
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use arm_common::config::{ArmConfig, ConfigLoader};
//! use arm_common::command::ArmCommand;
//! ```

pub mod command;
pub mod config;
pub mod consts;
pub mod geometry;
pub mod limits;
pub mod prelude;
pub mod snapshot;
