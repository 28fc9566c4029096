//! Configuration loading traits and types.
//!
//! Every arm simulator binary loads one TOML document. Sections other than
//! `[shared]` fall back to defaults when omitted, and unknown keys are
//! rejected so a typo never silently reverts a limit to its default.
//!
//! # Usage
//!
//! ```rust,no_run
//! use arm_common::config::{ConfigError, load_config};
//! use std::path::Path;
//!
//! fn main() -> Result<(), ConfigError> {
//!     let config = load_config(Path::new("config/arm.toml"))?;
//!     println!("Service: {}", config.shared.service_name);
//!     println!("Tick: {:?}", config.scheduler.tick_period());
//!     Ok(())
//! }
//! ```
//!
//! # TOML Example
//!
//! ```toml
//! [shared]
//! log_level = "info"
//! service_name = "arm-sim-01"
//!
//! [scheduler]
//! tick_rate_hz = 30
//! command_queue_capacity = 64
//! settle = "snap"
//!
//! [limits.base]
//! max_velocity = 0.5
//! acceleration = 1.0
//! ```

use crate::consts::{
    DEFAULT_COMMAND_QUEUE_CAPACITY, DEFAULT_SERVICE_NAME, DEFAULT_TICK_RATE_HZ,
    MAX_COMMAND_QUEUE_CAPACITY, MAX_TICK_RATE_HZ, MIN_TICK_RATE_HZ,
};
use crate::geometry::ArmGeometry;
use crate::limits::{MotionLimits, SettlePolicy};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

/// Error type for configuration loading operations.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    /// Configuration file not found at specified path.
    #[error("Configuration file not found")]
    FileNotFound,

    /// TOML parsing failed.
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Semantic validation failed.
    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

/// Log level for application logging.
///
/// Uses lowercase serde values for TOML compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Most verbose, per-tick axis detail.
    Trace,
    /// Plans and command application.
    Debug,
    /// Lifecycle events.
    #[default]
    Info,
    /// Rejected commands and tick overruns.
    Warn,
    /// Serious problems only.
    Error,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Common configuration fields shared across all arm simulator binaries.
///
/// # TOML Example
///
/// ```toml
/// [shared]
/// log_level = "debug"
/// service_name = "arm-sim-01"
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SharedConfig {
    /// Logging verbosity level.
    #[serde(default)]
    pub log_level: LogLevel,

    /// Application instance identifier.
    pub service_name: String,
}

impl Default for SharedConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::default(),
            service_name: DEFAULT_SERVICE_NAME.to_string(),
        }
    }
}

impl SharedConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `service_name` is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_name.is_empty() {
            return Err(ConfigError::ValidationError(
                "service_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_tick_rate_hz() -> u32 {
    DEFAULT_TICK_RATE_HZ
}

fn default_command_queue_capacity() -> usize {
    DEFAULT_COMMAND_QUEUE_CAPACITY
}

/// Scheduler settings.
///
/// # TOML Example
///
/// ```toml
/// [scheduler]
/// tick_rate_hz = 60
/// command_queue_capacity = 128
/// settle = "residual"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Fixed tick rate. Units: Hz
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Capacity of the bounded inbound command queue.
    #[serde(default = "default_command_queue_capacity")]
    pub command_queue_capacity: usize,

    /// Settle behavior applied to every axis.
    #[serde(default)]
    pub settle: SettlePolicy,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_rate_hz: DEFAULT_TICK_RATE_HZ,
            command_queue_capacity: DEFAULT_COMMAND_QUEUE_CAPACITY,
            settle: SettlePolicy::default(),
        }
    }
}

impl SchedulerConfig {
    /// Duration of one tick.
    ///
    /// A zero rate (rejected by `validate`) is treated as the minimum rate.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate_hz.max(MIN_TICK_RATE_HZ)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if:
    /// - `tick_rate_hz` is outside `[MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ]`
    /// - `command_queue_capacity` is zero or above `MAX_COMMAND_QUEUE_CAPACITY`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_TICK_RATE_HZ..=MAX_TICK_RATE_HZ).contains(&self.tick_rate_hz) {
            return Err(ConfigError::ValidationError(format!(
                "scheduler.tick_rate_hz {} out of range [{}, {}]",
                self.tick_rate_hz, MIN_TICK_RATE_HZ, MAX_TICK_RATE_HZ
            )));
        }
        if self.command_queue_capacity == 0
            || self.command_queue_capacity > MAX_COMMAND_QUEUE_CAPACITY
        {
            return Err(ConfigError::ValidationError(format!(
                "scheduler.command_queue_capacity {} out of range [1, {}]",
                self.command_queue_capacity, MAX_COMMAND_QUEUE_CAPACITY
            )));
        }
        Ok(())
    }
}

/// Complete configuration document of the arm simulator.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmConfig {
    /// Logging and identity.
    pub shared: SharedConfig,

    /// Tick loop settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Link dimensions.
    #[serde(default)]
    pub geometry: ArmGeometry,

    /// Physical axis limits.
    #[serde(default)]
    pub limits: MotionLimits,
}

impl ArmConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.scheduler.validate()?;
        self.geometry.validate()?;
        self.limits.validate(self.scheduler.tick_period())?;
        Ok(())
    }
}

/// Trait for loading configuration from TOML files.
///
/// Blanket-implemented for every `DeserializeOwned` type.
///
/// # Contract
///
/// - Returns `ConfigError::FileNotFound` if the file does not exist
/// - Returns `ConfigError::ParseError` if TOML syntax is invalid
pub trait ConfigLoader: Sized + serde::de::DeserializeOwned {
    /// Load configuration from a TOML file.
    fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::FileNotFound
            } else {
                ConfigError::ParseError(e.to_string())
            }
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

impl<T: serde::de::DeserializeOwned> ConfigLoader for T {}

/// Load and validate an `ArmConfig` from a TOML file.
///
/// # Errors
///
/// Any `ConfigError` produced by loading or by `ArmConfig::validate`.
pub fn load_config(path: &Path) -> Result<ArmConfig, ConfigError> {
    debug!("Loading configuration from {:?}", path);
    let config = ArmConfig::load(path)?;
    config.validate()?;
    info!(
        "Loaded config '{}': tick_rate={}Hz, queue={}, settle={:?}",
        config.shared.service_name,
        config.scheduler.tick_rate_hz,
        config.scheduler.command_queue_capacity,
        config.scheduler.settle
    );
    Ok(config)
}
