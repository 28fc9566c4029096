//! JSON-lines command adapter.
//!
//! Reads one [`ArmCommand`] per line, rejects malformed or non-finite
//! input before it reaches the engine, and submits the rest without
//! blocking. Used by the binary to drive the scheduler from stdin.

use std::io::BufRead;

use arm_common::command::ArmCommand;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::scheduler::SchedulerHandle;

/// Counters of one adapter run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdapterStats {
    pub submitted: u64,
    /// Lines that did not parse or failed validation.
    pub malformed: u64,
    /// Commands dropped because the queue was full.
    pub dropped: u64,
}

/// Parse and validate one line.
pub fn parse_command(line: &str) -> Result<ArmCommand, String> {
    let command: ArmCommand = serde_json::from_str(line).map_err(|e| e.to_string())?;
    command.validate().map_err(|e| e.to_string())?;
    Ok(command)
}

/// Feed commands from `reader` until EOF, a read error, or scheduler
/// shutdown.
pub fn pump_commands<R: BufRead>(reader: R, handle: &SchedulerHandle) -> AdapterStats {
    let mut stats = AdapterStats::default();

    for line in reader.lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                warn!("Command input read failed: {}", e);
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if !handle.is_running() {
            break;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(e) => {
                stats.malformed += 1;
                warn!("Malformed command skipped: {}", e);
                continue;
            }
        };

        match handle.submit_command(command) {
            Ok(()) => {
                stats.submitted += 1;
                debug!(command = command.name(), "command submitted");
            }
            Err(SubmitError::QueueFull) => {
                stats.dropped += 1;
                warn!("Command queue full, dropped {}", command.name());
            }
            Err(SubmitError::Disconnected) => {
                warn!("Scheduler gone, stopping command input");
                break;
            }
        }
    }

    stats
}
