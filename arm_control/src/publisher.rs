//! Snapshot publishers.
//!
//! The scheduler hands every snapshot it decides to publish to one
//! [`SnapshotPublisher`]. Transports plug in here; the engine itself only
//! knows the trait.

use std::io::Write;
use std::sync::mpsc;

use arm_common::snapshot::RobotSnapshot;

use crate::error::PublishError;

/// Consumer of published snapshots.
///
/// Called from the scheduler thread once per publishing tick, so
/// implementations must not block for long.
pub trait SnapshotPublisher: Send {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Deliver one snapshot.
    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), PublishError>;
}

/// Writes one JSON object per line and flushes after each.
pub struct JsonLinesPublisher<W: Write + Send> {
    writer: W,
}

impl<W: Write + Send> JsonLinesPublisher<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write + Send> SnapshotPublisher for JsonLinesPublisher<W> {
    fn name(&self) -> &'static str {
        "json-lines"
    }

    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), PublishError> {
        serde_json::to_writer(&mut self.writer, snapshot)
            .map_err(|e| PublishError::Serialize(e.to_string()))?;
        self.writer
            .write_all(b"\n")
            .and_then(|()| self.writer.flush())
            .map_err(|e| PublishError::Io(e.to_string()))
    }
}

/// Forwards snapshots into an mpsc channel.
pub struct ChannelPublisher {
    sender: mpsc::Sender<RobotSnapshot>,
}

impl ChannelPublisher {
    /// Publisher plus the receiving end.
    pub fn new() -> (Self, mpsc::Receiver<RobotSnapshot>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl SnapshotPublisher for ChannelPublisher {
    fn name(&self) -> &'static str {
        "channel"
    }

    fn publish(&mut self, snapshot: &RobotSnapshot) -> Result<(), PublishError> {
        self.sender
            .send(*snapshot)
            .map_err(|_| PublishError::Closed)
    }
}

/// Drops every snapshot. Observers poll `SchedulerHandle::snapshot` instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPublisher;

impl SnapshotPublisher for NullPublisher {
    fn name(&self) -> &'static str {
        "null"
    }

    fn publish(&mut self, _snapshot: &RobotSnapshot) -> Result<(), PublishError> {
        Ok(())
    }
}
