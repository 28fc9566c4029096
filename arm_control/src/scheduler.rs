//! Fixed-rate scheduler and its thread-safe handle.
//!
//! The [`Scheduler`] is the only owner of the [`RobotState`]. Each tick it:
//!
//! 1. drains pending commands in arrival order and applies them,
//! 2. advances every axis exactly once,
//! 3. publishes a snapshot if anything changed or one was requested.
//!
//! Producers talk to it through a [`SchedulerHandle`]: a non-blocking
//! submit into a bounded queue, a read-only view of the latest snapshot,
//! an on-demand snapshot request, and shutdown (immediate, or once the
//! queue is empty and the robot has settled).
//!
//! # Usage
//!
//! ```rust,no_run
//! use arm_common::command::ArmCommand;
//! use arm_common::config::ArmConfig;
//! use arm_control::publisher::NullPublisher;
//! use arm_control::scheduler::Scheduler;
//!
//! let config = ArmConfig::default();
//! let (scheduler, handle) = Scheduler::from_config(&config, Box::new(NullPublisher))?;
//! let thread = scheduler.spawn()?;
//!
//! handle.submit_command(ArmCommand::RotateElbow { phi: 0.5 })?;
//! // ...
//! handle.shutdown();
//! let _ = thread.join();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use arm_common::command::ArmCommand;
use arm_common::config::{ArmConfig, SchedulerConfig};
use arm_common::snapshot::RobotSnapshot;
use static_assertions::assert_impl_all;
use tracing::{debug, info, warn};

use crate::error::{PlanError, SchedulerError, SubmitError};
use crate::publisher::SnapshotPublisher;
use crate::state::{ChangedAxes, RobotState};

/// Receiver of one command's planning result.
pub type CommandOutcome = Receiver<Result<(), PlanError>>;

/// A queued command plus, optionally, where to report its result.
struct Envelope {
    command: ArmCommand,
    outcome: Option<mpsc::Sender<Result<(), PlanError>>>,
}

/// State shared between the scheduler and its handles.
struct Shared {
    latest: RwLock<RobotSnapshot>,
    snapshot_requested: AtomicBool,
    finish_requested: AtomicBool,
}

impl Shared {
    fn store(&self, snapshot: RobotSnapshot) {
        // a panicking reader cannot corrupt a Copy value
        match self.latest.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    fn load(&self) -> RobotSnapshot {
        match self.latest.read() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

// ─── Handle ─────────────────────────────────────────────────────────

/// Thread-safe access point for command producers and observers.
#[derive(Clone)]
pub struct SchedulerHandle {
    sender: SyncSender<Envelope>,
    shared: Arc<Shared>,
    running: Arc<AtomicBool>,
}

impl SchedulerHandle {
    /// Enqueue a command without blocking.
    ///
    /// # Errors
    ///
    /// - `SubmitError::QueueFull` if the bounded queue has no room
    /// - `SubmitError::Disconnected` if the scheduler is gone
    pub fn submit_command(&self, command: ArmCommand) -> Result<(), SubmitError> {
        self.enqueue(Envelope {
            command,
            outcome: None,
        })
    }

    /// Enqueue a command and get a receiver for its planning result.
    ///
    /// The receiver yields once, when the command is applied at the start
    /// of the next tick. This is how an unreachable target reaches the
    /// caller.
    pub fn submit_command_with_outcome(
        &self,
        command: ArmCommand,
    ) -> Result<CommandOutcome, SubmitError> {
        let (tx, rx) = mpsc::channel();
        self.enqueue(Envelope {
            command,
            outcome: Some(tx),
        })?;
        Ok(rx)
    }

    fn enqueue(&self, envelope: Envelope) -> Result<(), SubmitError> {
        self.sender.try_send(envelope).map_err(|e| match e {
            TrySendError::Full(_) => SubmitError::QueueFull,
            TrySendError::Disconnected(_) => SubmitError::Disconnected,
        })
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> RobotSnapshot {
        self.shared.load()
    }

    /// Publish a snapshot on the next tick even if nothing moves.
    pub fn request_snapshot(&self) {
        self.shared.snapshot_requested.store(true, Ordering::Release);
    }

    /// Stop the tick loop after the current tick.
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop the tick loop once every command submitted before this call has
    /// been applied and no axis is moving.
    ///
    /// For producers that have run out of input.
    pub fn finish_when_idle(&self) {
        self.shared.finish_requested.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Running flag for signal handlers.
    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }
}

// ─── Statistics ─────────────────────────────────────────────────────

/// Timing statistics of the tick loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Ticks executed.
    pub tick_count: u64,
    /// Ticks whose work exceeded the tick period.
    pub overruns: u64,
    /// Longest tick. Units: µs
    pub max_tick_time_us: u64,
    /// Sum of tick times. Units: µs
    pub total_tick_time_us: u64,
    /// Snapshots handed to the publisher.
    pub published: u64,
    /// Commands rejected by the planner.
    pub rejected_commands: u64,
}

impl TickStats {
    /// Average tick time in µs (0 before the first tick).
    pub fn avg_tick_time_us(&self) -> u64 {
        self.total_tick_time_us
            .checked_div(self.tick_count)
            .unwrap_or(0)
    }
}

/// Outcome of one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Axes that changed.
    pub changed: ChangedAxes,
    /// Commands applied successfully.
    pub applied: usize,
    /// Commands rejected by the planner.
    pub rejected: usize,
    /// Whether a snapshot was published.
    pub published: bool,
}

// ─── Scheduler ──────────────────────────────────────────────────────

/// Single owner of the robot state, ticking at a fixed rate.
pub struct Scheduler {
    state: RobotState,
    commands: Receiver<Envelope>,
    queue_capacity: usize,
    publisher: Box<dyn SnapshotPublisher>,
    shared: Arc<Shared>,
    running: Arc<AtomicBool>,
    tick_period: Duration,
    stats: TickStats,
}

assert_impl_all!(Scheduler: Send);
assert_impl_all!(SchedulerHandle: Send, Sync, Clone);
assert_impl_all!(RobotSnapshot: Send, Sync, Copy);

impl Scheduler {
    /// Create a scheduler around an existing state.
    pub fn new(
        state: RobotState,
        config: &SchedulerConfig,
        publisher: Box<dyn SnapshotPublisher>,
    ) -> (Self, SchedulerHandle) {
        let (sender, commands) = mpsc::sync_channel(config.command_queue_capacity);
        let shared = Arc::new(Shared {
            latest: RwLock::new(state.snapshot()),
            snapshot_requested: AtomicBool::new(false),
            finish_requested: AtomicBool::new(false),
        });
        let running = Arc::new(AtomicBool::new(true));

        info!(
            "Scheduler created: tick={}us, queue={}, publisher={}",
            config.tick_period().as_micros(),
            config.command_queue_capacity,
            publisher.name()
        );

        let handle = SchedulerHandle {
            sender,
            shared: Arc::clone(&shared),
            running: Arc::clone(&running),
        };
        let scheduler = Self {
            state,
            commands,
            queue_capacity: config.command_queue_capacity,
            publisher,
            shared,
            running,
            tick_period: config.tick_period(),
            stats: TickStats::default(),
        };
        (scheduler, handle)
    }

    /// Validate `config`, build the robot state and the scheduler.
    ///
    /// # Errors
    ///
    /// `SchedulerError::Config` if validation fails.
    pub fn from_config(
        config: &ArmConfig,
        publisher: Box<dyn SnapshotPublisher>,
    ) -> Result<(Self, SchedulerHandle), SchedulerError> {
        config.validate()?;
        let state = RobotState::from_config(config);
        Ok(Self::new(state, &config.scheduler, publisher))
    }

    pub fn state(&self) -> &RobotState {
        &self.state
    }

    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    pub fn tick_period(&self) -> Duration {
        self.tick_period
    }

    /// Execute one tick without sleeping.
    pub fn step(&mut self) -> TickReport {
        let mut report = TickReport::default();
        let mut publish = self.shared.snapshot_requested.swap(false, Ordering::AcqRel);
        // read before the drain: commands submitted ahead of the request
        // are then already queued
        let finishing = self.shared.finish_requested.load(Ordering::SeqCst);
        let mut drained = false;

        // Bounded by the queue size: anything submitted during the drain
        // waits for the next tick.
        for _ in 0..self.queue_capacity {
            let Ok(envelope) = self.commands.try_recv() else {
                drained = true;
                break;
            };
            if envelope.command == ArmCommand::GetSnapshot {
                publish = true;
            }
            let result = self.state.apply(&envelope.command);
            match &result {
                Ok(()) => report.applied += 1,
                Err(e) => {
                    report.rejected += 1;
                    warn!("Rejected {}: {}", envelope.command.name(), e);
                }
            }
            if let Some(outcome) = envelope.outcome {
                // the submitter may have stopped listening
                let _ = outcome.send(result);
            }
        }

        report.changed = self.state.tick();

        if publish || !report.changed.is_empty() {
            let snapshot = self.state.snapshot();
            self.shared.store(snapshot);
            if let Err(e) = self.publisher.publish(&snapshot) {
                warn!("Publisher '{}' failed: {}", self.publisher.name(), e);
            }
            report.published = true;
            self.stats.published += 1;
        }

        self.stats.rejected_commands += report.rejected as u64;

        if finishing && drained && !self.state.is_moving() {
            info!("Input finished and robot idle, stopping scheduler");
            self.running.store(false, Ordering::SeqCst);
        }
        report
    }

    /// Run the tick loop until shutdown is requested.
    ///
    /// Sleeps for the rest of each tick period; this is the only point
    /// where the loop suspends.
    pub fn run(&mut self) {
        info!(
            "Starting scheduler loop (tick={}us)...",
            self.tick_period.as_micros()
        );
        let tick_period_us = self.tick_period.as_micros() as u64;
        // roughly every ten seconds
        let log_every = (10_000_000 / tick_period_us.max(1)).max(1);

        while self.running.load(Ordering::SeqCst) {
            let tick_start = Instant::now();

            let report = self.step();
            if !report.changed.is_empty() {
                tracing::trace!(changed = ?report.changed, "tick");
            }

            let tick_time_us = tick_start.elapsed().as_micros() as u64;
            self.stats.tick_count += 1;
            self.stats.total_tick_time_us += tick_time_us;
            if tick_time_us > self.stats.max_tick_time_us {
                self.stats.max_tick_time_us = tick_time_us;
            }

            if tick_time_us > tick_period_us {
                self.stats.overruns += 1;
                if self.stats.overruns <= 10 || self.stats.overruns % 1000 == 0 {
                    warn!(
                        "Tick overrun #{}: tick took {}us (target {}us)",
                        self.stats.overruns, tick_time_us, tick_period_us
                    );
                }
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.tick_period {
                thread::sleep(self.tick_period - elapsed);
            }

            if self.stats.tick_count % log_every == 0 {
                debug!(
                    "Scheduler: {} ticks, avg={}us, max={}us, overruns={}, published={}",
                    self.stats.tick_count,
                    self.stats.avg_tick_time_us(),
                    self.stats.max_tick_time_us,
                    self.stats.overruns,
                    self.stats.published
                );
            }
        }

        info!(
            "Scheduler loop stopped after {} ticks (overruns: {}, rejected commands: {})",
            self.stats.tick_count, self.stats.overruns, self.stats.rejected_commands
        );
    }

    /// Move the scheduler onto its own thread and run it there.
    ///
    /// The thread returns the scheduler when the loop stops, so the final
    /// state and statistics can be inspected.
    pub fn spawn(mut self) -> Result<JoinHandle<Scheduler>, SchedulerError> {
        thread::Builder::new()
            .name("arm-scheduler".to_string())
            .spawn(move || {
                self.run();
                self
            })
            .map_err(|e| SchedulerError::Spawn(e.to_string()))
    }
}
