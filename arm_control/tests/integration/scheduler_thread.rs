//! Integration test: scheduler running on its own thread.
//!
//! Validates: commands submitted from another thread are applied, snapshots
//! reach the publisher and the handle, planning errors come back through
//! the outcome channel, shutdown returns the scheduler with its stats, and
//! the loop ends by itself once input is exhausted and the robot is idle.

use std::io::Cursor;
use std::sync::mpsc::Receiver;
use std::time::{Duration, Instant};

use arm_common::command::ArmCommand;
use arm_common::config::{ArmConfig, load_config};
use arm_common::snapshot::RobotSnapshot;
use arm_control::adapter::pump_commands;
use arm_control::error::PlanError;
use arm_control::publisher::{ChannelPublisher, NullPublisher};
use arm_control::scheduler::Scheduler;
use tempfile::TempDir;

const TIMEOUT: Duration = Duration::from_secs(10);

fn fast_config() -> ArmConfig {
    let mut config = ArmConfig::default();
    config.scheduler.tick_rate_hz = 200;
    config
}

/// Wait for a published snapshot matching `done`.
fn wait_for(
    snapshots: &Receiver<RobotSnapshot>,
    done: impl Fn(&RobotSnapshot) -> bool,
) -> RobotSnapshot {
    let deadline = Instant::now() + TIMEOUT;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let snapshot = snapshots
            .recv_timeout(remaining)
            .expect("no matching snapshot before timeout");
        if done(&snapshot) {
            return snapshot;
        }
    }
}

#[test]
fn commands_flow_through_running_scheduler() {
    let (publisher, snapshots) = ChannelPublisher::new();
    let (scheduler, handle) = Scheduler::from_config(&fast_config(), Box::new(publisher)).unwrap();
    let thread = scheduler.spawn().unwrap();

    let outcome = handle
        .submit_command_with_outcome(ArmCommand::RotateElbow { phi: 0.5 })
        .unwrap();
    assert_eq!(outcome.recv_timeout(TIMEOUT).unwrap(), Ok(()));

    let settled = wait_for(&snapshots, |s| (s.elbow.phi - 0.5).abs() < 1e-9);
    assert_eq!(handle.snapshot(), settled);

    let outcome = handle
        .submit_command_with_outcome(ArmCommand::Move {
            x: 5.0,
            z: 0.0,
            keep_end_effector_still: true,
        })
        .unwrap();
    let result = outcome.recv_timeout(TIMEOUT).unwrap();
    assert!(matches!(result, Err(PlanError::InvalidGeometry { .. })));

    // idle robot: only an explicit request publishes
    while snapshots.try_recv().is_ok() {}
    handle.submit_command(ArmCommand::GetSnapshot).unwrap();
    let on_demand = snapshots.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(on_demand, settled);

    handle.shutdown();
    assert!(!handle.is_running());
    let scheduler = thread.join().unwrap();
    assert!(scheduler.stats().tick_count > 0);
    assert_eq!(scheduler.stats().rejected_commands, 1);
    assert_eq!(scheduler.state().snapshot(), settled);
}

#[test]
fn request_snapshot_publishes_when_idle() {
    let (publisher, snapshots) = ChannelPublisher::new();
    let (scheduler, handle) = Scheduler::from_config(&fast_config(), Box::new(publisher)).unwrap();
    let thread = scheduler.spawn().unwrap();

    handle.request_snapshot();
    let snapshot = snapshots.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(snapshot, RobotSnapshot::default());

    handle.shutdown();
    thread.join().unwrap();
}

#[test]
fn clearing_running_flag_stops_loop() {
    let (scheduler, handle) = Scheduler::from_config(&fast_config(), Box::new(NullPublisher)).unwrap();
    let thread = scheduler.spawn().unwrap();

    handle
        .running_flag()
        .store(false, std::sync::atomic::Ordering::SeqCst);
    thread.join().unwrap();
    assert!(!handle.is_running());
}

#[test]
fn finishes_after_input_ends_and_robot_settles() {
    let (scheduler, handle) = Scheduler::from_config(&fast_config(), Box::new(NullPublisher)).unwrap();
    let thread = scheduler.spawn().unwrap();

    let input = "{\"type\":\"lift\",\"y\":0.05}\n{\"type\":\"rotate_wrist\",\"phi\":0.4}\n";
    let stats = pump_commands(Cursor::new(input), &handle);
    assert_eq!(stats.submitted, 2);
    handle.finish_when_idle();

    // join returns only if the loop stopped on its own
    let scheduler = thread.join().unwrap();
    assert!(!handle.is_running());
    assert!(!scheduler.state().is_moving());
    assert_eq!(scheduler.state().crane.lift.position(), 0.05);
    assert!((scheduler.state().wrist.angle() - 0.4).abs() < 1e-9);
}

#[test]
fn scheduler_from_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("arm.toml");
    std::fs::write(
        &path,
        r#"
[shared]
service_name = "arm-test"

[scheduler]
tick_rate_hz = 100
command_queue_capacity = 4

[limits.lift]
max_velocity = 1.0
acceleration = 10.0
"#,
    )
    .unwrap();

    let config = load_config(&path).unwrap();
    let (mut scheduler, handle) = Scheduler::from_config(&config, Box::new(NullPublisher)).unwrap();
    assert_eq!(scheduler.tick_period(), Duration::from_millis(10));

    handle.submit_command(ArmCommand::Lift { y: 0.05 }).unwrap();
    let mut ticks = 0;
    loop {
        let report = scheduler.step();
        ticks += 1;
        if report.changed.is_empty() {
            break;
        }
        assert!(ticks < 1_000);
    }
    assert_eq!(handle.snapshot().crane.y, 0.05);
}
