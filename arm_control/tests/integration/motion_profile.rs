//! Integration test: single-axis motion through the robot state.
//!
//! Validates: commands land on the right axis, axes settle exactly on their
//! targets, rotations take the short way round, and physical behavior does
//! not depend on the tick rate.

use std::f64::consts::PI;
use std::time::Duration;

use arm_common::command::ArmCommand;
use arm_common::geometry::ArmGeometry;
use arm_common::limits::{MotionLimits, SettlePolicy};
use arm_control::motion::AxisStatus;
use arm_control::state::{ChangedAxes, RobotState};

use super::{default_state, run_until_idle};

fn state_at(tick_rate_hz: u32, settle: SettlePolicy) -> RobotState {
    RobotState::new(
        ArmGeometry::default(),
        &MotionLimits::default(),
        Duration::from_secs(1) / tick_rate_hz,
        settle,
    )
}

#[test]
fn lift_settles_exactly_on_target() {
    let mut state = default_state();
    state.apply(&ArmCommand::Lift { y: 0.3 }).unwrap();
    assert_eq!(state.crane.lift.status(), AxisStatus::Moving);

    let first = state.tick();
    assert_eq!(first, ChangedAxes::LIFT);
    assert!(state.crane.lift.velocity() > 0.0);

    run_until_idle(&mut state);
    assert_eq!(state.crane.lift.position(), 0.3);
    assert_eq!(state.crane.lift.velocity(), 0.0);
    assert_eq!(state.crane.lift.status(), AxisStatus::Stationary);
}

#[test]
fn residual_settle_stays_within_cutoff() {
    let mut state = state_at(30, SettlePolicy::Residual);
    state.apply(&ArmCommand::OpenGripper { space: 0.05 }).unwrap();
    run_until_idle(&mut state);

    let cutoff = state.gripper.limits().cutoff;
    assert!((state.gripper.position() - 0.05).abs() <= cutoff);
}

#[test]
fn crane_takes_short_way_round() {
    let mut state = default_state();
    state.apply(&ArmCommand::RotateCrane { phi: 1.5 * PI }).unwrap();

    state.tick();
    // 3π/2 is a quarter turn clockwise away
    assert!(state.crane.rotation.angle() < 0.0);

    run_until_idle(&mut state);
    assert!((state.crane.rotation.normalized() - 1.5 * PI).abs() < 1e-9);
    assert!((state.crane.rotation.angle() + 0.5 * PI).abs() < 1e-9);
}

#[test]
fn new_target_replaces_old_one() {
    let mut state = default_state();
    state.apply(&ArmCommand::RotateElbow { phi: 1.0 }).unwrap();
    for _ in 0..5 {
        state.tick();
    }
    state.apply(&ArmCommand::RotateElbow { phi: -0.5 }).unwrap();
    assert_eq!(state.elbow.target(), Some(-0.5));

    run_until_idle(&mut state);
    assert!((state.elbow.normalized() - (2.0 * PI - 0.5)).abs() < 1e-9);
}

#[test]
fn move_crane_drives_both_crane_axes() {
    let mut state = default_state();
    state
        .apply(&ArmCommand::MoveCrane { y: 0.2, phi: 0.4 })
        .unwrap();
    let changed = state.tick();
    assert!(changed.contains(ChangedAxes::LIFT | ChangedAxes::CRANE_ROTATION));
    assert!(!changed.contains(ChangedAxes::BASE));
}

#[test]
fn stop_halts_everything_in_place() {
    let mut state = default_state();
    state
        .apply(&ArmCommand::Move {
            x: 1.0,
            z: 1.0,
            keep_end_effector_still: false,
        })
        .unwrap();
    state.apply(&ArmCommand::RotateWrist { phi: 2.0 }).unwrap();
    for _ in 0..10 {
        state.tick();
    }
    let before = state.snapshot();

    state.apply(&ArmCommand::Stop).unwrap();
    assert!(!state.is_moving());
    assert!(state.tick().is_empty());
    assert_eq!(state.snapshot(), before);
}

#[test]
fn walk_reaches_destination_at_every_tick_rate() {
    for rate in [30, 60, 120] {
        let mut state = state_at(rate, SettlePolicy::Snap);
        state
            .apply(&ArmCommand::Move {
                x: 0.8,
                z: -0.3,
                keep_end_effector_still: false,
            })
            .unwrap();
        run_until_idle(&mut state);
        let base = state.base.position();
        assert_eq!((base.x, base.z), (0.8, -0.3), "tick rate {rate}");
    }
}

#[test]
fn settle_time_independent_of_tick_rate() {
    let seconds = |rate: u32| {
        let mut state = state_at(rate, SettlePolicy::Snap);
        state.apply(&ArmCommand::Lift { y: 0.3 }).unwrap();
        run_until_idle(&mut state) as f64 / f64::from(rate)
    };

    let slow = seconds(30);
    let fast = seconds(60);
    // 0.3 m at 0.1 m/s after a 0.5 s ramp
    assert!((slow - 3.25).abs() < 0.15, "30 Hz took {slow}s");
    assert!((fast - slow).abs() < 0.1, "30 Hz {slow}s vs 60 Hz {fast}s");
}
