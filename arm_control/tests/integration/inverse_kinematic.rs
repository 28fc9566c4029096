//! Integration test: inverse kinematics end to end.
//!
//! Validates: an IK command followed by enough ticks puts the end effector
//! on the requested point, the base keeps its reach, and a rejected plan
//! leaves the robot untouched.

use std::f64::consts::PI;

use arm_common::command::ArmCommand;
use arm_common::config::ArmConfig;
use arm_common::geometry::{ArmGeometry, LinkDimensions};
use arm_control::error::PlanError;
use arm_control::kinematics::{Point2, planar_distance};
use arm_control::motion::RotationAxis;
use arm_control::state::RobotState;

use super::{default_state, run_until_idle};

/// Upper and lower reach both exactly 0.5 m.
fn equal_half_metre_links() -> ArmGeometry {
    ArmGeometry {
        body: LinkDimensions::new(0.2, 0.0, 0.0),
        upper_arm: LinkDimensions::new(0.05, 0.0, 0.5),
        lower_arm: LinkDimensions::new(0.05, 0.0, 0.5),
        hand: LinkDimensions::new(0.05, 0.0, 0.05),
        gripper: LinkDimensions::new(0.05, 0.0, 0.05),
    }
}

fn assert_end_effector_at(state: &RobotState, expected: [f64; 3]) {
    let actual = state.pose().end_effector();
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "end effector {actual:?}, expected {expected:?}");
    }
}

#[test]
fn end_effector_reaches_target() {
    let mut state = default_state();
    state
        .apply(&ArmCommand::InverseKinematic {
            x: 0.6,
            y: 0.2,
            z: 0.3,
        })
        .unwrap();
    run_until_idle(&mut state);

    assert_end_effector_at(&state, [0.6, 0.2, 0.3]);
}

#[test]
fn reach_is_preserved() {
    let mut state = default_state();
    state.apply(&ArmCommand::RotateElbow { phi: 1.2 }).unwrap();
    run_until_idle(&mut state);
    let pose = state.pose();
    let reach = planar_distance(pose.base, pose.wrist);

    state
        .apply(&ArmCommand::InverseKinematic {
            x: -0.4,
            y: 0.1,
            z: 0.9,
        })
        .unwrap();
    run_until_idle(&mut state);

    let pose = state.pose();
    assert!((planar_distance(pose.base, pose.wrist) - reach).abs() < 1e-6);
    assert_end_effector_at(&state, [-0.4, 0.1, 0.9]);
}

#[test]
fn successive_targets_chain() {
    let mut state = default_state();
    for target in [[0.6, 0.2, 0.3], [-1.0, 0.0, -0.5], [2.0, 0.35, 2.0]] {
        state
            .apply(&ArmCommand::InverseKinematic {
                x: target[0],
                y: target[1],
                z: target[2],
            })
            .unwrap();
        run_until_idle(&mut state);
        assert_end_effector_at(&state, target);
    }
}

#[test]
fn extended_equal_links_leave_base_in_place() {
    // upper reach 0.2 + 0.2 / 2 = 0.3, lower reach 0.3
    let geometry = ArmGeometry {
        body: LinkDimensions::new(0.2, 0.0, 0.2),
        upper_arm: LinkDimensions::new(0.05, 0.0, 0.2),
        lower_arm: LinkDimensions::new(0.05, 0.0, 0.3),
        hand: LinkDimensions::new(0.05, 0.0, 0.05),
        gripper: LinkDimensions::new(0.05, 0.0, 0.05),
    };
    let mut state = RobotState::from_config(&ArmConfig {
        geometry,
        ..ArmConfig::default()
    });

    state
        .apply(&ArmCommand::InverseKinematic {
            x: 0.6,
            y: 0.0,
            z: 0.0,
        })
        .unwrap();
    run_until_idle(&mut state);

    assert!(planar_distance(state.base.position(), Point2::ORIGIN) < 1e-9);
    assert!(state.elbow.angle().abs() < 1e-9);
    assert!((state.crane.rotation.normalized() - PI / 2.0).abs() < 1e-6);
    assert_end_effector_at(&state, [0.6, 0.0, 0.0]);
}

#[test]
fn unreachable_destination_leaves_state_unchanged() {
    let mut state = default_state();
    state.apply(&ArmCommand::RotateCrane { phi: 0.3 }).unwrap();
    state.tick();
    let before = state.clone();

    let err = state
        .apply(&ArmCommand::Move {
            x: 5.0,
            z: 0.0,
            keep_end_effector_still: true,
        })
        .unwrap_err();

    assert!(matches!(err, PlanError::InvalidGeometry { .. }));
    assert_eq!(state, before);
}

#[test]
fn folded_arm_inverse_kinematic_leaves_state_unchanged() {
    let mut state = RobotState::from_config(&ArmConfig {
        geometry: equal_half_metre_links(),
        ..ArmConfig::default()
    });
    state.elbow = RotationAxis::new(PI, *state.elbow.limits());
    state.apply(&ArmCommand::Lift { y: 0.2 }).unwrap();
    state.tick();
    let before = state.clone();

    let err = state
        .apply(&ArmCommand::InverseKinematic {
            x: 0.4,
            y: 0.1,
            z: 0.2,
        })
        .unwrap_err();

    assert!(matches!(
        err,
        PlanError::InvalidGeometry {
            operation: "inverse_kinematic",
            ..
        }
    ));
    assert_eq!(state, before);
}
