//! Integration test: base move that keeps the end effector still.
//!
//! Validates: the base orbits the wrist without moving it, then walks to
//! the destination while the arm re-forms around the starting wrist point.

use arm_common::command::ArmCommand;
use arm_common::config::ArmConfig;
use arm_common::geometry::{ArmGeometry, LinkDimensions};
use arm_control::error::PlanError;
use arm_control::kinematics::{Point2, planar_distance};
use arm_control::motion::BaseMode;
use arm_control::state::{ChangedAxes, RobotState};

use super::{MAX_TICKS, default_state, run_until_idle};

fn keep_still(x: f64, z: f64) -> ArmCommand {
    ArmCommand::Move {
        x,
        z,
        keep_end_effector_still: true,
    }
}

#[test]
fn wrist_stays_put_through_pivot_and_extend() {
    let mut state = default_state();
    let wrist = state.pose().wrist;
    // default arm fully extended along +z
    assert!(planar_distance(wrist, Point2::new(0.0, 1.1)) < 1e-9);

    state.apply(&keep_still(0.5, 1.1)).unwrap();
    assert!(matches!(state.base.mode(), BaseMode::PivotingAbout { .. }));

    let mut pivot_ticks = 0;
    let mut ticks = 0;
    while state.is_moving() {
        let changed = state.tick();
        ticks += 1;
        assert!(ticks < MAX_TICKS, "maneuver did not finish");

        if let BaseMode::PivotingAbout { .. } = state.base.mode() {
            pivot_ticks += 1;
            assert_eq!(changed, ChangedAxes::BASE | ChangedAxes::CRANE_ROTATION);
            let drift = planar_distance(state.pose().wrist, wrist);
            assert!(drift < 1e-9, "wrist drifted {drift} during pivot");
        }
    }

    assert!(pivot_ticks > 0);
    let base = state.base.position();
    assert_eq!((base.x, base.z), (0.5, 1.1));
    assert!(planar_distance(state.pose().wrist, wrist) < 1e-6);
}

#[test]
fn orbit_keeps_radius() {
    let mut state = default_state();
    let wrist = state.pose().wrist;
    state.apply(&keep_still(-0.3, 0.6)).unwrap();

    for _ in 0..20 {
        state.tick();
        if !matches!(state.base.mode(), BaseMode::PivotingAbout { .. }) {
            break;
        }
        let radius = planar_distance(state.base.position(), wrist);
        assert!((radius - 1.1).abs() < 1e-9);
    }
}

#[test]
fn pivot_freezes_crane_and_elbow_targets() {
    let mut state = default_state();
    state.apply(&ArmCommand::RotateElbow { phi: 0.8 }).unwrap();
    for _ in 0..3 {
        state.tick();
    }
    state.apply(&keep_still(0.2, 0.5)).unwrap();

    assert!(!state.elbow.is_moving());
    assert!(!state.crane.rotation.is_moving());
    assert!(state.base.is_moving());
}

#[test]
fn destination_out_of_reach_rejected() {
    let mut state = default_state();
    let err = state.apply(&keep_still(4.0, 4.0)).unwrap_err();
    assert!(matches!(err, PlanError::InvalidGeometry { .. }));
    assert_eq!(state.base.mode(), BaseMode::Idle);
}

#[test]
fn folded_arm_pivots_in_place_and_extends() {
    // upper reach 0.2 + 0.2 / 2, lower reach 0.3
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
        .apply(&ArmCommand::RotateElbow {
            phi: std::f64::consts::PI,
        })
        .unwrap();
    run_until_idle(&mut state);
    let wrist = state.pose().wrist;
    assert!(planar_distance(wrist, state.base.position()) < 1e-9);

    state.apply(&keep_still(0.3, 0.3)).unwrap();
    run_until_idle(&mut state);

    let base = state.base.position();
    assert_eq!((base.x, base.z), (0.3, 0.3));
    assert!(planar_distance(state.pose().wrist, wrist) < 1e-6);
}
