//! Robot state aggregate.
//!
//! `RobotState` owns every axis of the robot plus its immutable geometry.
//! It is built once from the validated configuration and then mutated only
//! by the scheduler: command application at the start of a tick, then one
//! `tick()` advancing every axis exactly once.

use std::time::Duration;

use arm_common::command::ArmCommand;
use arm_common::config::ArmConfig;
use arm_common::geometry::ArmGeometry;
use arm_common::limits::{MotionLimits, SettlePolicy};
use arm_common::snapshot::{BasePose, CranePose, GripperPose, JointPose, RobotSnapshot};
use bitflags::bitflags;
use tracing::debug;

use crate::error::PlanError;
use crate::kinematics::{ArmPose, Point2, forward_kinematics};
use crate::motion::{BaseAxis, BaseMode, MotionAxis, RotationAxis};
use crate::planner;

bitflags! {
    /// Axes that changed during one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ChangedAxes: u8 {
        const BASE           = 0x01;
        const CRANE_ROTATION = 0x02;
        const LIFT           = 0x04;
        const ELBOW          = 0x08;
        const WRIST          = 0x10;
        const GRIPPER        = 0x20;
    }
}

/// Crane on top of the base: swing plus lift.
#[derive(Debug, Clone, PartialEq)]
pub struct Crane {
    pub rotation: RotationAxis,
    pub lift: MotionAxis,
}

/// Complete mutable state of the robot.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotState {
    pub base: BaseAxis,
    pub crane: Crane,
    pub elbow: RotationAxis,
    pub wrist: RotationAxis,
    pub gripper: MotionAxis,
    geometry: ArmGeometry,
}

impl RobotState {
    /// Robot at the origin with every axis at zero.
    ///
    /// `limits` are physical; they are converted to per-tick limits with
    /// `tick` here, once.
    pub fn new(
        geometry: ArmGeometry,
        limits: &MotionLimits,
        tick: Duration,
        settle: SettlePolicy,
    ) -> Self {
        Self {
            base: BaseAxis::new(Point2::ORIGIN, limits.base.per_tick(tick, settle)),
            crane: Crane {
                rotation: RotationAxis::new(0.0, limits.crane_rotation.per_tick(tick, settle)),
                lift: MotionAxis::new(0.0, limits.lift.per_tick(tick, settle)),
            },
            elbow: RotationAxis::new(0.0, limits.elbow.per_tick(tick, settle)),
            wrist: RotationAxis::new(0.0, limits.wrist.per_tick(tick, settle)),
            gripper: MotionAxis::new(0.0, limits.gripper.per_tick(tick, settle)),
            geometry,
        }
    }

    /// Build from an already validated configuration.
    pub fn from_config(config: &ArmConfig) -> Self {
        Self::new(
            config.geometry,
            &config.limits,
            config.scheduler.tick_period(),
            config.scheduler.settle,
        )
    }

    #[inline]
    pub const fn geometry(&self) -> &ArmGeometry {
        &self.geometry
    }

    /// Current joint positions.
    pub fn pose(&self) -> ArmPose {
        forward_kinematics(
            &self.geometry,
            self.base.position(),
            self.crane.rotation.angle(),
            self.elbow.angle(),
            self.crane.lift.position(),
        )
    }

    /// True while any axis still has somewhere to go.
    pub fn is_moving(&self) -> bool {
        self.base.is_moving()
            || self.crane.rotation.is_moving()
            || self.crane.lift.is_moving()
            || self.elbow.is_moving()
            || self.wrist.is_moving()
            || self.gripper.is_moving()
    }

    /// Apply one command.
    ///
    /// Planned commands are computed against the current state first and
    /// written only on success, so an error leaves the state untouched.
    /// `GetSnapshot` does not touch the axes; publication is up to the
    /// caller.
    pub fn apply(&mut self, command: &ArmCommand) -> Result<(), PlanError> {
        match *command {
            ArmCommand::Move {
                x,
                z,
                keep_end_effector_still,
            } => {
                let destination = Point2::new(x, z);
                if keep_end_effector_still {
                    planner::plan_pivot(self, destination)?.apply(self);
                } else {
                    self.base.walk_to(destination);
                }
            }
            ArmCommand::RotateCrane { phi } => self.crane.rotation.rotate(phi),
            ArmCommand::Lift { y } => self.crane.lift.set_target(y),
            ArmCommand::MoveCrane { y, phi } => {
                self.crane.lift.set_target(y);
                self.crane.rotation.rotate(phi);
            }
            ArmCommand::RotateElbow { phi } => self.elbow.rotate(phi),
            ArmCommand::RotateWrist { phi } => self.wrist.rotate(phi),
            ArmCommand::OpenGripper { space } => self.gripper.set_target(space),
            ArmCommand::InverseKinematic { x, y, z } => {
                planner::plan_inverse_kinematic(self, x, y, z)?.apply(self);
            }
            ArmCommand::Stop => self.halt(),
            ArmCommand::GetSnapshot => {}
        }
        debug!(command = command.name(), "command applied");
        Ok(())
    }

    /// Halt every axis in place.
    pub fn halt(&mut self) {
        self.base.halt();
        self.crane.rotation.halt();
        self.crane.lift.halt();
        self.elbow.halt();
        self.wrist.halt();
        self.gripper.halt();
    }

    /// Advance every axis by one tick.
    ///
    /// Total: always returns a definite set, never fails.
    pub fn tick(&mut self) -> ChangedAxes {
        let mut changed = ChangedAxes::empty();
        match self.base.mode() {
            BaseMode::Idle => {}
            BaseMode::WalkingTo(_) => changed.set(ChangedAxes::BASE, self.base.tick_walk()),
            // the orbit turns the crane along with the base
            BaseMode::PivotingAbout { .. } => changed |= planner::pivot_step(self),
        }

        if self.crane.rotation.tick() {
            changed |= ChangedAxes::CRANE_ROTATION;
        }
        if self.crane.lift.tick() {
            changed |= ChangedAxes::LIFT;
        }
        if self.elbow.tick() {
            changed |= ChangedAxes::ELBOW;
        }
        if self.wrist.tick() {
            changed |= ChangedAxes::WRIST;
        }
        if self.gripper.tick() {
            changed |= ChangedAxes::GRIPPER;
        }
        changed
    }

    /// Raw axis values for publication.
    pub fn snapshot(&self) -> RobotSnapshot {
        let base = self.base.position();
        RobotSnapshot {
            base: BasePose {
                x: base.x,
                z: base.z,
            },
            crane: CranePose {
                phi: self.crane.rotation.angle(),
                y: self.crane.lift.position(),
            },
            elbow: JointPose {
                phi: self.elbow.angle(),
            },
            wrist: JointPose {
                phi: self.wrist.angle(),
            },
            gripper: GripperPose {
                space: self.gripper.position(),
            },
        }
    }
}
