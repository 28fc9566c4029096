//! Inverse kinematics and the pivot-then-extend maneuver.
//!
//! Every planner entry point takes `&RobotState` and returns a plan value.
//! The plan is written to the state only after every triangle has been
//! solved, so a rejected command never leaves a partial update behind.
//!
//! Triangle names used below:
//!
//! - `R_u`: upper arm reach (base center to elbow)
//! - `L`: lower arm reach (elbow to wrist)
//! - `r` / `d`: base to wrist distance
//!
//! ## Inverse kinematics
//!
//! The planar reach `r` is held fixed. The base is moved onto the circle of
//! radius `r` around the target, at the point closest to where it stands,
//! and the crane swings so the wrist lands on the target. Lift takes the
//! height.
//!
//! ## Pivot then extend
//!
//! 1. **Pivot**: the base orbits the wrist at radius `r` until it sits on the
//!    side of the wrist facing the destination. The crane turns with the
//!    orbit so the wrist stays put.
//! 2. **Extend**: the base walks straight to the destination while the crane
//!    and elbow re-form the triangle that puts the wrist back on the pivot
//!    point.

use std::f64::consts::PI;

use arm_common::prelude::{ArmGeometry, DEGENERATE_EPSILON, GEOMETRY_TOLERANCE};
use tracing::{debug, warn};

use crate::error::PlanError;
use crate::kinematics::{Point2, bearing, planar_distance, polar_offset};
use crate::motion::{BaseMode, normalize_angle, shortest_delta};
use crate::state::{ChangedAxes, RobotState};

/// Angle between sides `a` and `b` of a triangle whose third side is
/// `opposite` (law of cosines).
///
/// Arguments a hair outside `[-1, 1]` from rounding are clamped; anything
/// further out, or NaN, means the triangle does not exist.
pub fn triangle_angle(
    a: f64,
    b: f64,
    opposite: f64,
    operation: &'static str,
) -> Result<f64, PlanError> {
    let argument = (a * a + b * b - opposite * opposite) / (2.0 * a * b);
    if argument.is_nan() || argument.abs() > 1.0 + GEOMETRY_TOLERANCE {
        return Err(PlanError::InvalidGeometry {
            operation,
            argument,
        });
    }
    Ok(argument.clamp(-1.0, 1.0).acos())
}

/// Nudge `point` off `anchor` when the two coincide exactly, so a direction
/// between them is always defined.
fn separate(point: Point2, anchor: Point2) -> Point2 {
    if point == anchor {
        Point2::new(point.x, point.z + DEGENERATE_EPSILON)
    } else {
        point
    }
}

// ─── Inverse kinematics ─────────────────────────────────────────────

/// Targets that place the end effector at a requested point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InverseKinematicPlan {
    /// Crane lift target. Units: m
    pub lift: f64,
    /// Where the base walks to.
    pub base: Point2,
    /// Crane swing target. Units: rad
    pub crane: f64,
}

impl InverseKinematicPlan {
    /// Write all three targets.
    pub fn apply(&self, state: &mut RobotState) {
        state.crane.lift.set_target(self.lift);
        state.base.walk_to(self.base);
        state.crane.rotation.rotate(self.crane);
    }
}

/// Plan an end-effector move to `(x, y, z)` keeping the current reach.
///
/// # Errors
///
/// `PlanError::InvalidGeometry` when the current reach cannot be formed by
/// the arm triangle, including a wrist folded onto the base center. The
/// state is not modified.
pub fn plan_inverse_kinematic(
    state: &RobotState,
    x: f64,
    y: f64,
    z: f64,
) -> Result<InverseKinematicPlan, PlanError> {
    let geometry = state.geometry();
    let pose = state.pose();
    let reach = planar_distance(pose.wrist, pose.base);
    if reach < DEGENERATE_EPSILON {
        // no circle to keep the base on
        return Err(PlanError::InvalidGeometry {
            operation: "inverse_kinematic",
            argument: f64::NAN,
        });
    }

    let center = Point2::new(x, z);
    let away = separate(pose.base, center) - center;
    let base = center + away * (reach / away.length());

    let alpha = bearing(base, center);
    let mut beta = triangle_angle(
        reach,
        geometry.upper_arm_reach(),
        geometry.lower_arm_reach(),
        "inverse_kinematic",
    )?;
    // keep the elbow bent to the side it is already on
    if normalize_angle(state.elbow.angle()) < PI {
        beta = -beta;
    }

    let plan = InverseKinematicPlan {
        lift: y + geometry.hanging_height(),
        base,
        crane: alpha + beta,
    };
    debug!(
        reach,
        base_x = plan.base.x,
        base_z = plan.base.z,
        crane = plan.crane,
        lift = plan.lift,
        "inverse kinematic plan"
    );
    Ok(plan)
}

// ─── Pivot then extend ──────────────────────────────────────────────

/// Orbit parameters for the pivot phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PivotPlan {
    /// Wrist position the base orbits.
    pub center: Point2,
    /// Orbit radius (current reach). Units: m
    pub radius: f64,
    /// Bearing from the wrist at which the orbit ends. Units: rad
    pub bearing: f64,
    /// Final base position.
    pub destination: Point2,
}

impl PivotPlan {
    /// Stop the crane swing and elbow, then start orbiting.
    pub fn apply(&self, state: &mut RobotState) {
        state.crane.rotation.halt();
        state.elbow.halt();
        state
            .base
            .pivot_about(self.center, self.radius, self.bearing, self.destination);
    }
}

/// Plan a base move to `destination` that keeps the end effector still.
///
/// The extend triangle is solved here as well, so an unreachable
/// destination is rejected before anything moves.
///
/// A wrist folded back onto the base center gets an epsilon orbit, which
/// ends on the first tick.
///
/// # Errors
///
/// `PlanError::InvalidGeometry` when the arm cannot reach the wrist from
/// `destination`.
pub fn plan_pivot(state: &RobotState, destination: Point2) -> Result<PivotPlan, PlanError> {
    let pose = state.pose();
    let center = pose.wrist;
    let radius = planar_distance(separate(pose.base, center), center).max(DEGENERATE_EPSILON);

    let destination = separate(destination, center);
    plan_extend(state.geometry(), center, destination)?;

    let plan = PivotPlan {
        center,
        radius,
        bearing: bearing(center, destination),
        destination,
    };
    debug!(
        wrist_x = center.x,
        wrist_z = center.z,
        radius,
        bearing = plan.bearing,
        "pivot plan"
    );
    Ok(plan)
}

/// Targets for the extend phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtendPlan {
    pub destination: Point2,
    /// Crane swing target. Units: rad
    pub crane: f64,
    /// Elbow bend target in `[0, π]`. Units: rad
    pub elbow: f64,
}

impl ExtendPlan {
    pub fn apply(&self, state: &mut RobotState) {
        state.base.walk_to(self.destination);
        state.crane.rotation.rotate(self.crane);
        state.elbow.rotate(self.elbow);
    }
}

/// Solve the arm triangle that puts the wrist on `wrist` with the base
/// standing on `destination`.
pub fn plan_extend(
    geometry: &ArmGeometry,
    wrist: Point2,
    destination: Point2,
) -> Result<ExtendPlan, PlanError> {
    let upper = geometry.upper_arm_reach();
    let lower = geometry.lower_arm_reach();
    let distance = planar_distance(wrist, destination);

    let elbow = PI - triangle_angle(upper, lower, distance, "pivot_extend_elbow")?;
    let beta = triangle_angle(distance, upper, lower, "pivot_extend_crane")?;
    let alpha = bearing(destination, wrist);

    Ok(ExtendPlan {
        destination,
        crane: alpha - beta,
        elbow,
    })
}

/// Advance the pivot phase by one tick.
///
/// Called by [`RobotState::tick`] while the base is in
/// [`BaseMode::PivotingAbout`]. Never fails: if the extend triangle has
/// become unsolvable in the meantime the base is stopped and a warning is
/// logged.
pub(crate) fn pivot_step(state: &mut RobotState) -> ChangedAxes {
    let BaseMode::PivotingAbout {
        center,
        radius,
        bearing: end_bearing,
        destination,
    } = state.base.mode()
    else {
        return ChangedAxes::empty();
    };

    let position = state.base.position();
    let arc_end = polar_offset(center, radius, end_bearing);
    if planar_distance(position, arc_end) <= state.base.limits().cutoff {
        state.base.halt();
        match plan_extend(state.geometry(), center, destination) {
            Ok(plan) => {
                debug!(
                    crane = plan.crane,
                    elbow = plan.elbow,
                    "pivot complete, extending"
                );
                plan.apply(state);
            }
            Err(e) => warn!("Pivot extend aborted, base stopped: {}", e),
        }
        return ChangedAxes::BASE;
    }

    let speed = state.base.accelerate();
    let angle = bearing(center, position);
    // turn against the shortest delta; the linear speed doubles as the
    // angular rate proxy
    let omega = -shortest_delta(angle, end_bearing).signum() * speed / radius;

    state.base.set_position(polar_offset(center, radius, angle + omega));
    state.crane.rotation.turn_by(omega);
    ChangedAxes::BASE | ChangedAxes::CRANE_ROTATION
}
