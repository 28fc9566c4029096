//! Planar forward kinematics.
//!
//! Angles are measured from the +z axis and grow clockwise in the
//! horizontal plane, with the pairing `(sin φ, cos φ)`:
//!
//! ```text
//! elbow = base  + upper_arm_reach · (sin φc,        cos φc)
//! wrist = elbow + lower_arm_reach · (sin(φc + φe),  cos(φc + φe))
//! ```
//!
//! Height is independent of the planar chain: the end effector hangs
//! `hanging_height` below the crane lift position.

use std::ops::{Add, Mul, Sub};

use arm_common::geometry::ArmGeometry;

/// A point (or vector) in the horizontal x/z plane. Units: m
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub z: f64,
}

impl Point2 {
    pub const ORIGIN: Self = Self::new(0.0, 0.0);

    #[inline]
    pub const fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Unit vector pointing along `angle`.
    #[inline]
    pub fn from_angle(angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(sin, cos)
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        self.x.hypot(self.z)
    }
}

impl Add for Point2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.z + rhs.z)
    }
}

impl Sub for Point2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.z - rhs.z)
    }
}

impl Mul<f64> for Point2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.z * rhs)
    }
}

/// Planar distance between two points.
#[inline]
pub fn planar_distance(a: Point2, b: Point2) -> f64 {
    (a - b).length()
}

/// Direction from `from` to `to`: `atan2(dx, dz)`.
#[inline]
pub fn bearing(from: Point2, to: Point2) -> f64 {
    (to.x - from.x).atan2(to.z - from.z)
}

/// Point at `radius` from `origin` along `angle`.
#[inline]
pub fn polar_offset(origin: Point2, radius: f64, angle: f64) -> Point2 {
    origin + Point2::from_angle(angle) * radius
}

/// Joint positions computed from the current axis values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArmPose {
    pub base: Point2,
    pub elbow: Point2,
    pub wrist: Point2,
    /// End effector height. Units: m
    pub end_effector_y: f64,
}

impl ArmPose {
    /// End effector as `(x, y, z)`. The hand hangs straight below the wrist.
    pub fn end_effector(&self) -> [f64; 3] {
        [self.wrist.x, self.end_effector_y, self.wrist.z]
    }
}

/// Compute the arm pose. Pure.
pub fn forward_kinematics(
    geometry: &ArmGeometry,
    base: Point2,
    crane_angle: f64,
    elbow_angle: f64,
    lift: f64,
) -> ArmPose {
    let elbow = polar_offset(base, geometry.upper_arm_reach(), crane_angle);
    let wrist = polar_offset(elbow, geometry.lower_arm_reach(), crane_angle + elbow_angle);
    ArmPose {
        base,
        elbow,
        wrist,
        end_effector_y: lift - geometry.hanging_height(),
    }
}
