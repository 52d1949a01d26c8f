//! Pose, point, and velocity types for dead reckoning.

use serde::{Deserialize, Serialize};

/// A 2D point in the robot's linear unit (whatever unit the wheel
/// diameters were calibrated in).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    /// X coordinate
    pub x: f32,
    /// Y coordinate
    pub y: f32,
}

impl Point2D {
    /// Create a new point.
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Squared distance to another point (avoids sqrt).
    #[inline]
    pub fn distance_squared(&self, other: &Point2D) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point2D) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

impl Default for Point2D {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0 }
    }
}

/// Robot pose in 2D space.
///
/// Position (x, y) in the calibration's linear unit and heading (theta) in
/// radians, normalized to [-π, π).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose2D {
    /// X position
    pub x: f32,
    /// Y position
    pub y: f32,
    /// Heading in radians, normalized to [-π, π)
    pub theta: f32,
}

impl Pose2D {
    /// Create a new pose with theta normalized to [-π, π).
    #[inline]
    pub fn new(x: f32, y: f32, theta: f32) -> Self {
        Self {
            x,
            y,
            theta: crate::math::normalize_angle(theta),
        }
    }

    /// Identity pose at origin with zero heading.
    #[inline]
    pub fn identity() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }

    /// Position component of the pose.
    #[inline]
    pub fn position(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

impl Default for Pose2D {
    fn default() -> Self {
        Self::identity()
    }
}

/// Measured per-wheel linear velocities, in distance units per second.
///
/// Signed: negative values mean the wheel is rolling backward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelVelocities {
    /// Left wheel velocity
    pub left: f32,
    /// Right wheel velocity
    pub right: f32,
}

impl WheelVelocities {
    /// Create new wheel velocities
    pub fn new(left: f32, right: f32) -> Self {
        Self { left, right }
    }

    /// Zero velocity
    pub fn zero() -> Self {
        Self {
            left: 0.0,
            right: 0.0,
        }
    }

    /// Velocity of the robot center: the signed average of both wheels.
    /// Negative when reversing.
    #[inline]
    pub fn linear(&self) -> f32 {
        (self.left + self.right) / 2.0
    }
}

impl Default for WheelVelocities {
    fn default() -> Self {
        Self::zero()
    }
}
