//! Angle arithmetic for planar dead reckoning.
//!
//! Heading state is kept in [-π, π) and every accumulation step passes
//! through [`normalize_angle`].

/// Normalize an angle to [-π, π) using the `atan2(sin θ, cos θ)` identity.
///
/// The identity is wraparound-safe for any finite input, including angles
/// that have accumulated many full turns, and is the same normalization the
/// heading-error computation relies on across the ±π seam.
///
/// # Example
/// ```
/// use chakra_odom::math::normalize_angle;
/// use std::f32::consts::PI;
///
/// assert!((normalize_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
/// assert!((normalize_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
/// assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
/// ```
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    angle.sin().atan2(angle.cos())
}
