//! Displacement models: how per-update wheel travel becomes pose deltas.

use serde::{Deserialize, Serialize};

/// Below this heading change (radians) per update, the arc model treats
/// the motion as straight to avoid dividing by a near-zero curvature.
const STRAIGHT_THRESHOLD: f32 = 1e-6;

/// Strategy for converting one update's wheel travel into a world-frame
/// position delta.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DisplacementModel {
    /// Treat the motion as a straight chord along the entry heading.
    ///
    /// Cheap and accurate for small per-update heading changes.
    #[default]
    StraightLine,
    /// Integrate along the constant-curvature arc the two wheels trace.
    ///
    /// Exact for constant wheel speeds; preferable when updates are
    /// infrequent enough that the robot turns noticeably between them.
    Arc,
}

impl DisplacementModel {
    /// World-frame position delta `(dx, dy)` for one update.
    ///
    /// `heading` is the pose heading at the start of the update, in
    /// radians. `delta_left` and `delta_right` are the signed distances
    /// each wheel rolled, and `track_width` the wheel separation, all in
    /// the same linear unit.
    pub fn displacement(
        &self,
        heading: f32,
        delta_left: f32,
        delta_right: f32,
        track_width: f32,
    ) -> (f32, f32) {
        match self {
            DisplacementModel::StraightLine => {
                let distance = (delta_left + delta_right) / 2.0;
                (distance * heading.cos(), distance * heading.sin())
            }
            DisplacementModel::Arc => {
                let delta_theta = (delta_right - delta_left) / track_width;
                if delta_theta.abs() < STRAIGHT_THRESHOLD {
                    // Straight motion: the arc radius diverges
                    let distance = (delta_left + delta_right) / 2.0;
                    return (distance * heading.cos(), distance * heading.sin());
                }

                let radius = (delta_left + delta_right) / (2.0 * delta_theta);
                let local_x = radius * delta_theta.sin();
                let local_y = radius * (1.0 - delta_theta.cos());

                // Rotate the local chord into the world frame
                (
                    local_x * heading.cos() - local_y * heading.sin(),
                    local_x * heading.sin() + local_y * heading.cos(),
                )
            }
        }
    }
}
