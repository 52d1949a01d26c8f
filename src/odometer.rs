//! Dead-reckoning odometer for differential drive robots.
//!
//! Integrates cumulative wheel encoder counts into a planar pose,
//! derives per-wheel and angular velocities from a millisecond clock,
//! and answers goal-relative queries (distance, bearing, heading error)
//! used by steering loops.

use std::f32::consts::PI;

use crate::config::{OdometerConfig, WheelConfig};
use crate::displacement::DisplacementModel;
use crate::error::Result;
use crate::hal::{MonotonicClock, WheelEncoder};
use crate::math::normalize_angle;
use crate::types::{Point2D, Pose2D, WheelVelocities};

/// One wheel: its encoder plus the calibration that turns ticks into
/// distance.
struct Wheel {
    encoder: Box<dyn WheelEncoder>,
    /// Linear distance per encoder tick, from diameter and resolution
    distance_per_tick: f32,
    /// +1 for a forward-mounted encoder, -1 for a mirrored one
    direction: i32,
    /// Corrected count at the previous update
    last_ticks: i32,
}

impl Wheel {
    fn new(side: &str, config: &WheelConfig, encoder: Box<dyn WheelEncoder>) -> Result<Self> {
        let counts_per_revolution = encoder.counts_per_revolution();
        if counts_per_revolution == 0 {
            return Err(crate::error::Error::InvalidCalibration(format!(
                "{} encoder reports zero counts per revolution",
                side
            )));
        }
        Ok(Self {
            encoder,
            distance_per_tick: PI * config.diameter / counts_per_revolution as f32,
            direction: if config.forward { 1 } else { -1 },
            last_ticks: 0,
        })
    }

    /// Current cumulative count with the mounting direction applied.
    fn read_corrected(&mut self) -> i32 {
        self.encoder.read().wrapping_mul(self.direction)
    }

    /// Zero the hardware counter and the stored baseline.
    fn rebase(&mut self) {
        self.encoder.write(0);
        self.last_ticks = 0;
    }
}

/// Dead-reckoning state machine over two wheel encoders and a clock.
///
/// Call [`update`](Odometer::update) once per control cycle; between
/// calls the encoders accumulate ticks on their own. All distances are
/// in the unit the wheel diameters were calibrated in, all angles in
/// radians.
pub struct Odometer {
    left: Wheel,
    right: Wheel,
    clock: Box<dyn MonotonicClock>,
    track_width: f32,
    model: DisplacementModel,
    rebase_threshold: i32,
    pose: Pose2D,
    goal: Point2D,
    velocity: WheelVelocities,
    angular_velocity: f32,
    last_update_ms: u32,
}

impl Odometer {
    /// Build an odometer from chassis calibration and the hardware
    /// capabilities it reads.
    ///
    /// Validates the calibration, derives per-tick distances, and
    /// re-bases both encoders so tracking starts from zero.
    pub fn new(
        config: &OdometerConfig,
        left_encoder: Box<dyn WheelEncoder>,
        right_encoder: Box<dyn WheelEncoder>,
        clock: Box<dyn MonotonicClock>,
    ) -> Result<Self> {
        config.validate()?;
        let left = Wheel::new("left wheel", &config.left_wheel, left_encoder)?;
        let right = Wheel::new("right wheel", &config.right_wheel, right_encoder)?;

        log::info!(
            "Odometer: calibrated left {:.6}/tick ({} cpr), right {:.6}/tick ({} cpr), track width {:.3}, model {:?}",
            left.distance_per_tick,
            left.encoder.counts_per_revolution(),
            right.distance_per_tick,
            right.encoder.counts_per_revolution(),
            config.track_width,
            config.displacement_model
        );

        let mut odometer = Self {
            left,
            right,
            clock,
            track_width: config.track_width,
            model: config.displacement_model,
            rebase_threshold: config.rebase_threshold,
            pose: Pose2D::identity(),
            goal: Point2D::default(),
            velocity: WheelVelocities::zero(),
            angular_velocity: 0.0,
            last_update_ms: 0,
        };
        odometer.reset();
        Ok(odometer)
    }

    /// Zero both encoder counters and restart the update clock.
    ///
    /// The pose, goal, and velocities are untouched: dead reckoning
    /// works on tick deltas, so re-basing loses no travel.
    pub fn reset(&mut self) {
        log::debug!("Odometer: re-basing encoder counters");
        self.left.rebase();
        self.right.rebase();
        self.last_update_ms = self.clock.now_ms();
    }

    /// Overwrite the tracked pose, re-basing the encoders first so the
    /// next update integrates from the new pose. The goal is untouched.
    pub fn set_current_position(&mut self, pose: Pose2D) {
        self.reset();
        self.pose = Pose2D::new(pose.x, pose.y, pose.theta);
    }

    /// Set the navigation goal used by the goal-relative queries.
    pub fn set_goal_position(&mut self, goal: Point2D) {
        self.goal = goal;
    }

    /// Integrate encoder and clock readings since the previous call
    /// into the pose and velocity estimates.
    pub fn update(&mut self) {
        let left_ticks = self.left.read_corrected();
        let right_ticks = self.right.read_corrected();

        let delta_left_ticks = left_ticks.wrapping_sub(self.left.last_ticks);
        let delta_right_ticks = right_ticks.wrapping_sub(self.right.last_ticks);
        self.left.last_ticks = left_ticks;
        self.right.last_ticks = right_ticks;

        let now_ms = self.clock.now_ms();
        let delta_ms = now_ms.wrapping_sub(self.last_update_ms);
        self.last_update_ms = now_ms;

        let delta_left = delta_left_ticks as f32 * self.left.distance_per_tick;
        let delta_right = delta_right_ticks as f32 * self.right.distance_per_tick;

        let delta_theta = (delta_right - delta_left) / self.track_width;
        // Displacement uses the heading at the start of this interval
        let (dx, dy) =
            self.model
                .displacement(self.pose.theta, delta_left, delta_right, self.track_width);

        // With no elapsed time the velocities hold their previous values
        if delta_ms != 0 {
            let scale = 1000.0 / delta_ms as f32;
            self.velocity = WheelVelocities::new(delta_left * scale, delta_right * scale);
            self.angular_velocity = delta_theta * scale;
        }

        self.pose.x += dx;
        self.pose.y += dy;
        self.pose.theta += delta_theta;

        if self.velocity.left == 0.0 {
            log::trace!("Odometer: left wheel stationary");
        }
        if self.velocity.right == 0.0 {
            log::trace!("Odometer: right wheel stationary");
        }

        self.pose.theta = normalize_angle(self.pose.theta);

        if left_ticks.unsigned_abs() > self.rebase_threshold as u32
            || right_ticks.unsigned_abs() > self.rebase_threshold as u32
        {
            log::debug!(
                "Odometer: counts {} / {} past {}, re-basing",
                left_ticks,
                right_ticks,
                self.rebase_threshold
            );
            self.reset();
        }
    }

    /// Current pose estimate.
    pub fn pose(&self) -> Pose2D {
        self.pose
    }

    /// Per-wheel velocities from the most recent timed update.
    pub fn wheel_velocities(&self) -> WheelVelocities {
        self.velocity
    }

    /// Velocity of the robot center, negative when reversing.
    pub fn linear_velocity(&self) -> f32 {
        self.velocity.linear()
    }

    /// Angular velocity in radians per second, positive counterclockwise.
    pub fn angular_velocity(&self) -> f32 {
        self.angular_velocity
    }

    /// Current navigation goal.
    pub fn goal_position(&self) -> Point2D {
        self.goal
    }

    /// Straight-line distance from the current pose to the goal.
    pub fn distance_to_goal(&self) -> f32 {
        self.pose.position().distance(&self.goal)
    }

    /// World-frame bearing from the current position to the goal.
    pub fn goal_heading(&self) -> f32 {
        (self.goal.y - self.pose.y).atan2(self.goal.x - self.pose.x)
    }

    /// Heading error toward the goal, scaled to [-1, 1].
    ///
    /// Zero means facing the goal; +1/-1 means facing directly away.
    /// The sign follows the normalized angle: positive when the robot
    /// must turn clockwise (negative theta direction) to face the goal.
    pub fn normalized_heading_error(&self) -> f32 {
        self.normalized_heading_error_to(self.goal_heading())
    }

    /// Heading error against an arbitrary required heading, scaled to
    /// [-1, 1].
    pub fn normalized_heading_error_to(&self, required: f32) -> f32 {
        normalize_angle(self.pose.theta - required) / PI
    }
}

/// Mix normalized linear and angular commands into per-wheel velocity
/// commands, each clamped to [-1, 1].
///
/// Positive `angular` turns counterclockwise: the right wheel speeds up
/// and the left slows down.
pub fn mix_velocities(linear: f32, angular: f32) -> (f32, f32) {
    let left = (linear - angular).clamp(-1.0, 1.0);
    let right = (linear + angular).clamp(-1.0, 1.0);
    (left, right)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockClock, MockEncoder};
    use approx::assert_relative_eq;
    use std::f32::consts::FRAC_PI_2;

    /// 360 cpr encoders, 6.0 diameter wheels, 20.0 track width:
    /// one tick is PI * 6 / 360 ~ 0.05236 units.
    fn test_odometer(config: OdometerConfig) -> (Odometer, MockEncoder, MockEncoder, MockClock) {
        let left = MockEncoder::new(360);
        let right = MockEncoder::new(360);
        let clock = MockClock::new();
        let odometer = Odometer::new(
            &config,
            Box::new(left.clone()),
            Box::new(right.clone()),
            Box::new(clock.clone()),
        )
        .unwrap();
        (odometer, left, right, clock)
    }

    #[test]
    fn test_straight_drive_half_revolution() {
        let (mut odometer, left, right, clock) = test_odometer(OdometerConfig::default());

        // Half a revolution on both wheels over 100 ms
        left.advance(180);
        right.advance(180);
        clock.advance(100);
        odometer.update();

        let pose = odometer.pose();
        assert_relative_eq!(pose.x, 9.42478, epsilon = 1e-3);
        assert_relative_eq!(pose.y, 0.0, epsilon = 1e-6);
        assert_relative_eq!(pose.theta, 0.0, epsilon = 1e-6);

        // 9.42478 units in 0.1 s
        assert_relative_eq!(odometer.linear_velocity(), 94.2478, epsilon = 1e-2);
        assert_relative_eq!(odometer.wheel_velocities().left, 94.2478, epsilon = 1e-2);
        assert_relative_eq!(odometer.wheel_velocities().right, 94.2478, epsilon = 1e-2);
        assert_relative_eq!(odometer.angular_velocity(), 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_right_wheel_only_turns_left() {
        let (mut odometer, _left, right, clock) = test_odometer(OdometerConfig::default());

        // One full right-wheel revolution over 1 s: heading grows by
        // (PI * 6) / 20 ~ 0.9425 rad
        right.advance(360);
        clock.advance(1000);
        odometer.update();

        assert_relative_eq!(odometer.pose().theta, 0.94248, epsilon = 1e-3);
        assert_relative_eq!(odometer.angular_velocity(), 0.94248, epsilon = 1e-3);
        assert_relative_eq!(odometer.wheel_velocities().left, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_reverse_drive() {
        let (mut odometer, left, right, clock) = test_odometer(OdometerConfig::default());

        left.advance(-180);
        right.advance(-180);
        clock.advance(100);
        odometer.update();

        assert_relative_eq!(odometer.pose().x, -9.42478, epsilon = 1e-3);
        assert!(odometer.linear_velocity() < 0.0, "reversing must be negative");
    }

    #[test]
    fn test_goal_queries_from_origin() {
        let (mut odometer, _left, _right, _clock) = test_odometer(OdometerConfig::default());

        odometer.set_goal_position(Point2D::new(10.0, 0.0));
        assert_relative_eq!(odometer.distance_to_goal(), 10.0);
        assert_relative_eq!(odometer.goal_heading(), 0.0);
        assert_relative_eq!(odometer.normalized_heading_error(), 0.0);

        // Facing +Y with the goal on +X: a quarter turn of error
        odometer.set_current_position(Pose2D::new(0.0, 0.0, FRAC_PI_2));
        assert_relative_eq!(odometer.normalized_heading_error(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_heading_error_to_arbitrary_heading() {
        let (mut odometer, _left, _right, _clock) = test_odometer(OdometerConfig::default());

        odometer.set_current_position(Pose2D::new(0.0, 0.0, 0.0));
        assert_relative_eq!(
            odometer.normalized_heading_error_to(FRAC_PI_2),
            -0.5,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_heading_error_odd_periodic_bounded() {
        let (mut odometer, _left, _right, _clock) = test_odometer(OdometerConfig::default());

        // Facing the required heading means zero error
        odometer.set_current_position(Pose2D::new(0.0, 0.0, 0.7));
        assert_relative_eq!(
            odometer.normalized_heading_error_to(0.7),
            0.0,
            epsilon = 1e-6
        );

        for &diff in &[0.25f32, 1.0, 2.0, 3.0] {
            odometer.set_current_position(Pose2D::new(0.0, 0.0, diff));
            let positive = odometer.normalized_heading_error_to(0.0);

            odometer.set_current_position(Pose2D::new(0.0, 0.0, -diff));
            let negative = odometer.normalized_heading_error_to(0.0);

            assert!(positive.abs() <= 1.0, "error {} out of [-1, 1]", positive);
            assert_relative_eq!(negative, -positive, epsilon = 1e-5);

            // A full extra turn on the required heading changes nothing
            odometer.set_current_position(Pose2D::new(0.0, 0.0, diff));
            assert_relative_eq!(
                odometer.normalized_heading_error_to(std::f32::consts::TAU),
                positive,
                epsilon = 1e-5
            );
        }
    }

    #[test]
    fn test_zero_elapsed_time_holds_velocity() {
        let (mut odometer, left, right, clock) = test_odometer(OdometerConfig::default());

        // A turning update so the angular velocity is nonzero
        left.advance(90);
        right.advance(180);
        clock.advance(100);
        odometer.update();
        let held = odometer.wheel_velocities();
        let held_angular = odometer.angular_velocity();
        assert!(held_angular > 0.0);
        let x_before = odometer.pose().x;

        // More ticks with the clock frozen: pose advances, all three
        // velocity outputs hold their previous values
        left.advance(90);
        right.advance(90);
        odometer.update();

        assert!(odometer.pose().x > x_before, "pose must still advance");
        assert_eq!(odometer.wheel_velocities(), held);
        assert_eq!(odometer.angular_velocity(), held_angular);
    }

    #[test]
    fn test_stationary_update_zeroes_velocity() {
        let (mut odometer, left, right, clock) = test_odometer(OdometerConfig::default());

        left.advance(180);
        right.advance(180);
        clock.advance(100);
        odometer.update();

        clock.advance(100);
        odometer.update();

        assert_eq!(odometer.wheel_velocities(), WheelVelocities::zero());
        assert_eq!(odometer.angular_velocity(), 0.0);
        assert_relative_eq!(odometer.pose().x, 9.42478, epsilon = 1e-3);
    }

    #[test]
    fn test_auto_rebase_preserves_pose() {
        let config = OdometerConfig {
            rebase_threshold: 1000,
            ..OdometerConfig::default()
        };
        let (mut odometer, left, right, clock) = test_odometer(config);

        // Past the threshold: the update integrates, then re-bases
        left.advance(1200);
        right.advance(1200);
        clock.advance(100);
        odometer.update();

        assert_eq!(left.count(), 0, "encoder should be re-based to zero");
        assert_eq!(right.count(), 0);
        let x_after_rebase = odometer.pose().x;
        assert_relative_eq!(x_after_rebase, 1200.0 * PI * 6.0 / 360.0, epsilon = 1e-2);

        // Travel after the re-base keeps accumulating seamlessly
        left.advance(100);
        right.advance(100);
        clock.advance(100);
        odometer.update();
        assert_relative_eq!(
            odometer.pose().x,
            1300.0 * PI * 6.0 / 360.0,
            epsilon = 1e-2
        );
    }

    #[test]
    fn test_auto_rebase_on_negative_counts() {
        let config = OdometerConfig {
            rebase_threshold: 1000,
            ..OdometerConfig::default()
        };
        let (mut odometer, left, right, clock) = test_odometer(config);

        left.advance(-1200);
        right.advance(-1200);
        clock.advance(100);
        odometer.update();

        assert_eq!(left.count(), 0, "magnitude check must catch negative counts");
        assert_eq!(right.count(), 0);
        assert!(odometer.pose().x < 0.0);
    }

    #[test]
    fn test_mirrored_encoder_direction() {
        let mut config = OdometerConfig::default();
        config.left_wheel.forward = false;
        let (mut odometer, left, right, clock) = test_odometer(config);

        // Mirrored left encoder counts down while driving forward
        left.advance(-180);
        right.advance(180);
        clock.advance(100);
        odometer.update();

        assert_relative_eq!(odometer.pose().x, 9.42478, epsilon = 1e-3);
        assert_relative_eq!(odometer.pose().theta, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_set_current_position_keeps_goal() {
        let (mut odometer, _left, _right, _clock) = test_odometer(OdometerConfig::default());

        odometer.set_goal_position(Point2D::new(3.0, 4.0));
        odometer.set_current_position(Pose2D::new(1.0, 1.0, 0.5));

        assert_eq!(odometer.goal_position(), Point2D::new(3.0, 4.0));
        let pose = odometer.pose();
        assert_relative_eq!(pose.x, 1.0);
        assert_relative_eq!(pose.y, 1.0);
        assert_relative_eq!(pose.theta, 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_reset_rebases_without_touching_pose() {
        let (mut odometer, left, right, clock) = test_odometer(OdometerConfig::default());

        left.advance(180);
        right.advance(180);
        clock.advance(100);
        odometer.update();
        let pose_before = odometer.pose();

        odometer.reset();
        assert_eq!(left.count(), 0);
        assert_eq!(right.count(), 0);
        assert_eq!(odometer.pose(), pose_before);

        // A second reset with no motion in between changes nothing
        odometer.reset();
        assert_eq!(left.count(), 0);
        assert_eq!(odometer.pose(), pose_before);

        // No phantom travel after the resets
        clock.advance(100);
        odometer.update();
        assert_eq!(odometer.pose(), pose_before);
    }

    #[test]
    fn test_new_rejects_zero_resolution_encoder() {
        let config = OdometerConfig::default();
        let result = Odometer::new(
            &config,
            Box::new(MockEncoder::new(0)),
            Box::new(MockEncoder::new(360)),
            Box::new(MockClock::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_new_rejects_invalid_calibration() {
        let mut config = OdometerConfig::default();
        config.track_width = 0.0;
        let result = Odometer::new(
            &config,
            Box::new(MockEncoder::new(360)),
            Box::new(MockEncoder::new(360)),
            Box::new(MockClock::new()),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_mix_velocities() {
        assert_eq!(mix_velocities(0.5, 0.0), (0.5, 0.5));

        // Positive angular: right wheel faster, robot turns left
        let (left, right) = mix_velocities(0.5, 0.2);
        assert_relative_eq!(left, 0.3);
        assert_relative_eq!(right, 0.7);

        // Saturation clamps each side independently
        assert_eq!(mix_velocities(0.8, 0.5), (0.3, 1.0));
        assert_eq!(mix_velocities(-0.8, -0.5), (-0.3, -1.0));
        assert_eq!(mix_velocities(2.0, 0.0), (1.0, 1.0));
    }
}
