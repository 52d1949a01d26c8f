//! Closed-loop goal drive demo on mock hardware.
//!
//! Builds an odometer over mock encoders and steers it around a square
//! of waypoints: each cycle the normalized heading error is mixed into
//! per-wheel velocity commands, the commands are fed back into the mock
//! encoders as ticks, and the odometer integrates the result. No
//! hardware required.

use chakra_odom::{
    mix_velocities, MockClock, MockEncoder, Odometer, OdometerConfig, Point2D, Result,
};
use std::env;

/// Encoder ticks per second at full wheel command
const MAX_TICKS_PER_SEC: f32 = 400.0;
/// Control cycle length in milliseconds
const CYCLE_MS: u32 = 50;
/// A waypoint counts as reached inside this radius
const ARRIVAL_RADIUS: f32 = 0.5;
/// Cruise command, as a fraction of full speed
const CRUISE: f32 = 0.4;
/// Start slowing down inside this distance to the goal
const SLOW_RADIUS: f32 = 5.0;
/// Proportional gain on the normalized heading error
const TURN_GAIN: f32 = 1.5;
/// Drive only once the normalized heading error magnitude is under
/// this; pivot in place otherwise
const ALIGN_THRESHOLD: f32 = 0.25;
/// Per-waypoint cycle cap
const MAX_CYCLES: u32 = 20_000;

/// Parse config path from command line arguments.
///
/// Supports:
/// - `goal_drive <path>` (positional)
/// - `goal_drive --config <path>` (flag-based)
/// - `goal_drive -c <path>` (short flag)
///
/// Defaults to `odometer.toml` if not specified.
fn parse_config_path() -> String {
    let args: Vec<String> = env::args().collect();

    // Look for --config or -c flag
    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return args[i + 1].clone();
        }
    }

    // Fall back to first positional argument (if it doesn't start with -)
    if args.len() > 1 && !args[1].starts_with('-') {
        return args[1].clone();
    }

    // Default path
    "odometer.toml".to_string()
}

/// Turns a wheel command into whole encoder ticks per cycle, carrying
/// the fractional remainder so slow commands still creep forward.
struct TickAccumulator {
    remainder: f32,
}

impl TickAccumulator {
    fn new() -> Self {
        Self { remainder: 0.0 }
    }

    fn ticks(&mut self, command: f32) -> i32 {
        let exact = self.remainder + command * MAX_TICKS_PER_SEC * (CYCLE_MS as f32 / 1000.0);
        let whole = exact.trunc();
        self.remainder = exact - whole;
        whole as i32
    }
}

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("ChakraOdom goal drive demo starting...");

    let config_path = parse_config_path();
    let config = match OdometerConfig::from_file(&config_path) {
        Ok(config) => {
            log::info!("Using config: {}", config_path);
            config
        }
        Err(e) => {
            log::warn!("Could not load {} ({}), using defaults", config_path, e);
            OdometerConfig::default()
        }
    };

    let left = MockEncoder::new(360);
    let right = MockEncoder::new(360);
    let clock = MockClock::new();
    let mut odometer = Odometer::new(
        &config,
        Box::new(left.clone()),
        Box::new(right.clone()),
        Box::new(clock.clone()),
    )?;

    // Counterclockwise square, back to the start
    let waypoints = [
        Point2D::new(40.0, 0.0),
        Point2D::new(40.0, 40.0),
        Point2D::new(0.0, 40.0),
        Point2D::new(0.0, 0.0),
    ];

    let mut left_ticks = TickAccumulator::new();
    let mut right_ticks = TickAccumulator::new();

    for (index, waypoint) in waypoints.iter().enumerate() {
        odometer.set_goal_position(*waypoint);
        log::info!(
            "Waypoint {}: ({:.1}, {:.1})",
            index + 1,
            waypoint.x,
            waypoint.y
        );

        let mut cycles = 0;
        while odometer.distance_to_goal() > ARRIVAL_RADIUS {
            if cycles >= MAX_CYCLES {
                log::warn!(
                    "Waypoint {} not reached after {} cycles, moving on",
                    index + 1,
                    cycles
                );
                break;
            }
            cycles += 1;

            // Pivot until roughly aligned, then drive, slowing on
            // approach. Positive error means the goal is clockwise of
            // the current heading, so the angular command gets the
            // opposite sign.
            let error = odometer.normalized_heading_error();
            let linear = if error.abs() > ALIGN_THRESHOLD {
                0.0
            } else {
                CRUISE * (odometer.distance_to_goal() / SLOW_RADIUS).min(1.0)
            };
            let angular = -TURN_GAIN * error;
            let (left_cmd, right_cmd) = mix_velocities(linear, angular);

            left.advance(left_ticks.ticks(left_cmd));
            right.advance(right_ticks.ticks(right_cmd));
            clock.advance(CYCLE_MS);
            odometer.update();

            if cycles % 40 == 0 {
                let pose = odometer.pose();
                log::debug!(
                    "pose ({:.2}, {:.2}) heading {:.3} rad, {:.2} to goal, {:.2}/s",
                    pose.x,
                    pose.y,
                    pose.theta,
                    odometer.distance_to_goal(),
                    odometer.linear_velocity()
                );
            }
        }

        log::info!(
            "Reached waypoint {} after {} cycles ({:.2} away)",
            index + 1,
            cycles,
            odometer.distance_to_goal()
        );
    }

    let pose = odometer.pose();
    log::info!(
        "Goal drive complete: pose ({:.2}, {:.2}) heading {:.3} rad",
        pose.x,
        pose.y,
        pose.theta
    );
    Ok(())
}
