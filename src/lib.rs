//! ChakraOdom - Dead-reckoning odometry and goal steering for
//! differential drive robots
//!
//! Integrates two cumulative wheel encoder counters and a millisecond
//! clock into a planar pose estimate, tracks per-wheel and angular
//! velocities, and answers the goal-relative queries (distance,
//! bearing, normalized heading error) a steering loop needs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                      bin/                           │  ← Executables
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │                   odometer                          │  ← Dead reckoning
//! │          (update loop, goal queries)                │
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │         displacement, config, hal, mock             │  ← Models & devices
//! └─────────────────────────────────────────────────────┘
//!                          │
//! ┌─────────────────────────────────────────────────────┐
//! │              types, math, error                     │  ← Foundation
//! └─────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use chakra_odom::{MockClock, MockEncoder, Odometer, OdometerConfig, Point2D};
//!
//! let config = OdometerConfig::default();
//! let left = MockEncoder::new(360);
//! let right = MockEncoder::new(360);
//! let clock = MockClock::new();
//!
//! let mut odometer = Odometer::new(
//!     &config,
//!     Box::new(left.clone()),
//!     Box::new(right.clone()),
//!     Box::new(clock.clone()),
//! )?;
//! odometer.set_goal_position(Point2D::new(10.0, 0.0));
//!
//! // Drive straight for 100 ms, then integrate
//! left.advance(180);
//! right.advance(180);
//! clock.advance(100);
//! odometer.update();
//!
//! assert!(odometer.distance_to_goal() < 10.0);
//! # Ok::<(), chakra_odom::Error>(())
//! ```

// ============================================================================
// Foundation (no internal deps)
// ============================================================================
pub mod error;
pub mod math;
pub mod types;

// ============================================================================
// Models and devices (depend on foundation)
// ============================================================================
pub mod config;
pub mod displacement;
pub mod hal;
pub mod mock;

// ============================================================================
// Dead reckoning (depends on everything above)
// ============================================================================
pub mod odometer;

// ============================================================================
// Convenience re-exports (flat namespace for common use)
// ============================================================================

pub use config::{OdometerConfig, WheelConfig, DEFAULT_REBASE_THRESHOLD};
pub use displacement::DisplacementModel;
pub use error::{Error, Result};
pub use hal::{MonotonicClock, SystemClock, WheelEncoder};
pub use mock::{MockClock, MockEncoder};
pub use odometer::{mix_velocities, Odometer};
pub use types::{Point2D, Pose2D, WheelVelocities};
