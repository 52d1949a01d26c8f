//! Hardware capability traits.
//!
//! The odometer itself never touches hardware. It consumes two narrow
//! capabilities, a quadrature tick counter per wheel and a millisecond
//! clock, so the same pipeline runs against real encoder registers or
//! against the mock implementations in [`crate::mock`].

use std::time::Instant;

/// Cumulative quadrature tick counter for one wheel.
///
/// Counts are signed: the count decreases when the wheel rolls backward.
/// Implementations wrap on overflow rather than saturate, matching
/// hardware counter registers.
pub trait WheelEncoder {
    /// Read the current cumulative tick count.
    fn read(&mut self) -> i32;

    /// Overwrite the cumulative tick count.
    ///
    /// Used to re-base the counter back toward zero before it overflows.
    fn write(&mut self, value: i32);

    /// Encoder resolution: ticks per full wheel revolution.
    fn counts_per_revolution(&self) -> u32;
}

/// Monotonic millisecond clock.
///
/// Timestamps wrap around at `u32::MAX` (about 49.7 days); consumers
/// must difference them with wrapping arithmetic.
pub trait MonotonicClock {
    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn now_ms(&self) -> u32;
}

/// Process-uptime clock backed by [`std::time::Instant`].
#[derive(Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for SystemClock {
    fn now_ms(&self) -> u32 {
        // Truncation to u32 gives the 49.7 day wrap the trait documents.
        self.origin.elapsed().as_millis() as u32
    }
}
