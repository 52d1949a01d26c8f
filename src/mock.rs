//! Mock encoder and clock implementations.
//!
//! Both mocks hand out cheap clones that share state through `Rc<Cell>`,
//! so a test can keep one handle while the odometer owns the other and
//! drive ticks or time forward between update calls.

use std::cell::Cell;
use std::rc::Rc;

use crate::hal::{MonotonicClock, WheelEncoder};

/// In-memory wheel encoder.
///
/// `advance` on any clone is visible through every other clone,
/// including the one handed to the odometer.
#[derive(Debug, Clone)]
pub struct MockEncoder {
    count: Rc<Cell<i32>>,
    counts_per_revolution: u32,
}

impl MockEncoder {
    /// Create an encoder at count zero with the given resolution.
    pub fn new(counts_per_revolution: u32) -> Self {
        Self {
            count: Rc::new(Cell::new(0)),
            counts_per_revolution,
        }
    }

    /// Add ticks to the counter, wrapping like a hardware register.
    pub fn advance(&self, ticks: i32) {
        self.count.set(self.count.get().wrapping_add(ticks));
    }

    /// Current cumulative count.
    pub fn count(&self) -> i32 {
        self.count.get()
    }
}

impl WheelEncoder for MockEncoder {
    fn read(&mut self) -> i32 {
        self.count.get()
    }

    fn write(&mut self, value: i32) {
        self.count.set(value);
    }

    fn counts_per_revolution(&self) -> u32 {
        self.counts_per_revolution
    }
}

/// In-memory millisecond clock advanced manually by tests.
#[derive(Debug, Clone)]
pub struct MockClock {
    now_ms: Rc<Cell<u32>>,
}

impl MockClock {
    /// Create a clock reading zero.
    pub fn new() -> Self {
        Self {
            now_ms: Rc::new(Cell::new(0)),
        }
    }

    /// Advance the clock, wrapping at `u32::MAX` like the real one.
    pub fn advance(&self, ms: u32) {
        self.now_ms.set(self.now_ms.get().wrapping_add(ms));
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock for MockClock {
    fn now_ms(&self) -> u32 {
        self.now_ms.get()
    }
}
