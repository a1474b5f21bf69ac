//! Logical clock
//!
//! The runtime measures time in ticks, not wall-clock units. The
//! scheduler advances the clock by one on every dispatch decision, and
//! sleep deadlines are expressed as absolute tick values.

/// Monotonically increasing tick counter
#[derive(Debug, Default)]
pub struct LogicalClock {
    now: u64,
}

impl LogicalClock {
    pub const fn new() -> Self {
        Self { now: 0 }
    }

    /// Current tick
    #[inline]
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance by one tick, returning the new value
    #[inline]
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}
