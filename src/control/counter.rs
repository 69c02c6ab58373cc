//! Chain counter — signed pulse tally of chain deployed.
//!
//! Positive values mean chain is out.  The counter only moves by one
//! pulse at a time, in the sense given by the latched [`Direction`].

use super::direction::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChainCounter {
    pulses: i32,
}

impl ChainCounter {
    pub const fn new() -> Self {
        Self { pulses: 0 }
    }

    /// Seed the counter from persistent storage at boot.
    ///
    /// Must only be called before the first event is dispatched.
    pub const fn restored(pulses: i32) -> Self {
        Self { pulses }
    }

    /// Count one rising chain edge.  Returns the new value.
    pub fn step(&mut self, direction: Direction) -> i32 {
        self.pulses = self.pulses.saturating_add(direction.step());
        self.pulses
    }

    /// Explicit operator reset (anchor at the stemhead).
    pub fn reset(&mut self) {
        self.pulses = 0;
    }

    pub fn value(&self) -> i32 {
        self.pulses
    }
}
