//! Direction tracker.
//!
//! The going-up / going-down inputs are momentary: they read HIGH only
//! while the windlass circuit is live.  Activation latches the direction;
//! release reports the windlass as stopped but leaves the direction where
//! it was, so pulses from a coasting or hand-hauled chain are still
//! counted in the last commanded sense.

use serde::{Deserialize, Serialize};

use super::status::WindlassStatus;

/// Direction of chain travel used to sign every counter step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    /// Chain coming aboard: each pulse decrements the counter.
    Up,
    /// Chain paying out: each pulse increments the counter.
    #[default]
    Down,
}

impl Direction {
    /// Signed counter contribution of one pulse travelling in this direction.
    pub const fn step(self) -> i32 {
        match self {
            Self::Down => 1,
            Self::Up => -1,
        }
    }
}

/// Apply a going-up sensor change.  Returns the status to publish.
pub fn on_up_sensor(direction: &mut Direction, active: bool) -> WindlassStatus {
    if active {
        *direction = Direction::Up;
        WindlassStatus::Up
    } else {
        WindlassStatus::Off
    }
}

/// Apply a going-down sensor change.  Returns the status to publish.
pub fn on_down_sensor(direction: &mut Direction, active: bool) -> WindlassStatus {
    if active {
        *direction = Direction::Down;
        WindlassStatus::Down
    } else {
        WindlassStatus::Off
    }
}
