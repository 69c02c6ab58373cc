//! Windlass control core — pure state, zero I/O.
//!
//! [`ControlState`] is the single owner of the chain counter, the latched
//! direction, the last known sensor levels and the commanded relay
//! outputs.  Each field has exactly one writer:
//!
//! | Field       | Written by                                   |
//! |-------------|----------------------------------------------|
//! | `counter`   | chain pulse handler, `reset` command          |
//! | `direction` | [`direction`] tracker                         |
//! | `sensors`   | edge events for the going-up / going-down pins|
//! | `relays`    | [`relay`] command handler, safety stops       |

pub mod counter;
pub mod direction;
pub mod relay;
pub mod speed;
pub mod status;

pub use counter::ChainCounter;
pub use direction::Direction;
pub use relay::{Relay, RelayOutputs};
pub use status::WindlassStatus;

use serde::{Deserialize, Serialize};

/// Linear calibration shared by position and speed: `raw × scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Metres of chain per pulse.
    pub scale: f32,
    pub offset: f32,
}

impl Calibration {
    pub fn apply(&self, raw: f32) -> f32 {
        raw * self.scale + self.offset
    }
}

/// Last level delivered by the edge source for each momentary sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SensorLevels {
    pub going_up: bool,
    pub going_down: bool,
}

/// Counter bounds that force the windlass to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SafetyBounds {
    /// Hauling stops once the counter falls to or below this value.
    pub min_stop: i32,
    /// Maximum deployment: stop once the counter reaches this value.
    pub max_deploy: i32,
}

#[derive(Debug, Clone, Default)]
pub struct ControlState {
    pub counter: ChainCounter,
    pub direction: Direction,
    pub sensors: SensorLevels,
    pub relays: RelayOutputs,
}

impl ControlState {
    pub fn new() -> Self {
        Self::default()
    }
}
