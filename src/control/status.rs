//! Windlass status vocabulary and the publisher that delivers it.
//!
//! The wire strings (`"off"`, `"up"`, `"down"`, `"freeFall"`, `"freeUp"`)
//! are consumed by existing Signal K dashboards and must not change.

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Externally visible machine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WindlassStatus {
    #[default]
    Off,
    Up,
    Down,
    /// Chain running out with no powered down-motion sensed.
    FreeFall,
    /// Chain coming in with no powered up-motion sensed (hand hauling).
    FreeUp,
}

impl WindlassStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Up => "up",
            Self::Down => "down",
            Self::FreeFall => "freeFall",
            Self::FreeUp => "freeUp",
        }
    }

    /// Exact, case-sensitive match against the wire vocabulary.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "off" => Some(Self::Off),
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "freeFall" => Some(Self::FreeFall),
            "freeUp" => Some(Self::FreeUp),
            _ => None,
        }
    }
}

impl fmt::Display for WindlassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Holds the current status and forwards every publication to the sink.
///
/// Publishing is idempotent: the same status may be delivered any number
/// of times and only the sink sees the repeats.
#[derive(Debug, Default)]
pub struct StatusPublisher {
    current: WindlassStatus,
}

impl StatusPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&mut self, status: WindlassStatus, sink: &mut impl EventSink) {
        self.current = status;
        sink.emit(&AppEvent::Status(status));
    }

    pub fn current(&self) -> WindlassStatus {
        self.current
    }
}
