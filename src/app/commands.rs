//! Inbound remote commands.
//!
//! Delivered as text on the windlass status path (Signal K listener,
//! serial console).  Matching is exact and case-sensitive; anything else
//! is not a command and is dropped by the caller.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindlassCommand {
    Up,
    Down,
    Off,
    /// Zero the chain counter.
    Reset,
}

impl WindlassCommand {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "off" => Some(Self::Off),
            "reset" => Some(Self::Reset),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Off => "off",
            Self::Reset => "reset",
        }
    }
}

impl fmt::Display for WindlassCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
