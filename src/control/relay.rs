//! Relay command handler and the two windlass relay outputs.
//!
//! ## Interlocks
//!
//! | Command | Precondition                | Action                       |
//! |---------|-----------------------------|------------------------------|
//! | `reset` | none                        | counter := 0                 |
//! | `up`    | going-up sensor inactive    | energize Up (Down released)  |
//! | `down`  | going-down sensor inactive  | energize Down (Up released)  |
//! | `off`   | either sensor active        | release both                 |
//!
//! The sensor guards keep a remote command from re-driving a motion the
//! windlass is already performing, which also absorbs the echo of the
//! controller's own status publications.

use log::debug;

use crate::app::commands::WindlassCommand;
use crate::app::ports::RelayPort;

use super::SensorLevels;

/// The two contactor relays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relay {
    Up,
    Down,
}

impl Relay {
    pub const fn other(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

/// What a remote command resolved to after the interlocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayAction {
    ResetCounter,
    Energize(Relay),
    ReleaseAll,
    /// Command blocked by an interlock.
    Blocked,
}

/// Resolve a remote command against the current sensor levels.
pub fn plan_command(cmd: WindlassCommand, sensors: SensorLevels) -> RelayAction {
    match cmd {
        WindlassCommand::Reset => RelayAction::ResetCounter,
        WindlassCommand::Up if !sensors.going_up => RelayAction::Energize(Relay::Up),
        WindlassCommand::Down if !sensors.going_down => RelayAction::Energize(Relay::Down),
        WindlassCommand::Off if sensors.going_up || sensors.going_down => RelayAction::ReleaseAll,
        other => {
            debug!("relay: '{}' blocked by interlock ({:?})", other, sensors);
            RelayAction::Blocked
        }
    }
}

/// Commanded state of both relays.  Never both energized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RelayOutputs {
    up: bool,
    down: bool,
}

impl RelayOutputs {
    pub fn is_energized(&self, relay: Relay) -> bool {
        match relay {
            Relay::Up => self.up,
            Relay::Down => self.down,
        }
    }

    /// Energize `relay`, releasing the opposite one first.
    pub fn energize(&mut self, relay: Relay, port: &mut impl RelayPort) {
        self.release(relay.other(), port);
        self.set(relay, true);
        port.set_relay(relay, true);
    }

    pub fn release(&mut self, relay: Relay, port: &mut impl RelayPort) {
        self.set(relay, false);
        port.set_relay(relay, false);
    }

    pub fn release_all(&mut self, port: &mut impl RelayPort) {
        self.up = false;
        self.down = false;
        port.all_off();
    }

    fn set(&mut self, relay: Relay, on: bool) {
        match relay {
            Relay::Up => self.up = on,
            Relay::Down => self.down = on,
        }
    }
}
