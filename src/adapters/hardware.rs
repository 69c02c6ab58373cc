//! Hardware adapter — bridges the relay driver to the domain port trait.
//!
//! This is the only place the control core's relay decisions reach real
//! outputs.  On non-espidf targets [`GpioOutput`] writes are no-ops, so
//! the same adapter runs in simulation.

use embedded_hal::digital::OutputPin;

use crate::app::ports::RelayPort;
use crate::control::Relay;
use crate::drivers::relay::{GpioOutput, RelayDriver};
use crate::pins;

/// Concrete adapter that puts the relay pair behind [`RelayPort`].
pub struct HardwareAdapter<U = GpioOutput, D = GpioOutput> {
    relays: RelayDriver<U, D>,
}

impl HardwareAdapter {
    /// Relays on the fixed HALMET outputs (GPIO17 up, GPIO16 down).
    pub fn on_board() -> Self {
        Self::new(RelayDriver::new(
            GpioOutput::new(pins::RELAY_UP_GPIO),
            GpioOutput::new(pins::RELAY_DOWN_GPIO),
        ))
    }
}

impl<U: OutputPin, D: OutputPin> HardwareAdapter<U, D> {
    pub fn new(relays: RelayDriver<U, D>) -> Self {
        Self { relays }
    }

    pub fn relays(&self) -> &RelayDriver<U, D> {
        &self.relays
    }
}

impl<U: OutputPin, D: OutputPin> RelayPort for HardwareAdapter<U, D> {
    fn set_relay(&mut self, relay: Relay, energized: bool) {
        self.relays.set(relay, energized);
    }

    fn all_off(&mut self) {
        self.relays.all_off();
    }
}
