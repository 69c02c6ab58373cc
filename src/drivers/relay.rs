//! Windlass relay driver (up / down solenoid relays).
//!
//! Two digital outputs, HIGH = energized.  Generic over
//! [`embedded_hal::digital::OutputPin`] so host tests can drive it with
//! recording pins; on the ESP32 it uses [`GpioOutput`], which writes the
//! pin through the raw hw_init helpers.
//!
//! ## Safety contract
//!
//! Up and down must never both be energized.  Enforced by
//! [`RelayOutputs`](crate::control::RelayOutputs); this driver is a dumb
//! actuator.

use core::convert::Infallible;

use embedded_hal::digital::{Error as _, ErrorType, OutputPin};
use log::warn;

use crate::control::Relay;
use crate::drivers::hw_init;

/// Output pin backed by [`hw_init::gpio_write`].
#[derive(Debug, Clone, Copy)]
pub struct GpioOutput {
    gpio: i32,
}

impl GpioOutput {
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

impl ErrorType for GpioOutput {
    type Error = Infallible;
}

impl OutputPin for GpioOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        hw_init::gpio_write(self.gpio, true);
        Ok(())
    }
}

pub struct RelayDriver<U, D> {
    up: U,
    down: D,
    /// Last level written per relay (up, down).
    levels: (bool, bool),
    write_failures: u32,
}

impl<U: OutputPin, D: OutputPin> RelayDriver<U, D> {
    /// Take ownership of both pins and drive them LOW.
    pub fn new(up: U, down: D) -> Self {
        let mut driver = Self {
            up,
            down,
            levels: (false, false),
            write_failures: 0,
        };
        driver.all_off();
        driver
    }

    pub fn set(&mut self, relay: Relay, energized: bool) {
        let result = match relay {
            Relay::Up => self.up.set_state(energized.into()).map_err(|e| e.kind()),
            Relay::Down => self.down.set_state(energized.into()).map_err(|e| e.kind()),
        };
        match result {
            Ok(()) => match relay {
                Relay::Up => self.levels.0 = energized,
                Relay::Down => self.levels.1 = energized,
            },
            Err(e) => {
                self.write_failures = self.write_failures.wrapping_add(1);
                warn!("Relay {:?} write failed: {:?}", relay, e);
            }
        }
    }

    pub fn all_off(&mut self) {
        self.set(Relay::Up, false);
        self.set(Relay::Down, false);
    }

    pub fn is_energized(&self, relay: Relay) -> bool {
        match relay {
            Relay::Up => self.levels.0,
            Relay::Down => self.levels.1,
        }
    }

    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }
}
