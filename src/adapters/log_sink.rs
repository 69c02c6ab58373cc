//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing each application event as one
//! structured line to the ESP-IDF logger (UART / USB-CDC in production).
//! Lines carry the Signal K path the value belongs to, so a bridge on the
//! boat network can forward them verbatim.  Telemetry snapshots go out as
//! one JSON object per line.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

pub const STATUS_PATH: &str = "navigation.anchor.windlass.status";
pub const RODE_PATH: &str = "navigation.anchor.rodeDeployed";
pub const SPEED_PATH: &str = "navigation.anchor.windlass.speed";

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink {
    emitted: u32,
}

impl LogEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Events written since boot.
    pub fn emitted(&self) -> u32 {
        self.emitted
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        self.emitted = self.emitted.wrapping_add(1);
        match event {
            AppEvent::Status(status) => {
                info!("STATUS | {} = {}", STATUS_PATH, status);
            }
            AppEvent::RodeDeployed { pulses, meters } => {
                info!("RODE | {} = {:.2} m ({} pulses)", RODE_PATH, meters, pulses);
            }
            AppEvent::ChainSpeed(mps) => {
                info!("SPEED | {} = {:.3} m/s", SPEED_PATH, mps);
            }
            AppEvent::SafetyStop { stop, counter } => {
                warn!("STOP | {} at counter {}", stop, counter);
            }
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {}", json),
                Err(e) => warn!("TELEM | encode failed: {}", e),
            },
            AppEvent::Started { counter } => {
                info!("START | counter={}", counter);
            }
        }
    }
}
