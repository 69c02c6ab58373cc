//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them — log to serial, publish to Signal K,
//! draw on the display, etc.

use serde::Serialize;

use crate::control::{Direction, WindlassStatus};
use crate::safety::SafetyStop;

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The service has started (carries the restored counter).
    Started { counter: i32 },

    /// Windlass status publication.
    Status(WindlassStatus),

    /// Chain deployed, after every counted pulse and on reset.
    RodeDeployed { pulses: i32, meters: f32 },

    /// Smoothed, calibrated chain speed (m/s).
    ChainSpeed(f32),

    /// A counter bound forced a relay off.
    SafetyStop { stop: SafetyStop, counter: i32 },

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryData {
    pub status: WindlassStatus,
    pub direction: Direction,
    pub counter: i32,
    pub rode_deployed_m: f32,
    pub chain_speed_mps: f32,
    pub up_relay: bool,
    pub down_relay: bool,
}
