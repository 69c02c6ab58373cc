//! Sensor inputs — the GPIO edge handlers for D1–D3.
//!
//! All three inputs are wired to any-edge interrupts.  Each handler turns
//! the new pin level into an [`Event`] on the global [`EVENTS`] queue; the
//! chain handler also feeds the speed sampler in [`chain`].
//!
//! Handlers are lock-free and allocation-free: safe in interrupt context.

pub mod chain;

use core::sync::atomic::{AtomicU32, Ordering};

use crate::events::{EVENTS, Event, Level};

/// Events dropped because the queue was full.
static DROPPED_EVENTS: AtomicU32 = AtomicU32::new(0);

fn enqueue(event: Event) {
    if !EVENTS.push(event) {
        DROPPED_EVENTS.fetch_add(1, Ordering::Relaxed);
    }
}

/// D1 chain sensor edge.
pub fn chain_isr(high: bool) {
    if high {
        chain::record_pulse();
    }
    enqueue(Event::ChainPulse(Level::from_bool(high)));
}

/// D2 going-up sensor edge.
pub fn up_switch_isr(high: bool) {
    enqueue(Event::UpSensor(Level::from_bool(high)));
}

/// D3 going-down sensor edge.
pub fn down_switch_isr(high: bool) {
    enqueue(Event::DownSensor(Level::from_bool(high)));
}

/// D2/D3 levels read once at boot, before the edge interrupts run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorSeed {
    pub going_up: Level,
    pub going_down: Level,
}

impl SensorSeed {
    /// The seed as the sensor events the dispatcher would have seen.
    pub fn events(&self) -> [Event; 2] {
        [
            Event::UpSensor(self.going_up),
            Event::DownSensor(self.going_down),
        ]
    }
}

/// Proof that the control core has its initial sensor levels.
///
/// Only [`AppService::seed_sensors`](crate::app::service::AppService::seed_sensors)
/// hands one out, and enabling the GPIO interrupts consumes it: the ISRs
/// stay the only producer on [`EVENTS`].
#[derive(Debug)]
#[must_use]
pub struct SensorsSeeded(pub(crate) ());

/// Read and clear the dropped-event counter (main loop only).
pub fn take_dropped_events() -> u32 {
    DROPPED_EVENTS.swap(0, Ordering::Relaxed)
}
