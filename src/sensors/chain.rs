//! Chain counter (gypsy) pulse rate sampler.
//!
//! The D1 sensor closes once per gypsy pocket.  Besides queueing an edge
//! event for the control core, the ISR bumps an atomic counter; `read`
//! swaps it to zero to get the pulse count for one speed sample window.
//!
//! The counter is direction-agnostic: it only feeds the speed estimate,
//! never the signed rode counter.

use core::sync::atomic::{AtomicU32, Ordering};

/// Rising edges seen since the last speed sample.
/// `static` because ESP-IDF ISR callbacks cannot capture state.
static CHAIN_PULSE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Count one chain pulse.  ISR-safe.
pub fn record_pulse() {
    CHAIN_PULSE_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Atomically read and clear the pulse count.
pub fn take_pulse_count() -> u32 {
    CHAIN_PULSE_COUNT.swap(0, Ordering::Relaxed)
}

/// One speed sample window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainRateReading {
    /// Pulses counted in the window.
    pub pulse_count: u32,
    /// Raw pulse rate (Hz), uncalibrated.
    pub pulses_per_sec: f32,
}

/// Samples the ISR pulse counter at the speed sampling cadence.
#[derive(Debug, Default)]
pub struct ChainRateSensor;

impl ChainRateSensor {
    pub fn new() -> Self {
        Self
    }

    /// Take the pulses accumulated over the last `elapsed_secs`.
    ///
    /// A zero-length window yields `None` and leaves the count for the next
    /// read.
    pub fn read(&mut self, elapsed_secs: f32) -> Option<ChainRateReading> {
        if elapsed_secs <= 0.0 {
            return None;
        }
        let pulse_count = take_pulse_count();
        Some(ChainRateReading {
            pulse_count,
            pulses_per_sec: pulse_count as f32 / elapsed_secs,
        })
    }
}
