//! ESP32 time adapter.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side testing and simulation.

/// Monotonic clock for the control loop.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_ms(&self) -> u64 {
        // SAFETY: esp_timer_get_time is a read of the RTC-backed counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    /// Milliseconds since boot (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Fires once per `period_ms` when polled from the loop.
///
/// Reports the real elapsed time since the last firing, so callers that
/// turn counts into rates are not skewed by loop jitter.
#[derive(Debug, Clone, Copy)]
pub struct IntervalTimer {
    period_ms: u64,
    last_ms: u64,
}

impl IntervalTimer {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        Self {
            period_ms: period_ms.max(1),
            last_ms: now_ms,
        }
    }

    /// `Some(elapsed_ms)` if the period has passed, restarting the timer.
    pub fn poll(&mut self, now_ms: u64) -> Option<u64> {
        let elapsed = now_ms.saturating_sub(self.last_ms);
        if elapsed < self.period_ms {
            return None;
        }
        self.last_ms = now_ms;
        Some(elapsed)
    }
}
