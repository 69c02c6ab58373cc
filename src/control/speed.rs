//! Chain speed estimator.
//!
//! Pulse rate (Hz) → linear calibration → moving average.  The window
//! fills from cold start; until it is full the average runs over however
//! many samples have arrived.

use heapless::Deque;

use super::Calibration;

/// Largest moving-average window the estimator can hold.
pub const MAX_SPEED_WINDOW: usize = 16;

pub struct SpeedEstimator {
    calibration: Calibration,
    window: usize,
    samples: Deque<f32, MAX_SPEED_WINDOW>,
}

impl SpeedEstimator {
    /// `window` is clamped to `1..=MAX_SPEED_WINDOW`.
    pub fn new(calibration: Calibration, window: usize) -> Self {
        Self {
            calibration,
            window: window.clamp(1, MAX_SPEED_WINDOW),
            samples: Deque::new(),
        }
    }

    /// Feed one pulse-rate sample and return the smoothed speed (m/s).
    pub fn push_rate(&mut self, pulses_per_sec: f32) -> f32 {
        let speed = self.calibration.apply(pulses_per_sec);
        while self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        // Cannot fail: the loop above leaves at least one free slot.
        let _ = self.samples.push_back(speed);
        self.current()
    }

    /// Current smoothed speed, 0.0 before the first sample.
    pub fn current(&self) -> f32 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let sum: f32 = self.samples.iter().sum();
        sum / self.samples.len() as f32
    }

    pub fn window(&self) -> usize {
        self.window
    }
}
