//! System configuration parameters
//!
//! All tunable parameters for the windlass controller.  Values can be
//! overridden via NVS (non-volatile storage).  The safety bounds and the
//! calibration are read once at boot and stay fixed for the process
//! lifetime.

use serde::{Deserialize, Serialize};

use crate::app::ports::ConfigError;
use crate::control::speed::MAX_SPEED_WINDOW;
use crate::control::{Calibration, SafetyBounds};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindlassConfig {
    // --- Chain calibration ---
    /// Metres of chain per counter pulse (one gypsy pocket).
    pub chain_calibration_scale: f32,
    /// Additive offset applied after scaling (metres, m/s).
    pub chain_calibration_offset: f32,

    // --- Safety ---
    /// Counter value at or below which hauling is stopped.
    pub safety_stop: i32,
    /// Counter value at or above which paying out is stopped.
    pub max_chain_length: i32,

    // --- Speed ---
    /// Moving-average window for chain speed (samples).
    pub speed_window: u8,
    /// Chain pulse rate sampling period (milliseconds).
    pub speed_sample_interval_ms: u32,

    // --- Timing ---
    /// Event loop period (milliseconds).
    pub control_loop_interval_ms: u32,
    /// Telemetry snapshot interval (seconds).
    pub telemetry_interval_secs: u32,
    /// How often a changed chain counter is flushed to NVS (seconds).
    pub counter_save_interval_secs: u32,
}

impl Default for WindlassConfig {
    fn default() -> Self {
        Self {
            // 0.33 m of chain per pulse
            chain_calibration_scale: 0.33,
            chain_calibration_offset: 0.0,

            // Safety
            safety_stop: 0,
            max_chain_length: 40,

            // Speed
            speed_window: 4,
            speed_sample_interval_ms: 500,

            // Timing
            control_loop_interval_ms: 100, // 10 Hz
            telemetry_interval_secs: 5,
            counter_save_interval_secs: 10,
        }
    }
}

impl WindlassConfig {
    pub fn safety_bounds(&self) -> SafetyBounds {
        SafetyBounds {
            min_stop: self.safety_stop,
            max_deploy: self.max_chain_length,
        }
    }

    pub fn calibration(&self) -> Calibration {
        Calibration {
            scale: self.chain_calibration_scale,
            offset: self.chain_calibration_offset,
        }
    }
}

/// Range-check every field.  Invalid values are rejected, never clamped.
pub fn validate_config(cfg: &WindlassConfig) -> Result<(), ConfigError> {
    if !cfg.chain_calibration_scale.is_finite() || cfg.chain_calibration_scale <= 0.0 {
        return Err(ConfigError::ValidationFailed(
            "chain_calibration_scale must be finite and > 0",
        ));
    }
    if !cfg.chain_calibration_offset.is_finite() {
        return Err(ConfigError::ValidationFailed(
            "chain_calibration_offset must be finite",
        ));
    }
    if cfg.safety_stop >= cfg.max_chain_length {
        return Err(ConfigError::ValidationFailed(
            "safety_stop must be < max_chain_length",
        ));
    }
    if cfg.speed_window == 0 || cfg.speed_window as usize > MAX_SPEED_WINDOW {
        return Err(ConfigError::ValidationFailed("speed_window must be 1–16"));
    }
    if !(100..=10_000).contains(&cfg.speed_sample_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "speed_sample_interval_ms must be 100–10000",
        ));
    }
    if !(10..=1000).contains(&cfg.control_loop_interval_ms) {
        return Err(ConfigError::ValidationFailed(
            "control_loop_interval_ms must be 10–1000",
        ));
    }
    if !(1..=3600).contains(&cfg.telemetry_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "telemetry_interval_secs must be 1–3600",
        ));
    }
    if !(1..=3600).contains(&cfg.counter_save_interval_secs) {
        return Err(ConfigError::ValidationFailed(
            "counter_save_interval_secs must be 1–3600",
        ));
    }
    Ok(())
}
