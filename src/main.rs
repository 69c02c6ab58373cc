//! HALMET Anchor Windlass Firmware — Main Entry Point
//!
//! Hexagonal architecture with interrupt-driven edge events.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter   LogEventSink   NvsAdapter   console         │
//! │  (RelayPort)       (EventSink)    (Config+NVS) (commands)      │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              AppService (pure logic)                   │    │
//! │  │  Direction · Counter · Safety · Anomaly · Interlocks   │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  GPIO ISRs (D1 chain, D2 up, D3 down) → EVENTS queue           │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info, warn};

use windlass::adapters::console;
use windlass::adapters::hardware::HardwareAdapter;
use windlass::adapters::log_sink::LogEventSink;
use windlass::adapters::nvs::NvsAdapter;
use windlass::adapters::time::{Esp32TimeAdapter, IntervalTimer};
use windlass::app::events::AppEvent;
use windlass::app::ports::{ConfigPort, EventSink};
use windlass::app::service::AppService;
use windlass::config::WindlassConfig;
use windlass::drivers;
use windlass::events::{Event, EVENTS};
use windlass::sensors;
use windlass::sensors::chain::ChainRateSensor;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("══════════════════════════════════════");
    info!("  HALMET Windlass v{}", env!("CARGO_PKG_VERSION"));
    info!("══════════════════════════════════════");

    // ── 2. Initialise hardware peripherals ────────────────────
    // Relay outputs are driven LOW here, before anything else runs.
    if let Err(e) = drivers::hw_init::init_peripherals() {
        error!("HAL init failed: {} — halting", e);
        #[allow(clippy::empty_loop)]
        loop {}
    }

    // ── 3. Load config from NVS (or defaults) ─────────────────
    let mut nvs = match NvsAdapter::new() {
        Ok(n) => Some(n),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults and no persistence", e);
            None
        }
    };
    let config = match nvs.as_ref().map(|n| n.load()) {
        Some(Ok(cfg)) => cfg,
        Some(Err(e)) => {
            warn!("NVS config load failed ({}), using defaults", e);
            WindlassConfig::default()
        }
        None => WindlassConfig::default(),
    };
    info!(
        "Config: scale={} m/pulse, bounds={}..{}, speed window={}",
        config.chain_calibration_scale,
        config.safety_stop,
        config.max_chain_length,
        config.speed_window
    );

    // ── 4. Construct adapters + app service ───────────────────
    let mut hw = HardwareAdapter::on_board();
    let mut log_sink = LogEventSink::new();
    let mut chain_rate = ChainRateSensor::new();
    let clock = Esp32TimeAdapter::new();

    let mut app = AppService::new(&config);
    if let Some(store) = nvs.as_ref() {
        if let Err(e) = app.restore_counter(store) {
            warn!("Chain counter restore failed ({}), starting at 0", e);
        }
    }
    app.start(&mut hw, &mut log_sink);

    // ── 5. Seed D2/D3, then enable edge interrupts ────────────
    // The seed goes straight to the core; once the ISRs run they are the
    // only producer on EVENTS.
    let seeded = app.seed_sensors(
        drivers::hw_init::read_sensor_levels(),
        &mut hw,
        &mut log_sink,
    );
    drivers::hw_init::init_isr_service(seeded).map_err(windlass::error::Error::from)?;

    if let Err(e) = console::spawn_command_reader() {
        warn!("Console reader not started: {}", e);
    }

    info!("System ready. Entering event loop.");

    // ── 6. Event loop ─────────────────────────────────────────
    let now = clock.uptime_ms();
    let mut speed_timer = IntervalTimer::new(u64::from(config.speed_sample_interval_ms), now);
    let mut telemetry_timer =
        IntervalTimer::new(u64::from(config.telemetry_interval_secs) * 1000, now);
    let mut save_timer =
        IntervalTimer::new(u64::from(config.counter_save_interval_secs) * 1000, now);

    loop {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(
            config.control_loop_interval_ms,
        )));

        // Edges first, in arrival order, then remote commands.
        EVENTS.drain(|event| app.handle_event(event, &mut hw, &mut log_sink));
        console::drain_commands(|cmd| {
            app.handle_event(Event::Command(cmd), &mut hw, &mut log_sink);
        });

        let dropped = sensors::take_dropped_events();
        if dropped > 0 {
            warn!("Event queue overflow: {} edges dropped", dropped);
        }

        let now = clock.uptime_ms();
        if let Some(elapsed_ms) = speed_timer.poll(now) {
            if let Some(reading) = chain_rate.read(elapsed_ms as f32 / 1000.0) {
                app.sample_speed(reading, &mut log_sink);
            }
        }

        if telemetry_timer.poll(now).is_some() {
            log_sink.emit(&AppEvent::Telemetry(app.build_telemetry()));
        }

        if save_timer.poll(now).is_some() {
            if let Some(store) = nvs.as_mut() {
                if let Err(e) = app.persist_counter_if_changed(store) {
                    warn!("Chain counter save failed: {}", e);
                }
            }
        }
    }
}
