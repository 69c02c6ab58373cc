//! Application service — the hexagonal core.
//!
//! [`AppService`] owns the control state, the status publisher and the
//! speed estimator.  It is the typed event dispatcher: every edge or
//! command [`Event`] goes through [`AppService::handle_event`], and each
//! handler runs to completion before the next event is looked at.
//!
//! ```text
//!  EventQueue ──▶ ┌─────────────────────────────┐ ──▶ EventSink
//!                 │         AppService           │
//!   RelayPort ◀── │ Direction · Counter · Safety │
//!                 │ Anomaly · Relay interlocks   │
//!                 └─────────────────────────────┘
//! ```
//!
//! Chain pulse cascade (one rising edge):
//!
//! 1. counter ± 1 in the latched direction
//! 2. safety rules (may force the up relay off and publish `off`)
//! 3. anomaly rules, only if no safety rule fired
//! 4. `RodeDeployed` with the new count

use log::{debug, info, warn};

use crate::config::WindlassConfig;
use crate::control::relay::{self, RelayAction};
use crate::control::speed::SpeedEstimator;
use crate::control::status::StatusPublisher;
use crate::control::{
    direction, Calibration, ChainCounter, ControlState, Direction, RelayOutputs, SafetyBounds,
    SensorLevels, WindlassStatus,
};
use crate::error::Result;
use crate::events::{Event, Level};
use crate::safety::{self, PulseContext, Verdict};
use crate::sensors::chain::ChainRateReading;
use crate::sensors::{SensorSeed, SensorsSeeded};

use super::commands::WindlassCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{EventSink, RelayPort, StorageError, StoragePort};

/// NVS location of the persisted chain counter.
pub const COUNTER_NAMESPACE: &str = "windlass";
pub const COUNTER_KEY: &str = "rode";

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService {
    state: ControlState,
    status: StatusPublisher,
    speed: SpeedEstimator,
    bounds: SafetyBounds,
    calibration: Calibration,
    events_handled: u64,
    /// Counter value last written to storage.
    last_saved_counter: Option<i32>,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** touch the relays — call [`start`](Self::start) next.
    pub fn new(config: &WindlassConfig) -> Self {
        let calibration = config.calibration();
        Self {
            state: ControlState::new(),
            status: StatusPublisher::new(),
            speed: SpeedEstimator::new(calibration, config.speed_window as usize),
            bounds: config.safety_bounds(),
            calibration,
            events_handled: 0,
            last_saved_counter: None,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Seed the chain counter from storage.  Call before [`start`](Self::start).
    ///
    /// A missing key is a first boot and leaves the counter at zero.
    pub fn restore_counter(&mut self, storage: &impl StoragePort) -> Result<i32> {
        let mut buf = [0u8; 4];
        let pulses = match storage.read(COUNTER_NAMESPACE, COUNTER_KEY, &mut buf) {
            Ok(4) => i32::from_le_bytes(buf),
            Ok(n) => {
                warn!("Stored chain counter has {} bytes, ignoring", n);
                return Err(StorageError::Corrupted.into());
            }
            Err(StorageError::NotFound) => {
                info!("No stored chain counter, starting at 0");
                0
            }
            Err(e) => return Err(e.into()),
        };
        self.state.counter = ChainCounter::restored(pulses);
        self.last_saved_counter = Some(pulses);
        info!("Chain counter restored: {} pulses", pulses);
        Ok(pulses)
    }

    /// Drive both relays off and announce the initial state.
    pub fn start(&mut self, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        self.state.relays.release_all(relays);
        sink.emit(&AppEvent::Started {
            counter: self.state.counter.value(),
        });
        self.status.publish(WindlassStatus::Off, sink);
        self.emit_rode(sink);
        info!(
            "AppService started (counter={}, bounds={}..{})",
            self.state.counter.value(),
            self.bounds.min_stop,
            self.bounds.max_deploy
        );
    }

    /// Apply the boot-time D2/D3 levels.  Call after [`start`](Self::start)
    /// and before the GPIO interrupts are enabled: the returned token is
    /// what [`init_isr_service`](crate::drivers::hw_init::init_isr_service)
    /// requires.
    pub fn seed_sensors(
        &mut self,
        seed: SensorSeed,
        relays: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) -> SensorsSeeded {
        for event in seed.events() {
            self.handle_event(event, relays, sink);
        }
        info!(
            "Sensor levels seeded (up={:?}, down={:?})",
            seed.going_up, seed.going_down
        );
        SensorsSeeded(())
    }

    // ── Event dispatch ────────────────────────────────────────

    /// Process one event to completion.
    pub fn handle_event(
        &mut self,
        event: Event,
        relays: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        self.events_handled += 1;
        match event {
            Event::ChainPulse(Level::High) => self.on_chain_pulse(relays, sink),
            // Only rising edges count.
            Event::ChainPulse(Level::Low) => {}
            Event::UpSensor(level) => {
                self.state.sensors.going_up = level.is_high();
                let status = direction::on_up_sensor(&mut self.state.direction, level.is_high());
                self.status.publish(status, sink);
            }
            Event::DownSensor(level) => {
                self.state.sensors.going_down = level.is_high();
                let status =
                    direction::on_down_sensor(&mut self.state.direction, level.is_high());
                self.status.publish(status, sink);
            }
            Event::Command(cmd) => self.on_command(cmd, relays, sink),
        }
    }

    fn on_chain_pulse(&mut self, relays: &mut impl RelayPort, sink: &mut impl EventSink) {
        let counter = self.state.counter.step(self.state.direction);
        let ctx = PulseContext {
            counter,
            direction: self.state.direction,
            sensors: self.state.sensors,
        };

        match safety::evaluate(&ctx, &self.bounds) {
            Some(Verdict::Stop(stop)) => {
                warn!("SAFETY STOP: {} (counter={})", stop, counter);
                self.state.relays.release(stop.relay(), relays);
                self.status.publish(WindlassStatus::Off, sink);
                sink.emit(&AppEvent::SafetyStop { stop, counter });
            }
            Some(Verdict::Anomaly(status)) => self.status.publish(status, sink),
            None => {}
        }

        self.emit_rode(sink);
    }

    fn on_command(
        &mut self,
        cmd: WindlassCommand,
        relays: &mut impl RelayPort,
        sink: &mut impl EventSink,
    ) {
        match relay::plan_command(cmd, self.state.sensors) {
            RelayAction::ResetCounter => {
                info!("Chain counter reset (was {})", self.state.counter.value());
                self.state.counter.reset();
                self.emit_rode(sink);
            }
            RelayAction::Energize(r) => {
                info!("Remote '{}': energizing {:?} relay", cmd, r);
                self.state.relays.energize(r, relays);
            }
            RelayAction::ReleaseAll => {
                info!("Remote '{}': releasing both relays", cmd);
                self.state.relays.release_all(relays);
            }
            RelayAction::Blocked => {}
        }
    }

    fn emit_rode(&self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::RodeDeployed {
            pulses: self.state.counter.value(),
            meters: self.rode_deployed_m(),
        });
    }

    // ── Speed ─────────────────────────────────────────────────

    /// Feed one pulse-rate reading and publish the smoothed speed.
    pub fn sample_speed(&mut self, reading: ChainRateReading, sink: &mut impl EventSink) -> f32 {
        let speed = self.speed.push_rate(reading.pulses_per_sec);
        debug!(
            "Chain speed {:.3} m/s ({} pulses, {:.2} Hz)",
            speed, reading.pulse_count, reading.pulses_per_sec
        );
        sink.emit(&AppEvent::ChainSpeed(speed));
        speed
    }

    // ── Persistence ───────────────────────────────────────────

    /// Write the counter to storage if it moved since the last save.
    /// Returns `true` if a write happened.
    pub fn persist_counter_if_changed(&mut self, storage: &mut impl StoragePort) -> Result<bool> {
        let pulses = self.state.counter.value();
        if self.last_saved_counter == Some(pulses) {
            return Ok(false);
        }
        storage.write(COUNTER_NAMESPACE, COUNTER_KEY, &pulses.to_le_bytes())?;
        self.last_saved_counter = Some(pulses);
        debug!("Chain counter saved: {} pulses", pulses);
        Ok(true)
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_telemetry(&self) -> TelemetryData {
        TelemetryData {
            status: self.status.current(),
            direction: self.state.direction,
            counter: self.state.counter.value(),
            rode_deployed_m: self.rode_deployed_m(),
            chain_speed_mps: self.speed.current(),
            up_relay: self.state.relays.is_energized(crate::control::Relay::Up),
            down_relay: self.state.relays.is_energized(crate::control::Relay::Down),
        }
    }

    pub fn status(&self) -> WindlassStatus {
        self.status.current()
    }

    pub fn counter(&self) -> i32 {
        self.state.counter.value()
    }

    pub fn direction(&self) -> Direction {
        self.state.direction
    }

    pub fn sensors(&self) -> SensorLevels {
        self.state.sensors
    }

    pub fn relays(&self) -> RelayOutputs {
        self.state.relays
    }

    /// Calibrated chain out (metres).
    pub fn rode_deployed_m(&self) -> f32 {
        self.calibration.apply(self.state.counter.value() as f32)
    }

    /// Total events dispatched since startup.
    pub fn events_handled(&self) -> u64 {
        self.events_handled
    }
}
