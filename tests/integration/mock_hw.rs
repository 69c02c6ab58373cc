//! Mock adapters for integration tests.
//!
//! Records every relay call and every emitted event so tests can assert
//! on the full history without touching real GPIO.

use std::collections::HashMap;

use windlass::app::events::AppEvent;
use windlass::app::ports::{EventSink, RelayPort, StorageError, StoragePort};
use windlass::app::service::AppService;
use windlass::config::WindlassConfig;
use windlass::control::{Relay, WindlassStatus};
use windlass::events::{Event, Level};

// ── Relay call record ─────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayCall {
    Set { relay: Relay, energized: bool },
    AllOff,
}

// ── MockRelays ────────────────────────────────────────────────

#[derive(Default)]
pub struct MockRelays {
    pub calls: Vec<RelayCall>,
    pub up: bool,
    pub down: bool,
    /// Set if both outputs were ever high at the same time.
    pub overlap_seen: bool,
}

#[allow(dead_code)]
impl MockRelays {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_call(&self) -> Option<&RelayCall> {
        self.calls.last()
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl RelayPort for MockRelays {
    fn set_relay(&mut self, relay: Relay, energized: bool) {
        self.calls.push(RelayCall::Set { relay, energized });
        match relay {
            Relay::Up => self.up = energized,
            Relay::Down => self.down = energized,
        }
        if self.up && self.down {
            self.overlap_seen = true;
        }
    }

    fn all_off(&mut self) {
        self.calls.push(RelayCall::AllOff);
        self.up = false;
        self.down = false;
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn statuses(&self) -> Vec<WindlassStatus> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Status(s) => Some(*s),
                _ => None,
            })
            .collect()
    }

    pub fn last_status(&self) -> Option<WindlassStatus> {
        self.statuses().last().copied()
    }

    pub fn safety_stops(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::SafetyStop { .. }))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── MockNvs ───────────────────────────────────────────────────

#[derive(Default)]
pub struct MockNvs {
    store: HashMap<String, Vec<u8>>,
    pub fail_writes: bool,
    pub writes: usize,
}

#[allow(dead_code)]
impl MockNvs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MockNvs {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        let k = format!("{}::{}", namespace, key);
        match self.store.get(&k) {
            Some(v) if v.len() > buf.len() => Err(StorageError::Corrupted),
            Some(v) => {
                buf[..v.len()].copy_from_slice(v);
                Ok(v.len())
            }
            None => Err(StorageError::NotFound),
        }
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::IoError);
        }
        self.writes += 1;
        self.store
            .insert(format!("{}::{}", namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&format!("{}::{}", namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&format!("{}::{}", namespace, key))
    }
}

// ── Harness ───────────────────────────────────────────────────

/// A started service wired to recording adapters.
pub struct Rig {
    pub app: AppService,
    pub relays: MockRelays,
    pub sink: RecordingSink,
}

#[allow(dead_code)]
impl Rig {
    pub fn new() -> Self {
        Self::with_config(&WindlassConfig::default())
    }

    pub fn with_config(config: &WindlassConfig) -> Self {
        let mut app = AppService::new(config);
        let mut relays = MockRelays::new();
        let mut sink = RecordingSink::new();
        app.start(&mut relays, &mut sink);
        relays.clear();
        sink.clear();
        Self { app, relays, sink }
    }

    pub fn send(&mut self, event: Event) {
        self.app.handle_event(event, &mut self.relays, &mut self.sink);
    }

    pub fn pulse(&mut self) {
        self.send(Event::ChainPulse(Level::High));
        self.send(Event::ChainPulse(Level::Low));
    }

    pub fn pulses(&mut self, n: usize) {
        for _ in 0..n {
            self.pulse();
        }
    }

    pub fn up_sensor(&mut self, active: bool) {
        self.send(Event::UpSensor(Level::from_bool(active)));
    }

    pub fn down_sensor(&mut self, active: bool) {
        self.send(Event::DownSensor(Level::from_bool(active)));
    }

    pub fn command(&mut self, text: &str) {
        if let Some(cmd) = windlass::app::commands::WindlassCommand::parse(text) {
            self.send(Event::Command(cmd));
        }
    }
}
