//! Fuzz target: raw event bytes through the queue and dispatcher
//!
//! Each input byte is pushed as an encoded event (undecodable bytes are
//! skipped), then the stream is dispatched.  The control core must never
//! panic and must never leave both relays energized.
//!
//! cargo fuzz run fuzz_event_stream

#![no_main]

use libfuzzer_sys::fuzz_target;
use windlass::app::events::AppEvent;
use windlass::app::ports::{EventSink, RelayPort};
use windlass::app::service::AppService;
use windlass::config::WindlassConfig;
use windlass::control::Relay;
use windlass::events::{Event, EventQueue};

#[derive(Default)]
struct Relays {
    up: bool,
    down: bool,
}

impl RelayPort for Relays {
    fn set_relay(&mut self, relay: Relay, energized: bool) {
        match relay {
            Relay::Up => self.up = energized,
            Relay::Down => self.down = energized,
        }
        assert!(!(self.up && self.down), "both relays energized");
    }
    fn all_off(&mut self) {
        self.up = false;
        self.down = false;
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

fuzz_target!(|data: &[u8]| {
    let mut app = AppService::new(&WindlassConfig::default());
    let mut relays = Relays::default();
    let mut sink = NullSink;
    app.start(&mut relays, &mut sink);

    let queue: EventQueue<64> = EventQueue::new();
    for chunk in data.chunks(32) {
        for &raw in chunk {
            if let Some(event) = Event::decode(raw) {
                queue.push(event);
            }
        }
        queue.drain(|e| app.handle_event(e, &mut relays, &mut sink));
    }
});
