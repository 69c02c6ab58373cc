//! Interrupt-driven edge event stream.
//!
//! GPIO ISRs produce one [`Event`] per level change on the chain, going-up
//! and going-down inputs.  The main loop drains them in arrival order and
//! hands each one to the [`AppService`](crate::app::service::AppService)
//! dispatcher, so every pulse cascade finishes before the next edge is
//! looked at.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ D1 chain    │────▶│              │     │              │
//! │ D2 going up │────▶│  EventQueue  │────▶│  Main Loop   │
//! │ D3 going dn │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```
//!
//! The queue is single-producer: all three pins are serviced by the one
//! GPIO ISR dispatcher, which never re-enters itself.  Nothing else pushes
//! once the ISRs are installed; the boot-time switch levels go to the core
//! directly (see `AppService::seed_sensors`).

use core::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

use crate::app::commands::WindlassCommand;

/// Maximum number of pending events (one slot is kept empty).
pub const EVENT_QUEUE_CAP: usize = 32;

/// Logic level after an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    High,
}

impl Level {
    pub const fn is_high(self) -> bool {
        matches!(self, Self::High)
    }

    pub const fn from_bool(high: bool) -> Self {
        if high { Self::High } else { Self::Low }
    }
}

/// Everything the control core reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// D1 chain sensor changed level.
    ChainPulse(Level),
    /// D2 going-up sensor changed level.
    UpSensor(Level),
    /// D3 going-down sensor changed level.
    DownSensor(Level),
    /// Remote command from the status/command channel.
    Command(WindlassCommand),
}

// One-byte wire form: high nibble = source, low nibble = payload.
const TAG_CHAIN: u8 = 0x10;
const TAG_UP: u8 = 0x20;
const TAG_DOWN: u8 = 0x30;
const TAG_COMMAND: u8 = 0x40;

impl Event {
    pub const fn encode(self) -> u8 {
        match self {
            Self::ChainPulse(l) => TAG_CHAIN | l.is_high() as u8,
            Self::UpSensor(l) => TAG_UP | l.is_high() as u8,
            Self::DownSensor(l) => TAG_DOWN | l.is_high() as u8,
            Self::Command(WindlassCommand::Up) => TAG_COMMAND,
            Self::Command(WindlassCommand::Down) => TAG_COMMAND | 1,
            Self::Command(WindlassCommand::Off) => TAG_COMMAND | 2,
            Self::Command(WindlassCommand::Reset) => TAG_COMMAND | 3,
        }
    }

    pub const fn decode(raw: u8) -> Option<Self> {
        let level = match raw & 0x0F {
            0 => Level::Low,
            _ => Level::High,
        };
        match (raw & 0xF0, raw & 0x0F) {
            (TAG_CHAIN, 0 | 1) => Some(Self::ChainPulse(level)),
            (TAG_UP, 0 | 1) => Some(Self::UpSensor(level)),
            (TAG_DOWN, 0 | 1) => Some(Self::DownSensor(level)),
            (TAG_COMMAND, 0) => Some(Self::Command(WindlassCommand::Up)),
            (TAG_COMMAND, 1) => Some(Self::Command(WindlassCommand::Down)),
            (TAG_COMMAND, 2) => Some(Self::Command(WindlassCommand::Off)),
            (TAG_COMMAND, 3) => Some(Self::Command(WindlassCommand::Reset)),
            _ => None,
        }
    }
}

/// Lock-free SPSC ring buffer of encoded events.
///
/// The producer owns `head`, the consumer owns `tail`; each publishes its
/// index with `Release` and reads the other's with `Acquire`.
pub struct EventQueue<const N: usize> {
    head: AtomicUsize,
    tail: AtomicUsize,
    slots: [AtomicU8; N],
}

impl<const N: usize> EventQueue<N> {
    pub const fn new() -> Self {
        Self {
            head: AtomicUsize::new(0),
            tail: AtomicUsize::new(0),
            slots: [const { AtomicU8::new(0) }; N],
        }
    }

    /// Push an event.  Safe to call from ISR context.
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next = (head + 1) % N;
        if next == tail {
            return false;
        }
        self.slots[head].store(event.encode(), Ordering::Relaxed);
        self.head.store(next, Ordering::Release);
        true
    }

    /// Pop the oldest event.  Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);
            if tail == head {
                return None;
            }
            let raw = self.slots[tail].load(Ordering::Relaxed);
            self.tail.store((tail + 1) % N, Ordering::Release);
            // Slots only ever hold encoded events; skip anything else.
            if let Some(event) = Event::decode(raw) {
                return Some(event);
            }
        }
    }

    /// Drain all pending events into `handler`, oldest first.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    pub fn len(&self) -> usize {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Relaxed);
        (head + N - tail) % N
    }
}

impl<const N: usize> Default for EventQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// The firmware's edge queue: GPIO ISR dispatcher → main loop.
pub static EVENTS: EventQueue<EVENT_QUEUE_CAP> = EventQueue::new();
