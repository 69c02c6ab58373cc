//! Edge stream → queue → dispatcher, as the main loop wires it.

use windlass::control::WindlassStatus;
use windlass::events::{Event, EventQueue, EVENTS, Level};
use windlass::drivers::hw_init;
use windlass::sensors::{self, SensorSeed};

use super::mock_hw::Rig;

#[test]
fn queued_edges_are_processed_in_arrival_order() {
    let q: EventQueue<16> = EventQueue::new();
    let mut rig = Rig::new();

    // Down sensor first, then three pulses: counts up without anomaly.
    q.push(Event::DownSensor(Level::High));
    for _ in 0..3 {
        q.push(Event::ChainPulse(Level::High));
        q.push(Event::ChainPulse(Level::Low));
    }
    // Release, then one more pulse: free fall.
    q.push(Event::DownSensor(Level::Low));
    q.push(Event::ChainPulse(Level::High));

    q.drain(|e| rig.send(e));

    assert_eq!(rig.app.counter(), 4);
    assert_eq!(
        rig.sink.statuses(),
        vec![
            WindlassStatus::Down,
            WindlassStatus::Off,
            WindlassStatus::FreeFall
        ]
    );
    assert_eq!(rig.app.events_handled(), 9);
}

// EVENTS is process-wide; this is the only test in the binary that uses it.
#[test]
fn boot_seeds_levels_before_isrs_feed_the_global_queue() {
    EVENTS.drain(|_| {});
    let _ = sensors::chain::take_pulse_count();

    // Boot: the seed reaches the core directly, the queue stays untouched.
    let mut rig = Rig::new();
    let seed = SensorSeed {
        going_up: Level::Low,
        going_down: Level::High,
    };
    let seeded = rig.app.seed_sensors(seed, &mut rig.relays, &mut rig.sink);
    assert!(EVENTS.is_empty());
    assert_eq!(rig.app.status(), WindlassStatus::Down);
    hw_init::init_isr_service(seeded).unwrap();

    // From here on the ISRs are the only producer.
    sensors::chain_isr(true);
    sensors::chain_isr(false);
    sensors::chain_isr(true);
    sensors::chain_isr(false);
    assert_eq!(EVENTS.len(), 4);

    EVENTS.drain(|e| rig.send(e));

    assert_eq!(rig.app.counter(), 2);
    assert_eq!(rig.app.status(), WindlassStatus::Down);
    assert_eq!(sensors::chain::take_pulse_count(), 2);
    assert_eq!(sensors::take_dropped_events(), 0);
}
