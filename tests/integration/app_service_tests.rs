//! AppService integration tests — full pulse cascades through the ports.

use windlass::app::events::AppEvent;
use windlass::app::service::{COUNTER_KEY, COUNTER_NAMESPACE};
use windlass::app::ports::{StorageError, StoragePort};
use windlass::config::WindlassConfig;
use windlass::control::{Direction, Relay, WindlassStatus};
use windlass::error::Error;
use windlass::safety::SafetyStop;
use windlass::sensors::chain::ChainRateReading;

use super::mock_hw::{MockNvs, RelayCall, Rig};

#[test]
fn counter_follows_latched_direction() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(5);
    assert_eq!(rig.app.counter(), 5);

    rig.down_sensor(false);
    rig.up_sensor(true);
    rig.pulses(2);
    assert_eq!(rig.app.counter(), 3);
    assert_eq!(rig.app.direction(), Direction::Up);
}

#[test]
fn falling_edges_do_not_count() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.send(windlass::events::Event::ChainPulse(windlass::events::Level::Low));
    assert_eq!(rig.app.counter(), 0);
}

#[test]
fn min_stop_releases_up_relay() {
    let mut rig = Rig::new();
    rig.command("up");
    assert!(rig.relays.up);
    rig.up_sensor(true);
    assert_eq!(rig.app.status(), WindlassStatus::Up);
    rig.relays.clear();

    rig.pulse();

    assert_eq!(rig.app.counter(), -1);
    assert!(!rig.relays.up);
    assert_eq!(
        rig.relays.calls,
        vec![RelayCall::Set {
            relay: Relay::Up,
            energized: false
        }]
    );
    assert_eq!(rig.app.status(), WindlassStatus::Off);
    assert!(rig.sink.events.contains(&AppEvent::SafetyStop {
        stop: SafetyStop::MinStop,
        counter: -1
    }));
}

#[test]
fn max_deploy_releases_up_relay_not_down() {
    let mut rig = Rig::new();
    rig.command("down");
    rig.down_sensor(true);
    rig.pulses(39);
    assert_eq!(rig.app.counter(), 39);
    assert_eq!(rig.sink.safety_stops(), 0);
    assert_eq!(rig.app.status(), WindlassStatus::Down);
    rig.relays.clear();

    rig.pulse();

    assert_eq!(rig.app.counter(), 40);
    assert_eq!(rig.app.status(), WindlassStatus::Off);
    assert_eq!(
        rig.relays.last_call(),
        Some(&RelayCall::Set {
            relay: Relay::Up,
            energized: false
        })
    );
    // Fielded behaviour: the down relay stays as it was.
    assert!(rig.relays.down);
    assert!(rig.sink.events.contains(&AppEvent::SafetyStop {
        stop: SafetyStop::MaxDeploy,
        counter: 40
    }));
}

#[test]
fn max_deploy_fires_on_every_pulse_past_the_bound() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(42);
    assert_eq!(rig.sink.safety_stops(), 3);
}

#[test]
fn free_fall_when_paying_out_unpowered() {
    let mut rig = Rig::new();
    rig.pulse();
    assert_eq!(rig.app.counter(), 1);
    assert_eq!(rig.app.status(), WindlassStatus::FreeFall);
    assert!(rig.relays.calls.is_empty());
}

#[test]
fn free_up_after_up_sensor_release() {
    let mut rig = Rig::new();
    rig.up_sensor(true);
    rig.up_sensor(false);
    assert_eq!(rig.app.status(), WindlassStatus::Off);
    assert_eq!(rig.app.direction(), Direction::Up);

    rig.pulse();
    assert_eq!(rig.app.counter(), -1);
    assert_eq!(rig.app.status(), WindlassStatus::FreeUp);
    assert_eq!(rig.sink.safety_stops(), 0);
}

#[test]
fn safety_rule_pre_empts_anomaly() {
    let cfg = WindlassConfig {
        safety_stop: 5,
        ..WindlassConfig::default()
    };
    let mut rig = Rig::with_config(&cfg);
    // Up sensor stays live, direction latched Down, down sensor released:
    // FreeFall would match, but MinStop comes first.
    rig.up_sensor(true);
    rig.down_sensor(true);
    rig.down_sensor(false);
    rig.sink.clear();

    rig.pulse();

    assert_eq!(rig.app.counter(), 1);
    assert_eq!(rig.sink.statuses(), vec![WindlassStatus::Off]);
    assert_eq!(rig.sink.safety_stops(), 1);
}

#[test]
fn every_pulse_reports_rode() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(3);
    let rode: Vec<i32> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::RodeDeployed { pulses, .. } => Some(*pulses),
            _ => None,
        })
        .collect();
    assert_eq!(rode, vec![1, 2, 3]);
}

#[test]
fn reset_zeroes_counter_in_any_direction() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(12);
    rig.command("reset");
    assert_eq!(rig.app.counter(), 0);

    rig.down_sensor(false);
    rig.up_sensor(true);
    rig.up_sensor(false);
    rig.pulses(4);
    assert_eq!(rig.app.counter(), -4);
    rig.command("reset");
    assert_eq!(rig.app.counter(), 0);
    assert_eq!(rig.app.direction(), Direction::Up);
    assert!(rig.relays.calls.is_empty());
}

#[test]
fn repeated_status_touches_nothing_else() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(2);
    let counter = rig.app.counter();
    rig.relays.clear();

    for _ in 0..5 {
        rig.down_sensor(true);
    }

    assert_eq!(rig.app.counter(), counter);
    assert!(rig.relays.calls.is_empty());
    assert_eq!(rig.app.status(), WindlassStatus::Down);
}

fn reading(pulse_count: u32, elapsed_secs: f32) -> ChainRateReading {
    ChainRateReading {
        pulse_count,
        pulses_per_sec: pulse_count as f32 / elapsed_secs,
    }
}

#[test]
fn speed_is_calibrated_and_smoothed() {
    let mut rig = Rig::new();
    // 4 pulses over 2 s: the rate, not the raw count, drives the speed.
    let first = rig.app.sample_speed(reading(4, 2.0), &mut rig.sink);
    assert!((first - 0.66).abs() < 1e-5);
    let second = rig.app.sample_speed(reading(2, 0.5), &mut rig.sink);
    assert!((second - 0.99).abs() < 1e-5);
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::ChainSpeed(_))));
    assert!((rig.app.build_telemetry().chain_speed_mps - 0.99).abs() < 1e-5);
}

#[test]
fn counter_survives_restart() {
    let mut nvs = MockNvs::new();
    {
        let mut rig = Rig::new();
        rig.down_sensor(true);
        rig.pulses(7);
        assert!(rig.app.persist_counter_if_changed(&mut nvs).unwrap());
        assert!(!rig.app.persist_counter_if_changed(&mut nvs).unwrap());
        assert_eq!(nvs.writes, 1);
    }

    let mut rig = Rig::new();
    assert_eq!(rig.app.restore_counter(&nvs).unwrap(), 7);
    assert_eq!(rig.app.counter(), 7);
    // Restored value counts as saved.
    assert!(!rig.app.persist_counter_if_changed(&mut nvs).unwrap());
}

#[test]
fn missing_counter_is_first_boot() {
    let nvs = MockNvs::new();
    let mut rig = Rig::new();
    assert_eq!(rig.app.restore_counter(&nvs).unwrap(), 0);
}

#[test]
fn short_counter_blob_is_rejected() {
    let mut nvs = MockNvs::new();
    nvs.write(COUNTER_NAMESPACE, COUNTER_KEY, &[1, 2]).unwrap();
    let mut rig = Rig::new();
    assert_eq!(
        rig.app.restore_counter(&nvs),
        Err(Error::Storage(StorageError::Corrupted))
    );
    assert_eq!(rig.app.counter(), 0);
}

#[test]
fn oversized_counter_blob_is_rejected() {
    let mut nvs = MockNvs::new();
    nvs.write(COUNTER_NAMESPACE, COUNTER_KEY, &[7, 0, 0, 0, 0]).unwrap();
    let mut rig = Rig::new();
    assert_eq!(
        rig.app.restore_counter(&nvs),
        Err(Error::Storage(StorageError::Corrupted))
    );
    assert_eq!(rig.app.counter(), 0);
}

#[test]
fn failed_save_is_retried() {
    let mut nvs = MockNvs::new();
    nvs.fail_writes = true;
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulse();
    assert!(rig.app.persist_counter_if_changed(&mut nvs).is_err());

    nvs.fail_writes = false;
    assert!(rig.app.persist_counter_if_changed(&mut nvs).unwrap());
    assert!(nvs.exists(COUNTER_NAMESPACE, COUNTER_KEY));
}
