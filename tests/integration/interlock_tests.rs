//! Remote command interlocks, relay exclusion and status echo.

use windlass::app::commands::WindlassCommand;
use windlass::control::{Relay, WindlassStatus};

use super::mock_hw::{RelayCall, Rig};

#[test]
fn up_is_blocked_while_hauling() {
    let mut rig = Rig::new();
    rig.up_sensor(true);
    rig.command("up");
    assert!(rig.relays.calls.is_empty());
    assert!(!rig.relays.up);
}

#[test]
fn down_is_blocked_while_paying_out() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.command("down");
    assert!(rig.relays.calls.is_empty());
}

#[test]
fn up_releases_down_before_energizing() {
    let mut rig = Rig::new();
    rig.command("down");
    assert!(rig.relays.down);
    rig.relays.clear();

    rig.command("up");
    assert_eq!(
        rig.relays.calls,
        vec![
            RelayCall::Set {
                relay: Relay::Down,
                energized: false
            },
            RelayCall::Set {
                relay: Relay::Up,
                energized: true
            },
        ]
    );
    assert!(rig.relays.up);
    assert!(!rig.relays.down);
    assert!(!rig.relays.overlap_seen);
}

#[test]
fn off_needs_a_live_sensor() {
    let mut rig = Rig::new();
    rig.command("down");
    rig.relays.clear();

    // Relay energized but the windlass hasn't reported motion yet.
    rig.command("off");
    assert!(rig.relays.calls.is_empty());
    assert!(rig.relays.down);

    rig.down_sensor(true);
    rig.command("off");
    assert_eq!(rig.relays.calls, vec![RelayCall::AllOff]);
    assert!(!rig.relays.down);
    assert!(!rig.app.build_telemetry().down_relay);
}

#[test]
fn unknown_commands_change_nothing() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.pulses(3);
    let status = rig.app.status();
    rig.sink.clear();

    for text in ["UP", "Down", "stop", "", "reset ", "freeFall", "freeUp"] {
        rig.command(text);
    }

    assert_eq!(rig.app.counter(), 3);
    assert_eq!(rig.app.status(), status);
    assert!(rig.relays.calls.iter().all(|c| *c != RelayCall::AllOff));
    assert!(rig.sink.events.is_empty());
}

/// Offer every published status back as a command, like a transport that
/// listens on the path it publishes to.
fn echo(rig: &mut Rig) {
    let published = rig.sink.statuses();
    rig.sink.clear();
    for status in published {
        rig.command(status.as_str());
    }
}

#[test]
fn anomaly_echo_is_not_a_command() {
    let mut rig = Rig::new();
    rig.pulse();
    assert_eq!(rig.app.status(), WindlassStatus::FreeFall);
    rig.relays.clear();
    echo(&mut rig);
    assert!(rig.relays.calls.is_empty());
}

#[test]
fn motion_echo_is_absorbed_by_interlock() {
    let mut rig = Rig::new();
    rig.down_sensor(true);
    rig.relays.clear();
    // "down" comes back while the down sensor is live.
    echo(&mut rig);
    assert!(rig.relays.calls.is_empty());

    rig.up_sensor(true);
    echo(&mut rig);
    assert!(rig.relays.calls.is_empty());
}

#[test]
fn safety_off_echo_releases_both() {
    let mut rig = Rig::new();
    rig.command("up");
    rig.up_sensor(true);
    rig.pulse();
    assert_eq!(rig.app.status(), WindlassStatus::Off);
    rig.relays.clear();

    // The "off" echo arrives while the up sensor is still live.
    echo(&mut rig);
    assert!(rig.relays.calls.contains(&RelayCall::AllOff));
    assert!(!rig.relays.up && !rig.relays.down);
}

#[test]
fn commands_never_energize_both() {
    let mut rig = Rig::new();
    let script = [
        WindlassCommand::Up,
        WindlassCommand::Down,
        WindlassCommand::Up,
        WindlassCommand::Reset,
        WindlassCommand::Down,
        WindlassCommand::Off,
        WindlassCommand::Up,
    ];
    for cmd in script {
        rig.command(cmd.as_str());
        assert!(!(rig.relays.up && rig.relays.down));
    }
    assert!(!rig.relays.overlap_seen);
}
