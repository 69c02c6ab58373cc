//! Fuzz target: remote command and status text parsing
//!
//! Arbitrary text must either parse to a command whose wire form is the
//! exact input, or be rejected.  Status words must never parse as
//! anything but their own vocabulary.
//!
//! cargo fuzz run fuzz_command_parse

#![no_main]

use libfuzzer_sys::fuzz_target;
use windlass::app::commands::WindlassCommand;
use windlass::control::WindlassStatus;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };

    if let Some(cmd) = WindlassCommand::parse(text) {
        assert_eq!(cmd.as_str(), text, "command parse must be exact");
    }
    if let Some(status) = WindlassStatus::parse(text) {
        assert_eq!(status.as_str(), text, "status parse must be exact");
    }
});
