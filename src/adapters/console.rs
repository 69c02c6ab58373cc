//! Serial console command adapter.
//!
//! A reader thread takes one command word per line from stdin (UART0 /
//! USB-CDC on the ESP32) and hands it to the control loop through a
//! bounded `embassy-sync` channel.  The loop never blocks on it: it
//! drains whatever is pending once per tick.
//!
//! ```text
//! ┌──────────────┐  WindlassCommand  ┌──────────────┐
//! │ console task │──────────────────▶│ control loop │
//! └──────────────┘  COMMAND_CHANNEL  └──────────────┘
//! ```

use std::io::BufRead;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use log::{debug, info, warn};

use crate::app::commands::WindlassCommand;

const COMMAND_DEPTH: usize = 8;

/// Inbound command channel: console task → control loop.
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, WindlassCommand, COMMAND_DEPTH> =
    Channel::new();

/// Parse one line and queue it.  Returns `true` if a command was queued.
///
/// Matching is exact and case-sensitive after stripping the line ending;
/// anything else is dropped.
pub fn submit_line(line: &str) -> bool {
    let text = line.trim_end_matches(['\r', '\n']);
    let Some(cmd) = WindlassCommand::parse(text) else {
        debug!("console: ignoring {:?}", text);
        return false;
    };
    if COMMAND_CHANNEL.try_send(cmd).is_err() {
        warn!("console: command channel full, dropping '{}'", cmd);
        return false;
    }
    true
}

/// Hand every pending command to `handler`, oldest first.
pub fn drain_commands(mut handler: impl FnMut(WindlassCommand)) {
    while let Ok(cmd) = COMMAND_CHANNEL.try_receive() {
        handler(cmd);
    }
}

/// Spawn the stdin reader thread.
pub fn spawn_command_reader() -> std::io::Result<std::thread::JoinHandle<()>> {
    std::thread::Builder::new()
        .name("console".into())
        .stack_size(4096)
        .spawn(|| {
            info!("console: accepting up / down / off / reset");
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                match line {
                    Ok(line) => {
                        submit_line(&line);
                    }
                    Err(e) => {
                        warn!("console: read error: {}", e);
                        break;
                    }
                }
            }
        })
}
