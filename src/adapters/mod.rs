//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements   | Connects to                     |
//! |------------|--------------|---------------------------------|
//! | `console`  | —            | stdin command reader → channel  |
//! | `hardware` | RelayPort    | ESP32 GPIO relay outputs        |
//! | `log_sink` | EventSink    | Serial log output (Signal K)    |
//! | `nvs`      | ConfigPort   | NVS / in-memory store           |
//! |            | StoragePort  |                                 |
//! | `time`     | —            | ESP32 system timer              |

pub mod console;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod time;
