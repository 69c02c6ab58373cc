//! HALMET anchor windlass firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod events;
pub mod pins;
pub mod safety;

// Hardware-facing modules. On host targets the drivers fall back to
// simulation stubs so the crate still builds and tests.
pub mod adapters;
pub mod drivers;
pub mod sensors;
