//! Application core — windlass domain logic behind port traits.
//!
//! [`service::AppService`] dispatches edge and command events into the
//! control core ([`crate::control`], [`crate::safety`]).  All interaction
//! with hardware happens through the **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
