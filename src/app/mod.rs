//! Application core — pure domain logic, zero I/O.
//!
//! Gesture dispatch, filament-change orchestration, lifecycle-event
//! routing, and the front-end command surface.  All interaction with
//! hardware happens through the **port traits** in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod filament;
pub mod ports;
pub mod router;
pub mod service;
