//! Protosthetics console core.
//!
//! Orchestrates the control console HAT attached to a 3D-printer host:
//! button gesture handling, filament-change and pause/resume sequencing,
//! the humidity-triggered dryer loop, and the serial LED peripheral.
//! Hardware is reached exclusively through the port traits in
//! [`app::ports`], so the whole core runs and tests on the host.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod drivers;
pub mod scheduler;

pub mod adapters;

mod error;

pub use error::{Error, LinkError, PrinterError, Result, SensorError};
