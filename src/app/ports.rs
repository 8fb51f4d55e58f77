//! Port traits — the boundary between the console core and the outside
//! world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ConsoleService (domain)
//! ```
//!
//! Driven adapters (printer connection, GPIO outputs, humidity sensor,
//! front-end message bus) implement these traits.  The core consumes them
//! via generics at call sites, so it never touches hardware directly and
//! every scenario is testable with recording mocks.
//!
//! Printer command issuance is fire-and-forget: the core never confirms
//! execution, it only reads back the handful of status queries below.

use crate::app::events::UiMessage;
use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Printer collaborator (driven adapter: domain → printer host)
// ───────────────────────────────────────────────────────────────

/// Connection state snapshot, queried fresh at every decision point and
/// never cached across orchestration steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterState {
    /// Connected and idle, ready for a job.
    Ready,
    Printing,
    Paused,
    Pausing,
    Disconnected,
    Error,
}

impl PrinterState {
    /// Paused or on the way there.
    pub fn is_paused(self) -> bool {
        matches!(self, Self::Paused | Self::Pausing)
    }
}

/// Temperatures for the active tool.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToolTemperatures {
    /// Measured nozzle temperature (°C).
    pub actual: f32,
    /// Configured target (°C); 0 when the heater is off.
    pub target: f32,
}

/// The printer host connection.
pub trait PrinterPort {
    /// Current connection/job state.
    fn state(&self) -> PrinterState;

    /// Temperatures for the active tool, `None` when the host has no
    /// data for it (treated as a defect to surface, never arithmetic
    /// on a missing value).
    fn tool_temperatures(&self) -> Option<ToolTemperatures>;

    /// Send one G-code/M-code line verbatim.  Format compatibility with
    /// the firmware is the collaborator's contract.
    fn send(&mut self, command: &str);

    /// Set the active tool's target temperature (°C).
    fn set_tool_temperature(&mut self, target: f32);

    fn pause(&mut self);
    fn resume(&mut self);
    fn connect(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Console outputs (driven adapter: domain → GPIO/PWM)
// ───────────────────────────────────────────────────────────────

/// Digital and PWM outputs on the console HAT.
pub trait OutputPort {
    /// Printer mains relay.
    fn set_printer_power(&mut self, on: bool);
    fn printer_power(&self) -> bool;

    /// Filament dryer relay.
    fn set_dryer(&mut self, on: bool);
    fn dryer(&self) -> bool;

    /// Panel light PWM level, 0.0–1.0.
    fn set_light_level(&mut self, level: f32);
    fn light_level(&self) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Environment sensor (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Combined temperature/humidity sensor, polled periodically.
/// Each read is independently fallible; a failure is a transient fault,
/// not a crash.
pub trait EnvironmentSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError>;
    fn read_humidity(&mut self) -> Result<f32, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// UI notification sink (domain → front end)
// ───────────────────────────────────────────────────────────────

/// The core emits structured [`UiMessage`]s through this port.  Adapters
/// decide where they go (plugin message bus, log lines, test recorder).
pub trait UiSink {
    fn send(&mut self, message: &UiMessage);
}
