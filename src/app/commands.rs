//! Inbound commands from the front end.
//!
//! These mirror the console's simple API surface: actions the web UI can
//! request that the [`ConsoleService`](super::service::ConsoleService)
//! interprets against the live hardware.

/// Commands the front end can send into the console core.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    /// Toggle the panel light between off and full brightness.
    LightToggle,
    /// Toggle the filament dryer relay.
    DryerToggle,
    /// Toggle the printer mains relay.
    PrinterToggle,
    /// Run the filament-change sequence, as if the button were held.
    ChangeFilament,
    /// Set the panel light from a 0–100 slider (perceptual log curve).
    Brightness(u8),
    /// Pass a raw line through to the LED peripheral.
    PassSerial(String),
}
