//! Outbound UI messages and inbound printer lifecycle events.
//!
//! The core emits [`UiMessage`]s through the
//! [`UiSink`](super::ports::UiSink) port; on the wire each becomes a
//! `{"type": ..., "message": ...}` payload, the shape the front end
//! already understands.  Printer lifecycle notifications arrive as
//! [`PrinterEvent`]s — a closed enumeration, matched exhaustively.

use serde::Serialize;
use serde_json::Value;

// ───────────────────────────────────────────────────────────────
// UI messages
// ───────────────────────────────────────────────────────────────

/// Named front-end actions carried by `FUNCTION` messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiFunction {
    SetActive,
    SetNotActive,
}

impl UiFunction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SetActive => "setActive",
            Self::SetNotActive => "setNotActive",
        }
    }
}

/// Structured messages for the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum UiMessage {
    /// `B1` — raw gesture report ("press" / "release" / "held").
    Gesture(&'static str),
    /// `FIL` — filament prompt text; empty clears the prompt.
    FilamentPrompt(String),
    /// `L` — panel light level, 0–100.
    LightLevel(u8),
    /// `DRYER` — dryer output state.
    Dryer(bool),
    /// `Temp` — enclosure temperature (°C).
    Temperature(f32),
    /// `Hum` — enclosure humidity (%).
    Humidity(f32),
    /// `PROGRESS` — print progress percent.
    Progress(u8),
    /// `INFO` — informational text.
    Info(String),
    /// `POP` — popup notification.
    Popup(String),
    /// `FUNCTION` — named front-end action.
    Function(UiFunction),
}

/// Wire shape of a UI message.
#[derive(Debug, Serialize)]
pub struct UiPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: Value,
}

impl UiMessage {
    /// The `type` discriminator the front end switches on.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gesture(_) => "B1",
            Self::FilamentPrompt(_) => "FIL",
            Self::LightLevel(_) => "L",
            Self::Dryer(_) => "DRYER",
            Self::Temperature(_) => "Temp",
            Self::Humidity(_) => "Hum",
            Self::Progress(_) => "PROGRESS",
            Self::Info(_) => "INFO",
            Self::Popup(_) => "POP",
            Self::Function(_) => "FUNCTION",
        }
    }

    /// Build the `{type, message}` wire payload.
    pub fn to_payload(&self) -> UiPayload {
        let message = match self {
            Self::Gesture(g) => Value::from(*g),
            Self::FilamentPrompt(s) | Self::Info(s) | Self::Popup(s) => Value::from(s.clone()),
            Self::LightLevel(n) | Self::Progress(n) => Value::from(*n),
            Self::Dryer(on) => Value::from(u8::from(*on)),
            Self::Temperature(v) | Self::Humidity(v) => Value::from(*v),
            Self::Function(f) => Value::from(f.as_str()),
        };
        UiPayload {
            kind: self.kind(),
            message,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Printer lifecycle events
// ───────────────────────────────────────────────────────────────

/// Lifecycle notifications from the printer host, routed by
/// [`EventRouter`](super::router::EventRouter).
#[derive(Debug, Clone, PartialEq)]
pub enum PrinterEvent {
    /// Firmware/communication error with the host's error text.
    Error { message: String },
    PrintStarted,
    PrintDone,
    PrintCancelled,
    /// Print failed with the host's failure reason.
    PrintFailed { reason: String },
    Disconnected,
    /// Progress update, 0–100 percent.
    Progress(u8),
    /// A file landed in the host's upload area.
    FileAdded { name: String },
}
