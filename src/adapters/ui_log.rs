//! UI sink that serializes messages as JSON log lines.
//!
//! Stands in for the host plugin's message bus: every [`UiMessage`]
//! becomes one `{"type": ..., "message": ...}` line on the `ui` log
//! target, which is also exactly the wire shape a bus adapter would
//! forward.

use log::{info, warn};

use crate::app::events::UiMessage;
use crate::app::ports::UiSink;

#[derive(Debug, Default)]
pub struct JsonLogSink;

impl JsonLogSink {
    pub fn new() -> Self {
        Self
    }
}

impl UiSink for JsonLogSink {
    fn send(&mut self, message: &UiMessage) {
        match serde_json::to_string(&message.to_payload()) {
            Ok(line) => info!(target: "ui", "{line}"),
            Err(e) => warn!("UI message serialization failed: {e}"),
        }
    }
}
