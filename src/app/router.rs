//! Printer lifecycle event routing.
//!
//! A stateless, exhaustive mapping from [`PrinterEvent`] to LED patterns,
//! UI notifications, and recovery actions.  Reactions for different
//! events are independent and order-insensitive.
//!
//! The one automatic recovery in the whole system lives here: a firmware
//! halt (the error text carries the `kill()` marker) power-cycles the
//! printer relay and reconnects.  Everything else is surfaced, never
//! retried.

use embedded_hal::delay::DelayNs;
use log::{debug, warn};

use crate::app::events::{PrinterEvent, UiFunction, UiMessage};
use crate::app::ports::{OutputPort, PrinterPort, UiSink};
use crate::config::ConsoleConfig;
use crate::drivers::led_link::{
    LedCommand, LedTransport, SerialLedLink, PALETTE_LAVA, PALETTE_PARTY, PATTERN_FIRE,
    PATTERN_PROGRESS_BAR, PATTERN_THEATER_CHASE,
};

/// Substring of the firmware's fatal-halt error text.
const FATAL_HALT_MARKER: &str = "kill()";

/// Routes printer lifecycle events to their reactions.
#[derive(Debug, Default)]
pub struct EventRouter;

impl EventRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn route<T: LedTransport>(
        &self,
        config: &ConsoleConfig,
        event: &PrinterEvent,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        led: &mut SerialLedLink<T>,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) {
        match event {
            PrinterEvent::Error { message } => {
                sink.send(&UiMessage::Info(format!("Error event reported:\n{message}")));
                if message.contains(FATAL_HALT_MARKER) {
                    warn!("firmware halt detected, power-cycling printer");
                    power_cycle(config, printer, outputs, delay);
                }
            }
            PrinterEvent::PrintStarted => {
                led.send(&LedCommand::Palette(PALETTE_PARTY));
            }
            PrinterEvent::PrintDone => {
                led.send(&LedCommand::Pattern(PATTERN_THEATER_CHASE));
            }
            PrinterEvent::PrintCancelled => {
                led.send(&LedCommand::Pattern(PATTERN_FIRE));
                led.send(&LedCommand::Palette(PALETTE_LAVA));
            }
            PrinterEvent::PrintFailed { reason } => {
                sink.send(&UiMessage::Info(format!("Error: Print Failed - {reason}")));
                // Lift the nozzle clear of the (possibly detached) part.
                printer.send("G91");
                printer.send("G0 Z20");
            }
            PrinterEvent::Disconnected => {
                sink.send(&UiMessage::Function(UiFunction::SetNotActive));
            }
            PrinterEvent::Progress(percent) => {
                sink.send(&UiMessage::Progress(*percent));
                if *percent < 100 {
                    led.send(&LedCommand::Palette(PALETTE_PARTY));
                    led.send(&LedCommand::Pattern(PATTERN_PROGRESS_BAR));
                    led.send(&LedCommand::Progress(*percent));
                }
                // 100% is superseded by PrintDone on the LED side.
            }
            PrinterEvent::FileAdded { name } => {
                if name.ends_with(".sh.gcode") {
                    sink.send(&UiMessage::Popup("Script loaded".into()));
                } else {
                    debug!("file added: {name}");
                }
            }
        }
    }
}

/// Off, settle, on, settle, reconnect.
fn power_cycle(
    config: &ConsoleConfig,
    printer: &mut impl PrinterPort,
    outputs: &mut impl OutputPort,
    delay: &mut impl DelayNs,
) {
    outputs.set_printer_power(false);
    delay.delay_ms(config.power_cycle_delay_ms);
    outputs.set_printer_power(true);
    delay.delay_ms(config.power_cycle_delay_ms);
    printer.connect();
}
