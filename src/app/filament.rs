//! Filament-change and pause/resume orchestration.
//!
//! A long-press means "deal with filament": start a swap when the printer
//! is printing or idle, or finish one (firmware manual-resume) when the
//! printer is waiting.  A short press-release toggles pause/resume.  The
//! branch taken depends on a *fresh* printer state snapshot at decision
//! time plus the live [`FilamentSession`].
//!
//! Command issuance is fire-and-forget; there is no retry logic.  The one
//! hard precondition is tool temperature data: when the host has none,
//! the change is aborted before any command leaves the orchestrator.

use embedded_hal::delay::DelayNs;
use log::info;

use crate::app::events::{UiFunction, UiMessage};
use crate::app::ports::{OutputPort, PrinterPort, PrinterState, UiSink};
use crate::config::ConsoleConfig;
use crate::drivers::led_link::{LedCommand, LedTransport, SerialLedLink, PATTERN_JUGGLE};
use crate::error::{PrinterError, Result};

/// Park position for an idle-state change (clear of the bed).
const CHANGE_PARK_POSITION: &str = "X119 Y308 Z427";

/// Prompt shown while the printer waits for fresh filament.
const FILAMENT_PROMPT: &str = "Press when new filament is ready";

/// Strobe timing for the hold acknowledgement (two 100 ms flashes).
const STROBE_MS: u32 = 100;

// ───────────────────────────────────────────────────────────────
// Session
// ───────────────────────────────────────────────────────────────

/// What the orchestrator is waiting for, if anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionMode {
    /// No swap in progress.
    #[default]
    None,
    /// M600 issued mid-print; waiting for the user to confirm new filament.
    AwaitingReadyAfterPrintingChange,
    /// Change started from idle; a temperature override may need undoing.
    AwaitingReadyAfterIdleChange,
}

/// Record of an in-progress filament swap.  At most one live session.
#[derive(Debug, Default)]
pub struct FilamentSession {
    /// Tool target captured exactly once, before any override is issued.
    pub saved_target: Option<f32>,
    pub mode: SessionMode,
}

impl FilamentSession {
    /// Whether a swap is waiting to be confirmed.
    pub fn is_awaiting(&self) -> bool {
        self.mode != SessionMode::None
    }

    fn clear(&mut self) {
        self.saved_target = None;
        self.mode = SessionMode::None;
    }
}

// ───────────────────────────────────────────────────────────────
// Orchestrator
// ───────────────────────────────────────────────────────────────

/// Drives pause/resume and filament-change sequences from gestures.
#[derive(Debug, Default)]
pub struct FilamentOrchestrator {
    session: FilamentSession,
}

impl FilamentOrchestrator {
    pub fn new() -> Self {
        Self {
            session: FilamentSession::default(),
        }
    }

    pub fn session(&self) -> &FilamentSession {
        &self.session
    }

    /// Short-press release: pause/resume, and tell the front end the
    /// console wants the queue active when the printer is ready.
    pub fn on_release(&mut self, printer: &mut impl PrinterPort, sink: &mut impl UiSink) {
        sink.send(&UiMessage::Gesture("release"));

        let state = printer.state();
        if state == PrinterState::Ready {
            sink.send(&UiMessage::Function(UiFunction::SetActive));
        }
        if state.is_paused() {
            printer.resume();
        } else if state == PrinterState::Printing {
            printer.pause();
        }
    }

    /// Long press: start or finish a filament swap.
    ///
    /// Every branch acknowledges the hold on the LED peripheral, strobes
    /// the panel light, and leaves it at full brightness for the swap.
    pub fn on_held<T: LedTransport>(
        &mut self,
        config: &ConsoleConfig,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        led: &mut SerialLedLink<T>,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) -> Result<()> {
        sink.send(&UiMessage::Gesture("held"));
        led.send(&LedCommand::Pattern(PATTERN_JUGGLE));
        strobe(outputs, delay);

        let state = printer.state();
        info!("held gesture with printer {state:?}, session {:?}", self.session.mode);

        let result = if state.is_paused() || self.session.is_awaiting() {
            self.resume_after_swap(printer, sink);
            Ok(())
        } else if state == PrinterState::Printing {
            self.begin_change_while_printing(config, printer, sink);
            Ok(())
        } else if state == PrinterState::Ready {
            self.begin_change_from_idle(config, printer, sink)
        } else {
            Ok(())
        };

        // Light on for the swap, whatever the branch decided.
        outputs.set_light_level(1.0);
        sink.send(&UiMessage::LightLevel(light_percent(outputs)));
        result
    }

    // ── Branches ──────────────────────────────────────────────

    /// Finish the swap: M108 tells the firmware the new filament is in.
    /// A saved temperature override is undone exactly once.
    fn resume_after_swap(&mut self, printer: &mut impl PrinterPort, sink: &mut impl UiSink) {
        printer.send("M108");
        if let Some(target) = self.session.saved_target.take() {
            printer.set_tool_temperature(target);
        }
        self.session.clear();
        sink.send(&UiMessage::FilamentPrompt(String::new()));
    }

    /// Mid-print swap: the firmware parks and pauses on M600 itself.
    fn begin_change_while_printing(
        &mut self,
        config: &ConsoleConfig,
        printer: &mut impl PrinterPort,
        sink: &mut impl UiSink,
    ) {
        printer.send("M117 Changing filament");
        printer.send(&format!(
            "M603 U{} L{}",
            config.filament_unload_length, config.filament_load_length
        ));
        printer.send("M600");
        self.session.saved_target = None;
        self.session.mode = SessionMode::AwaitingReadyAfterPrintingChange;
        sink.send(&UiMessage::FilamentPrompt(FILAMENT_PROMPT.into()));
    }

    /// Idle swap: may need to heat the nozzle first, and must remember
    /// the target it is about to clobber.
    fn begin_change_from_idle(
        &mut self,
        config: &ConsoleConfig,
        printer: &mut impl PrinterPort,
        sink: &mut impl UiSink,
    ) -> Result<()> {
        let temps = printer
            .tool_temperatures()
            .ok_or(PrinterError::MissingToolData)?;

        // Capture before any override so the resume path can restore it.
        self.session.saved_target = Some(temps.target);

        if temps.actual < config.min_extrude_temp_c {
            let heat_to = if temps.target < config.min_extrude_temp_c {
                config.swap_heat_temp_c
            } else {
                temps.target
            };
            printer.send(&format!("M109 S{heat_to:.0}"));
        }
        printer.send("M117 Unloading filament, stand by");
        printer.send(&format!("M600 {CHANGE_PARK_POSITION}"));
        self.session.mode = SessionMode::AwaitingReadyAfterIdleChange;
        sink.send(&UiMessage::FilamentPrompt(FILAMENT_PROMPT.into()));
        Ok(())
    }
}

/// Two quick flashes to acknowledge the hold.
fn strobe(outputs: &mut impl OutputPort, delay: &mut impl DelayNs) {
    for _ in 0..2 {
        outputs.set_light_level(1.0);
        delay.delay_ms(STROBE_MS);
        outputs.set_light_level(0.0);
        delay.delay_ms(STROBE_MS);
    }
}

fn light_percent(outputs: &impl OutputPort) -> u8 {
    (outputs.light_level() * 100.0).round() as u8
}
