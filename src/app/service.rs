//! Console service — the hexagonal core.
//!
//! [`ConsoleService`] owns the gesture detector, the filament
//! orchestrator, the dryer controller, the event router, and the LED
//! link.  All hardware I/O flows through port traits injected at call
//! sites, so the whole service runs against recording mocks on the host.
//!
//! ```text
//!  button signals ──▶ ┌─────────────────────────┐ ──▶ UiSink
//!  env poll ticks ──▶ │     ConsoleService      │ ──▶ PrinterPort
//!  printer events ──▶ │ gestures · swap · dryer │ ──▶ OutputPort
//!  UI commands    ──▶ └─────────────────────────┘ ──▶ LED link
//! ```
//!
//! Callbacks are serialized by the caller (one control thread); nothing
//! here needs a lock.

use embedded_hal::delay::DelayNs;
use log::{error, info};

use crate::app::commands::ConsoleCommand;
use crate::app::events::{PrinterEvent, UiMessage};
use crate::app::filament::{FilamentOrchestrator, FilamentSession};
use crate::app::ports::{EnvironmentSensor, OutputPort, PrinterPort, UiSink};
use crate::app::router::EventRouter;
use crate::config::ConsoleConfig;
use crate::control::dryer::{DryerController, EnvironmentReading};
use crate::drivers::gesture::{ButtonSignal, GestureDetector, GestureEvent};
use crate::drivers::led_link::{LedCommand, LedTransport, SerialLedLink, PALETTE_OCEAN, PATTERN_PLASMA};

/// The console orchestration core.
pub struct ConsoleService<T: LedTransport> {
    config: ConsoleConfig,
    gesture: GestureDetector,
    orchestrator: FilamentOrchestrator,
    dryer: DryerController,
    router: EventRouter,
    led: SerialLedLink<T>,
}

impl<T: LedTransport> ConsoleService<T> {
    /// Construct the service.  Transport presence is fixed for the
    /// session; call [`start`](Self::start) next.
    pub fn new(config: ConsoleConfig, led: SerialLedLink<T>) -> Self {
        Self {
            config,
            gesture: GestureDetector::new(),
            orchestrator: FilamentOrchestrator::new(),
            dryer: DryerController::new(),
            router: EventRouter::new(),
            led,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Send the LED idle preamble and log the configured thresholds.
    pub fn start(&mut self) {
        self.led.send(&LedCommand::Pattern(PATTERN_PLASMA));
        self.led.send(&LedCommand::Palette(PALETTE_OCEAN));
        info!(
            "console started, dryer band {:.0}-{:.0}%, LED peripheral {}",
            self.config.hum_low,
            self.config.hum_high,
            if self.led.is_attached() { "attached" } else { "absent" }
        );
    }

    /// Park the outputs the core owns.  The printer relay is left alone —
    /// cutting mains on shutdown is the operator's call, not ours.
    pub fn shutdown(&mut self, outputs: &mut impl OutputPort) {
        outputs.set_light_level(0.0);
        outputs.set_dryer(false);
        info!("console shut down");
    }

    // ── Button path ───────────────────────────────────────────

    /// Feed one raw button signal; classifies and dispatches the gesture.
    pub fn on_button_signal(
        &mut self,
        signal: ButtonSignal,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) {
        match self.gesture.on_signal(signal) {
            Some(GestureEvent::Press) => {
                sink.send(&UiMessage::Gesture("press"));
            }
            Some(GestureEvent::Release) => {
                self.orchestrator.on_release(printer, sink);
            }
            Some(GestureEvent::Held) => {
                self.run_held(printer, outputs, delay, sink);
            }
            None => {} // release swallowed by a hold
        }
    }

    // ── Periodic poll ─────────────────────────────────────────

    /// One environment tick: read the sensor, drive the dryer, report.
    pub fn poll_environment(
        &mut self,
        sensor: &mut impl EnvironmentSensor,
        outputs: &mut impl OutputPort,
        sink: &mut impl UiSink,
    ) -> Option<EnvironmentReading> {
        self.dryer.poll(&self.config, sensor, outputs, sink)
    }

    // ── Printer lifecycle ─────────────────────────────────────

    pub fn handle_printer_event(
        &mut self,
        event: &PrinterEvent,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) {
        self.router.route(
            &self.config,
            event,
            printer,
            outputs,
            &mut self.led,
            delay,
            sink,
        );
    }

    // ── Front-end commands ────────────────────────────────────

    pub fn handle_command(
        &mut self,
        command: &ConsoleCommand,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) {
        match command {
            ConsoleCommand::LightToggle => {
                let level = if outputs.light_level() > 0.0 { 0.0 } else { 1.0 };
                outputs.set_light_level(level);
                info!("light toggled to {level:.2}");
                sink.send(&UiMessage::LightLevel(light_percent(outputs)));
            }
            ConsoleCommand::DryerToggle => {
                let on = !outputs.dryer();
                outputs.set_dryer(on);
                info!("dryer toggled {}", if on { "on" } else { "off" });
                sink.send(&UiMessage::Dryer(on));
            }
            ConsoleCommand::PrinterToggle => {
                let on = !outputs.printer_power();
                outputs.set_printer_power(on);
                info!("printer power toggled {}", if on { "on" } else { "off" });
                sink.send(&UiMessage::Info(format!(
                    "Printer power {}",
                    if on { "on" } else { "off" }
                )));
            }
            ConsoleCommand::ChangeFilament => {
                self.run_held(printer, outputs, delay, sink);
            }
            ConsoleCommand::Brightness(percent) => {
                // Perceptual curve: 0 -> 1%, 50 -> 10%, 100 -> 100%.
                let level = (10f32.powf(f32::from(*percent) / 50.0) / 100.0).min(1.0);
                outputs.set_light_level(level);
                sink.send(&UiMessage::LightLevel(light_percent(outputs)));
            }
            ConsoleCommand::PassSerial(payload) => {
                self.led.send(&LedCommand::Raw(payload));
                info!("serial passthrough sent");
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Live filament session (for diagnostics and tests).
    pub fn session(&self) -> &FilamentSession {
        self.orchestrator.session()
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_held(
        &mut self,
        printer: &mut impl PrinterPort,
        outputs: &mut impl OutputPort,
        delay: &mut impl DelayNs,
        sink: &mut impl UiSink,
    ) {
        if let Err(e) = self.orchestrator.on_held(
            &self.config,
            printer,
            outputs,
            &mut self.led,
            delay,
            sink,
        ) {
            // Surfaced, not retried: the swap never started.
            error!("filament change aborted: {e}");
        }
    }
}

fn light_percent(outputs: &impl OutputPort) -> u8 {
    (outputs.light_level() * 100.0).round() as u8
}
