//! End-to-end scenarios through [`ConsoleService`] with recording mocks.
//!
//! Covers the full gesture path (press / release / hold with
//! suppression), both filament-change flows, the dryer hysteresis
//! sequence, printer lifecycle routing including the firmware-halt
//! power-cycle, and the front-end command surface.

use protoconsole::app::commands::ConsoleCommand;
use protoconsole::app::events::{PrinterEvent, UiFunction, UiMessage};
use protoconsole::app::ports::{PrinterState, ToolTemperatures};
use protoconsole::app::service::ConsoleService;
use protoconsole::config::ConsoleConfig;
use protoconsole::drivers::gesture::ButtonSignal;
use protoconsole::drivers::led_link::SerialLedLink;

use crate::mock_hw::{MockDelay, MockOutputs, MockPrinter, MockSensor, RecordingSink, SharedLed};

struct Rig {
    service: ConsoleService<SharedLed>,
    led: SharedLed,
    printer: MockPrinter,
    outputs: MockOutputs,
    delay: MockDelay,
    sink: RecordingSink,
}

impl Rig {
    fn new(state: PrinterState) -> Self {
        let led = SharedLed::new();
        Self {
            service: ConsoleService::new(ConsoleConfig::default(), SerialLedLink::new(led.clone())),
            led,
            printer: MockPrinter::new(state),
            outputs: MockOutputs::new(),
            delay: MockDelay::default(),
            sink: RecordingSink::default(),
        }
    }

    fn signal(&mut self, signal: ButtonSignal) {
        self.service.on_button_signal(
            signal,
            &mut self.printer,
            &mut self.outputs,
            &mut self.delay,
            &mut self.sink,
        );
    }

    fn event(&mut self, event: PrinterEvent) {
        self.service.handle_printer_event(
            &event,
            &mut self.printer,
            &mut self.outputs,
            &mut self.delay,
            &mut self.sink,
        );
    }

    fn command(&mut self, command: ConsoleCommand) {
        self.service.handle_command(
            &command,
            &mut self.printer,
            &mut self.outputs,
            &mut self.delay,
            &mut self.sink,
        );
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_sends_idle_animation_preamble() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.service.start();
    assert_eq!(rig.led.lines(), vec!["P3", "C0"]);
}

#[test]
fn shutdown_parks_light_and_dryer_but_not_printer_relay() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.outputs.light = 1.0;
    rig.outputs.dryer_on = true;
    rig.service.shutdown(&mut rig.outputs);
    assert_eq!(rig.outputs.light, 0.0);
    assert!(!rig.outputs.dryer_on);
    assert!(rig.outputs.printer_on, "mains must stay up across restarts");
}

// ── Gesture path ──────────────────────────────────────────────

#[test]
fn short_press_pauses_then_resumes() {
    let mut rig = Rig::new(PrinterState::Printing);

    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Released);
    assert_eq!(rig.printer.pauses, 1);
    assert_eq!(rig.printer.state, PrinterState::Paused);

    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Released);
    assert_eq!(rig.printer.resumes, 1);
    assert_eq!(rig.printer.state, PrinterState::Printing);
}

#[test]
fn release_after_hold_is_suppressed() {
    let mut rig = Rig::new(PrinterState::Printing);

    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    rig.signal(ButtonSignal::Released);

    // The hold started a mid-print change; the trailing release must not
    // also toggle pause.
    assert_eq!(rig.printer.pauses, 0);
    assert_eq!(rig.printer.resumes, 0);
    assert!(rig.printer.sent.contains(&"M600".to_string()));
}

#[test]
fn every_gesture_is_reported_to_the_ui() {
    let mut rig = Rig::new(PrinterState::Disconnected);
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    rig.signal(ButtonSignal::Released); // suppressed, no B1
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Released);

    let gestures: Vec<_> = rig
        .sink
        .messages
        .iter()
        .filter_map(|m| match m {
            UiMessage::Gesture(g) => Some(*g),
            _ => None,
        })
        .collect();
    assert_eq!(gestures, vec!["press", "held", "press", "release"]);
}

#[test]
fn release_when_ready_activates_front_end_queue() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Released);
    assert!(rig
        .sink
        .messages
        .contains(&UiMessage::Function(UiFunction::SetActive)));
}

// ── Filament change, idle flow ────────────────────────────────

#[test]
fn idle_change_then_confirm_restores_saved_target_once() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.printer.temps = Some(ToolTemperatures {
        actual: 25.0,
        target: 210.0,
    });

    // Long press from idle: heat, park, remember the target.
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    rig.signal(ButtonSignal::Released);
    assert_eq!(
        rig.printer.sent,
        vec![
            "M109 S210",
            "M117 Unloading filament, stand by",
            "M600 X119 Y308 Z427"
        ]
    );
    assert_eq!(rig.service.session().saved_target, Some(210.0));
    assert!(rig.service.session().is_awaiting());

    // Second long press confirms the new filament.
    rig.printer.sent.clear();
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    rig.signal(ButtonSignal::Released);
    assert_eq!(rig.printer.sent, vec!["M108"]);
    assert_eq!(rig.printer.set_temps, vec![210.0]);
    assert!(!rig.service.session().is_awaiting());

    // Prompt raised, then cleared.
    let prompts: Vec<_> = rig
        .sink
        .messages
        .iter()
        .filter_map(|m| match m {
            UiMessage::FilamentPrompt(s) => Some(s.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(prompts, vec!["Press when new filament is ready", ""]);
}

#[test]
fn hold_strobes_and_leaves_light_on() {
    let mut rig = Rig::new(PrinterState::Printing);
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    assert_eq!(rig.delay.waits_ms, vec![100, 100, 100, 100]);
    assert_eq!(rig.outputs.light, 1.0);
    assert!(rig.sink.messages.contains(&UiMessage::LightLevel(100)));
    assert!(rig.led.lines().contains(&"P5".to_string()));
}

#[test]
fn hold_without_tool_data_issues_no_commands() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.printer.temps = None;
    rig.signal(ButtonSignal::Pressed);
    rig.signal(ButtonSignal::Held);
    assert!(rig.printer.sent.is_empty());
    assert!(!rig.service.session().is_awaiting());
}

// ── Dryer loop ────────────────────────────────────────────────

#[test]
fn dryer_follows_hysteresis_band_across_polls() {
    let mut rig = Rig::new(PrinterState::Ready);
    let mut sensor = MockSensor::new(45.0);

    let poll = |rig: &mut Rig, sensor: &mut MockSensor, hum: f32| {
        sensor.humidity = hum;
        rig.service
            .poll_environment(sensor, &mut rig.outputs, &mut rig.sink);
    };

    poll(&mut rig, &mut sensor, 45.0);
    assert!(rig.outputs.dryer_on, "above the band switches on");
    poll(&mut rig, &mut sensor, 35.0);
    assert!(rig.outputs.dryer_on, "inside the band holds");
    poll(&mut rig, &mut sensor, 25.0);
    assert!(!rig.outputs.dryer_on, "below the band switches off");
    poll(&mut rig, &mut sensor, 35.0);
    assert!(!rig.outputs.dryer_on, "re-entering the band still holds");

    // Temp and Hum are reported on every successful poll.
    assert_eq!(rig.sink.count_kind("Temp"), 4);
    assert_eq!(rig.sink.count_kind("Hum"), 4);
}

#[test]
fn sensor_fault_is_reported_once_then_recovers() {
    let mut rig = Rig::new(PrinterState::Ready);
    let mut sensor = MockSensor::new(35.0);
    sensor.fail = true;

    for _ in 0..3 {
        let reading = rig
            .service
            .poll_environment(&mut sensor, &mut rig.outputs, &mut rig.sink);
        assert!(reading.is_none());
    }
    assert_eq!(
        rig.sink
            .messages
            .iter()
            .filter(|m| **m == UiMessage::Info("DHT error".into()))
            .count(),
        1
    );

    sensor.fail = false;
    let reading = rig
        .service
        .poll_environment(&mut sensor, &mut rig.outputs, &mut rig.sink);
    assert!(reading.is_some());
}

// ── Printer lifecycle events ──────────────────────────────────

#[test]
fn lifecycle_events_drive_led_animations() {
    let mut rig = Rig::new(PrinterState::Ready);

    rig.event(PrinterEvent::PrintStarted);
    assert_eq!(rig.led.lines(), vec!["C1"]);

    rig.led.clear();
    rig.event(PrinterEvent::PrintDone);
    assert_eq!(rig.led.lines(), vec!["P1"]);

    rig.led.clear();
    rig.event(PrinterEvent::PrintCancelled);
    assert_eq!(rig.led.lines(), vec!["P7", "C2"]);
}

#[test]
fn progress_updates_ui_and_led_bar() {
    let mut rig = Rig::new(PrinterState::Printing);

    rig.event(PrinterEvent::Progress(42));
    assert!(rig.sink.messages.contains(&UiMessage::Progress(42)));
    assert_eq!(rig.led.lines(), vec!["C1", "P8", "D42"]);

    // At 100% the bar is left for the PrintDone animation.
    rig.led.clear();
    rig.event(PrinterEvent::Progress(100));
    assert!(rig.sink.messages.contains(&UiMessage::Progress(100)));
    assert!(rig.led.lines().is_empty());
}

#[test]
fn print_failed_lifts_the_nozzle_once() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.event(PrinterEvent::PrintFailed {
        reason: "thermal runaway".into(),
    });
    assert_eq!(rig.printer.sent, vec!["G91", "G0 Z20"]);
    assert!(rig
        .sink
        .messages
        .contains(&UiMessage::Info("Error: Print Failed - thermal runaway".into())));
}

#[test]
fn firmware_halt_power_cycles_and_reconnects() {
    let mut rig = Rig::new(PrinterState::Error);
    rig.event(PrinterEvent::Error {
        message: "Printer halted. kill() called!".into(),
    });
    assert_eq!(rig.outputs.power_calls, vec![false, true]);
    assert_eq!(rig.delay.waits_ms, vec![3000, 3000]);
    assert_eq!(rig.printer.connects, 1);
    assert_eq!(rig.sink.count_kind("INFO"), 1);
}

#[test]
fn ordinary_error_is_surfaced_without_power_cycle() {
    let mut rig = Rig::new(PrinterState::Error);
    rig.event(PrinterEvent::Error {
        message: "serial timeout".into(),
    });
    assert!(rig.outputs.power_calls.is_empty());
    assert_eq!(rig.printer.connects, 0);
    assert!(rig
        .sink
        .messages
        .contains(&UiMessage::Info("Error event reported:\nserial timeout".into())));
}

#[test]
fn disconnect_deactivates_front_end_queue() {
    let mut rig = Rig::new(PrinterState::Disconnected);
    rig.event(PrinterEvent::Disconnected);
    assert!(rig
        .sink
        .messages
        .contains(&UiMessage::Function(UiFunction::SetNotActive)));
}

#[test]
fn script_upload_pops_a_notification() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.event(PrinterEvent::FileAdded {
        name: "purge.sh.gcode".into(),
    });
    assert!(rig
        .sink
        .messages
        .contains(&UiMessage::Popup("Script loaded".into())));

    rig.sink.messages.clear();
    rig.event(PrinterEvent::FileAdded {
        name: "benchy.gcode".into(),
    });
    assert!(rig.sink.messages.is_empty());
}

// ── Front-end commands ────────────────────────────────────────

#[test]
fn light_toggle_swings_between_off_and_full() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.command(ConsoleCommand::LightToggle);
    assert_eq!(rig.outputs.light, 1.0);
    rig.command(ConsoleCommand::LightToggle);
    assert_eq!(rig.outputs.light, 0.0);
    assert!(rig.sink.messages.contains(&UiMessage::LightLevel(100)));
    assert!(rig.sink.messages.contains(&UiMessage::LightLevel(0)));
}

#[test]
fn brightness_follows_perceptual_curve() {
    let mut rig = Rig::new(PrinterState::Ready);

    rig.command(ConsoleCommand::Brightness(100));
    assert!((rig.outputs.light - 1.0).abs() < 1e-4);

    rig.command(ConsoleCommand::Brightness(50));
    assert!((rig.outputs.light - 0.1).abs() < 1e-4);

    rig.command(ConsoleCommand::Brightness(0));
    assert!((rig.outputs.light - 0.01).abs() < 1e-4);
}

#[test]
fn dryer_toggle_reports_new_state() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.command(ConsoleCommand::DryerToggle);
    assert!(rig.outputs.dryer_on);
    assert!(rig.sink.messages.contains(&UiMessage::Dryer(true)));
}

#[test]
fn printer_toggle_flips_mains_relay() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.command(ConsoleCommand::PrinterToggle);
    assert!(!rig.outputs.printer_on);
    rig.command(ConsoleCommand::PrinterToggle);
    assert!(rig.outputs.printer_on);
    assert_eq!(rig.outputs.power_calls, vec![false, true]);
}

#[test]
fn change_filament_command_runs_the_held_flow() {
    let mut rig = Rig::new(PrinterState::Printing);
    rig.command(ConsoleCommand::ChangeFilament);
    assert_eq!(
        rig.printer.sent,
        vec!["M117 Changing filament", "M603 U100 L120", "M600"]
    );
}

#[test]
fn serial_passthrough_reaches_the_peripheral_verbatim() {
    let mut rig = Rig::new(PrinterState::Ready);
    rig.command(ConsoleCommand::PassSerial("B200".into()));
    assert_eq!(rig.led.lines(), vec!["B200"]);
}
