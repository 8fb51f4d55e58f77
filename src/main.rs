//! Protosthetics console — host harness.
//!
//! Runs the full console core on a workstation against simulated
//! collaborators, with stdin standing in for the hardware callbacks.
//! One serialized control loop services everything, exactly as the
//! deployed wiring does:
//!
//! ```text
//!   stdin thread ──lines──▶ channel ──▶ ┌──────────────────────┐
//!   scheduler ──env-poll due──────────▶ │   ConsoleService     │
//!   hold timer ──Held synthesized────▶  └──────────────────────┘
//! ```
//!
//! Useful lines: `press`, `release`, `light`, `dryer`, `power`,
//! `change`, `brightness <0-100>`, `serial <line>`, `hum <pct>`,
//! `printer <state>`, `event <name> [arg]`, `quit`.
//!
//! With `--features serial` and `--led-port /dev/ttyS0` the LED commands
//! go to the real peripheral instead of the log.

use std::io::BufRead;
use std::sync::mpsc;
use std::time::{Duration, Instant};

use anyhow::Result;
use embedded_hal::delay::DelayNs;
use log::{info, warn};

use protoconsole::app::commands::ConsoleCommand;
use protoconsole::app::events::PrinterEvent;
use protoconsole::app::ports::{
    EnvironmentSensor, OutputPort, PrinterPort, PrinterState, ToolTemperatures,
};
use protoconsole::app::service::ConsoleService;
use protoconsole::adapters::ui_log::JsonLogSink;
use protoconsole::config::ConsoleConfig;
use protoconsole::control::dryer::EnvironmentReading;
use protoconsole::drivers::gesture::{ButtonSignal, HoldTimer};
use protoconsole::drivers::led_link::{LedTransport, SerialLedLink};
use protoconsole::scheduler::{PeriodicTask, PollDelegate, Scheduler};
use protoconsole::{LinkError, SensorError};

const ENV_POLL: &str = "env-poll";
const TICK_MS: u32 = 50;

// ── Simulated collaborators ───────────────────────────────────

/// Printer host stand-in: tracks state, logs every command verbatim.
struct SimPrinter {
    state: PrinterState,
    temps: Option<ToolTemperatures>,
}

impl SimPrinter {
    fn new() -> Self {
        Self {
            state: PrinterState::Ready,
            temps: Some(ToolTemperatures {
                actual: 22.5,
                target: 0.0,
            }),
        }
    }
}

impl PrinterPort for SimPrinter {
    fn state(&self) -> PrinterState {
        self.state
    }
    fn tool_temperatures(&self) -> Option<ToolTemperatures> {
        self.temps
    }
    fn send(&mut self, command: &str) {
        info!(target: "printer", "> {command}");
    }
    fn set_tool_temperature(&mut self, target: f32) {
        info!(target: "printer", "> set tool0 target {target:.0}");
        if let Some(t) = &mut self.temps {
            t.target = target;
        }
    }
    fn pause(&mut self) {
        info!(target: "printer", "> pause");
        self.state = PrinterState::Paused;
    }
    fn resume(&mut self) {
        info!(target: "printer", "> resume");
        self.state = PrinterState::Printing;
    }
    fn connect(&mut self) {
        info!(target: "printer", "> connect");
        self.state = PrinterState::Ready;
    }
}

/// HAT outputs stand-in.
struct SimOutputs {
    printer_on: bool,
    dryer_on: bool,
    light: f32,
}

impl SimOutputs {
    fn new() -> Self {
        Self {
            printer_on: true,
            dryer_on: false,
            light: 0.0,
        }
    }
}

impl OutputPort for SimOutputs {
    fn set_printer_power(&mut self, on: bool) {
        if on != self.printer_on {
            info!(target: "gpio", "printer relay {}", if on { "on" } else { "off" });
        }
        self.printer_on = on;
    }
    fn printer_power(&self) -> bool {
        self.printer_on
    }
    fn set_dryer(&mut self, on: bool) {
        if on != self.dryer_on {
            info!(target: "gpio", "dryer relay {}", if on { "on" } else { "off" });
        }
        self.dryer_on = on;
    }
    fn dryer(&self) -> bool {
        self.dryer_on
    }
    fn set_light_level(&mut self, level: f32) {
        self.light = level.clamp(0.0, 1.0);
    }
    fn light_level(&self) -> f32 {
        self.light
    }
}

/// Enclosure sensor stand-in; humidity is settable from stdin (`hum 45`).
struct SimSensor {
    humidity: f32,
}

impl EnvironmentSensor for SimSensor {
    fn read_temperature(&mut self) -> Result<f32, SensorError> {
        Ok(22.0)
    }
    fn read_humidity(&mut self) -> Result<f32, SensorError> {
        Ok(self.humidity)
    }
}

/// Thread-sleeping delay for the strobe and power-cycle waits.
struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// LED transport that logs the protocol lines (used without `--led-port`).
struct LogTransport;

impl LedTransport for LogTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        info!(target: "led", "{}", String::from_utf8_lossy(bytes).trim_end());
        Ok(())
    }
}

/// Collects which scheduler tasks came due this tick.
#[derive(Default)]
struct DueFlags {
    env_poll: bool,
}

impl PollDelegate for DueFlags {
    fn on_poll_due(&mut self, label: &str) {
        if label == ENV_POLL {
            self.env_poll = true;
        }
    }
}

// ── Entry point ───────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ConsoleConfig::default();
    let hold_ms = config.hold_time_ms;
    let poll_ms = config.env_poll_interval_secs * 1000;

    let mut service = build_service(config)?;
    let mut printer = SimPrinter::new();
    let mut outputs = SimOutputs::new();
    let mut sensor = SimSensor { humidity: 35.0 };
    let mut sink = JsonLogSink::new();
    let mut delay = StdDelay;

    let mut scheduler = Scheduler::new();
    scheduler
        .add(PeriodicTask {
            label: ENV_POLL,
            interval_ms: poll_ms,
            enabled: true,
        })
        .map_err(anyhow::Error::msg)?;
    let mut hold_timer = HoldTimer::new(hold_ms);

    service.start();
    info!("type 'help' for the command list, 'quit' to exit");

    // stdin feeds the loop through a channel so the control thread
    // never blocks on a read.
    let (tx, rx) = mpsc::channel::<String>();
    std::thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });

    let started = Instant::now();
    loop {
        let now_ms = started.elapsed().as_millis() as u32;

        // Synthesized hold: the sim button has no hold callback.
        if hold_timer.poll(now_ms) {
            service.on_button_signal(
                ButtonSignal::Held,
                &mut printer,
                &mut outputs,
                &mut delay,
                &mut sink,
            );
        }

        let mut due = DueFlags::default();
        scheduler.tick(TICK_MS, &mut due);
        if due.env_poll {
            if let Some(EnvironmentReading { humidity_pct, .. }) =
                service.poll_environment(&mut sensor, &mut outputs, &mut sink)
            {
                info!(target: "env", "humidity {humidity_pct:.1}%");
            }
        }

        while let Ok(line) = rx.try_recv() {
            if !dispatch(
                &line,
                now_ms,
                &mut service,
                &mut hold_timer,
                &mut printer,
                &mut outputs,
                &mut sensor,
                &mut delay,
                &mut sink,
            ) {
                service.shutdown(&mut outputs);
                return Ok(());
            }
        }

        std::thread::sleep(Duration::from_millis(u64::from(TICK_MS)));
    }
}

#[cfg(feature = "serial")]
fn build_service(config: ConsoleConfig) -> Result<ConsoleService<Box<dyn LedTransport>>> {
    use protoconsole::adapters::serial::SerialPortTransport;

    let mut args = std::env::args().skip(1);
    let mut led_port = None;
    while let Some(arg) = args.next() {
        if arg == "--led-port" {
            led_port = args.next();
        }
    }
    let link = match led_port {
        Some(path) => {
            let transport = SerialPortTransport::open(&path, 9600)?;
            SerialLedLink::new(Box::new(transport) as Box<dyn LedTransport>)
        }
        None => SerialLedLink::new(Box::new(LogTransport) as Box<dyn LedTransport>),
    };
    Ok(ConsoleService::new(config, link))
}

#[cfg(not(feature = "serial"))]
fn build_service(config: ConsoleConfig) -> Result<ConsoleService<LogTransport>> {
    Ok(ConsoleService::new(config, SerialLedLink::new(LogTransport)))
}

/// Parse one stdin line; returns `false` on `quit`.
#[allow(clippy::too_many_arguments)]
fn dispatch<T: LedTransport>(
    line: &str,
    now_ms: u32,
    service: &mut ConsoleService<T>,
    hold_timer: &mut HoldTimer,
    printer: &mut SimPrinter,
    outputs: &mut SimOutputs,
    sensor: &mut SimSensor,
    delay: &mut StdDelay,
    sink: &mut JsonLogSink,
) -> bool {
    let mut parts = line.split_whitespace();
    match parts.next() {
        Some("press") => {
            hold_timer.on_down(now_ms);
            service.on_button_signal(ButtonSignal::Pressed, printer, outputs, delay, sink);
        }
        Some("release") => {
            hold_timer.on_up();
            service.on_button_signal(ButtonSignal::Released, printer, outputs, delay, sink);
        }
        Some("light") => {
            service.handle_command(&ConsoleCommand::LightToggle, printer, outputs, delay, sink);
        }
        Some("dryer") => {
            service.handle_command(&ConsoleCommand::DryerToggle, printer, outputs, delay, sink);
        }
        Some("power") => {
            service.handle_command(&ConsoleCommand::PrinterToggle, printer, outputs, delay, sink);
        }
        Some("change") => {
            service.handle_command(&ConsoleCommand::ChangeFilament, printer, outputs, delay, sink);
        }
        Some("brightness") => match parts.next().and_then(|v| v.parse::<u8>().ok()) {
            Some(pct) => service.handle_command(
                &ConsoleCommand::Brightness(pct.min(100)),
                printer,
                outputs,
                delay,
                sink,
            ),
            None => warn!("usage: brightness <0-100>"),
        },
        Some("serial") => {
            let payload: String = parts.collect::<Vec<_>>().join(" ");
            service.handle_command(
                &ConsoleCommand::PassSerial(payload),
                printer,
                outputs,
                delay,
                sink,
            );
        }
        Some("hum") => match parts.next().and_then(|v| v.parse::<f32>().ok()) {
            Some(pct) => sensor.humidity = pct,
            None => warn!("usage: hum <percent>"),
        },
        Some("printer") => match parts.next() {
            Some("ready") => printer.state = PrinterState::Ready,
            Some("printing") => printer.state = PrinterState::Printing,
            Some("paused") => printer.state = PrinterState::Paused,
            Some("pausing") => printer.state = PrinterState::Pausing,
            Some("disconnected") => printer.state = PrinterState::Disconnected,
            _ => warn!("usage: printer <ready|printing|paused|pausing|disconnected>"),
        },
        Some("event") => {
            if let Some(event) = parse_event(parts.next(), &parts.collect::<Vec<_>>().join(" ")) {
                service.handle_printer_event(&event, printer, outputs, delay, sink);
            } else {
                warn!("unknown event");
            }
        }
        Some("help") => {
            info!(
                "press | release | light | dryer | power | change | \
                 brightness <n> | serial <line> | hum <pct> | printer <state> | \
                 event <started|done|cancelled|failed|error|disconnected|progress|file> [arg] | quit"
            );
        }
        Some("quit") => return false,
        Some(other) => warn!("unknown command '{other}'"),
        None => {}
    }
    true
}

fn parse_event(name: Option<&str>, arg: &str) -> Option<PrinterEvent> {
    match name? {
        "started" => Some(PrinterEvent::PrintStarted),
        "done" => Some(PrinterEvent::PrintDone),
        "cancelled" => Some(PrinterEvent::PrintCancelled),
        "failed" => Some(PrinterEvent::PrintFailed {
            reason: arg.to_string(),
        }),
        "error" => Some(PrinterEvent::Error {
            message: arg.to_string(),
        }),
        "disconnected" => Some(PrinterEvent::Disconnected),
        "progress" => arg.parse::<u8>().ok().map(PrinterEvent::Progress),
        "file" => Some(PrinterEvent::FileAdded {
            name: arg.to_string(),
        }),
        _ => None,
    }
}
