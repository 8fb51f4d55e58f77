//! Serial link to the remote LED animation peripheral.
//!
//! The peripheral speaks a one-line text protocol: a single-letter opcode
//! followed by a value, newline-terminated.
//!
//! | Line     | Meaning                         |
//! |----------|---------------------------------|
//! | `P<n>`   | animation pattern select        |
//! | `C<n>`   | colour palette select           |
//! | `D<n>`   | print progress value (0–100)    |
//! | other    | raw passthrough from the UI     |
//!
//! The peripheral is optional hardware: when no transport is attached the
//! link is a documented no-op.  Write failures are logged once and never
//! propagate — LED feedback must not stall gesture handling.

use core::fmt::Write as _;

use log::warn;

use crate::error::LinkError;

// ── Pattern codes understood by the peripheral firmware ───────

pub const PATTERN_THEATER_CHASE: u8 = 1;
pub const PATTERN_PLASMA: u8 = 3;
pub const PATTERN_JUGGLE: u8 = 5;
pub const PATTERN_FIRE: u8 = 7;
pub const PATTERN_PROGRESS_BAR: u8 = 8;

// ── Palette codes ─────────────────────────────────────────────

pub const PALETTE_OCEAN: u8 = 0;
pub const PALETTE_PARTY: u8 = 1;
pub const PALETTE_LAVA: u8 = 2;

/// Maximum encoded line length, including the trailing newline.
const LINE_CAP: usize = 96;

/// A single outbound command.  Transient: constructed, encoded, sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedCommand<'a> {
    /// `P<n>` — select an animation pattern.
    Pattern(u8),
    /// `C<n>` — select a colour palette.
    Palette(u8),
    /// `D<n>` — report print progress (0–100).
    Progress(u8),
    /// Raw passthrough line from the front end.
    Raw(&'a str),
}

impl LedCommand<'_> {
    /// Encode into the wire line (opcode + value + `\n`).
    fn encode(&self) -> Result<heapless::String<LINE_CAP>, LinkError> {
        let mut line = heapless::String::new();
        let res = match self {
            Self::Pattern(n) => write!(line, "P{n}\n"),
            Self::Palette(n) => write!(line, "C{n}\n"),
            Self::Progress(n) => write!(line, "D{n}\n"),
            Self::Raw(s) => write!(line, "{s}\n"),
        };
        res.map_err(|_| LinkError::LineTooLong)?;
        Ok(line)
    }
}

/// Byte-stream transport to the peripheral.
pub trait LedTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError>;
}

impl LedTransport for Box<dyn LedTransport> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        (**self).write(bytes)
    }
}

/// Encoder + transmitter for [`LedCommand`]s.
///
/// Presence of the transport is decided once at startup and fixed for the
/// session, matching the hardware (the peripheral is soldered on or it
/// isn't).
pub struct SerialLedLink<T: LedTransport> {
    transport: Option<T>,
    /// Warn-once latch for transient write failures.
    write_warned: bool,
}

impl<T: LedTransport> SerialLedLink<T> {
    /// A link with an attached peripheral.
    pub fn new(transport: T) -> Self {
        Self {
            transport: Some(transport),
            write_warned: false,
        }
    }

    /// A link with no peripheral: every send is a no-op.
    pub fn detached() -> Self {
        Self {
            transport: None,
            write_warned: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.transport.is_some()
    }

    /// Encode and transmit one command.
    ///
    /// No-op without a transport.  Errors are reported through the log
    /// (once per fault episode) and swallowed.
    pub fn send(&mut self, cmd: &LedCommand<'_>) {
        let Some(transport) = self.transport.as_mut() else {
            return;
        };
        let result = cmd
            .encode()
            .and_then(|line| transport.write(line.as_bytes()));
        match result {
            Ok(()) => self.write_warned = false,
            Err(e) => {
                if !self.write_warned {
                    warn!("LED link fault ({e}), output suspended");
                    self.write_warned = true;
                }
            }
        }
    }

    /// Access the transport, e.g. for shutdown flushes.
    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.as_mut()
    }
}
