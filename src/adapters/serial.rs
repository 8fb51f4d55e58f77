//! Real serial transport for the LED peripheral (feature `serial`).
//!
//! The peripheral sits on a UART at 9600 baud.  Writes are small
//! single lines; a short timeout keeps a wedged port from ever stalling
//! gesture handling.

use std::io::Write as _;
use std::time::Duration;

use log::warn;

use crate::drivers::led_link::LedTransport;
use crate::error::LinkError;

const WRITE_TIMEOUT: Duration = Duration::from_millis(250);

pub struct SerialPortTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialPortTransport {
    /// Open the peripheral's UART (e.g. `/dev/ttyS0` at 9600).
    pub fn open(path: &str, baud: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, baud)
            .timeout(WRITE_TIMEOUT)
            .open()?;
        Ok(Self { port })
    }
}

impl LedTransport for SerialPortTransport {
    fn write(&mut self, bytes: &[u8]) -> Result<(), LinkError> {
        self.port.write_all(bytes).map_err(|e| {
            warn!("LED serial write failed: {e}");
            LinkError::WriteFailed
        })
    }
}
