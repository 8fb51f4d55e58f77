//! Humidity-triggered dryer control with hysteresis.
//!
//! One tick per sensor poll.  The dryer switches on above `hum_high` and
//! off below `hum_low`; readings strictly inside the band never change
//! state, which keeps the relay from chattering around a single
//! threshold.
//!
//! A failed sensor read is a transient fault: reported once (log + UI),
//! then the loop keeps ticking and recovers silently on the next good
//! reading.

use log::{info, warn};

use crate::app::events::UiMessage;
use crate::app::ports::{EnvironmentSensor, OutputPort, UiSink};
use crate::config::ConsoleConfig;
use crate::error::SensorError;

/// One timestamped poll result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// What the hysteresis decided for this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryerAction {
    /// Humidity above the high threshold: drive (or keep) the relay on.
    TurnOn,
    /// Humidity below the low threshold: drive (or keep) the relay off.
    TurnOff,
    /// Inside the band: leave the relay alone.
    Hold,
}

/// Hysteresis controller over periodic humidity readings.
#[derive(Debug, Default)]
pub struct DryerController {
    /// Report-once latch for sensor faults.
    fault_latched: bool,
}

impl DryerController {
    pub fn new() -> Self {
        Self {
            fault_latched: false,
        }
    }

    /// Pure hysteresis decision, independent of any hardware.
    pub fn evaluate(humidity_pct: f32, config: &ConsoleConfig) -> DryerAction {
        if humidity_pct > config.hum_high {
            DryerAction::TurnOn
        } else if humidity_pct < config.hum_low {
            DryerAction::TurnOff
        } else {
            DryerAction::Hold
        }
    }

    /// One poll tick: read the sensor, report, drive the relay.
    ///
    /// Returns the reading when the sensor answered.
    pub fn poll(
        &mut self,
        config: &ConsoleConfig,
        sensor: &mut impl EnvironmentSensor,
        outputs: &mut impl OutputPort,
        sink: &mut impl UiSink,
    ) -> Option<EnvironmentReading> {
        let reading = match self.read(sensor) {
            Ok(r) => r,
            Err(e) => {
                if !self.fault_latched {
                    warn!("environment sensor fault: {e}");
                    sink.send(&UiMessage::Info("DHT error".into()));
                    self.fault_latched = true;
                }
                return None;
            }
        };
        if self.fault_latched {
            self.fault_latched = false;
            info!("environment sensor recovered");
        }

        sink.send(&UiMessage::Temperature(reading.temperature_c));
        sink.send(&UiMessage::Humidity(reading.humidity_pct));

        match Self::evaluate(reading.humidity_pct, config) {
            DryerAction::TurnOn => {
                outputs.set_dryer(true);
                sink.send(&UiMessage::Dryer(true));
            }
            DryerAction::TurnOff => {
                outputs.set_dryer(false);
                sink.send(&UiMessage::Dryer(false));
            }
            DryerAction::Hold => {}
        }
        Some(reading)
    }

    fn read(
        &mut self,
        sensor: &mut impl EnvironmentSensor,
    ) -> Result<EnvironmentReading, SensorError> {
        let temperature_c = sensor.read_temperature()?;
        let humidity_pct = sensor.read_humidity()?;
        Ok(EnvironmentReading {
            temperature_c,
            humidity_pct,
        })
    }
}
