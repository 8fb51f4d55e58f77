//! GPIO/PWM-backed implementation of [`OutputPort`].
//!
//! Generic over `embedded-hal 1.0` traits so the same adapter drives
//! real pins on the HAT and trivial fakes in tests.  Relay polarity
//! (the printer relay is active-low on the HAT) is the pin wrapper's
//! business, not ours: `true` here always means "energized".
//!
//! Pin write failures are logged and the cached state is left unchanged;
//! a flaky relay must not take down the control loop.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::OutputPort;

pub struct GpioOutputs<PWR, DRY, LIGHT>
where
    PWR: OutputPin,
    DRY: OutputPin,
    LIGHT: SetDutyCycle,
{
    printer_relay: PWR,
    dryer_relay: DRY,
    light_pwm: LIGHT,
    // Cached state; OutputPin has no read-back.
    printer_on: bool,
    dryer_on: bool,
    light_level: f32,
}

impl<PWR, DRY, LIGHT> GpioOutputs<PWR, DRY, LIGHT>
where
    PWR: OutputPin,
    DRY: OutputPin,
    LIGHT: SetDutyCycle,
{
    /// Wrap the three output channels.  The printer relay starts
    /// energized (the printer should be powered at boot), the dryer and
    /// light start off.
    pub fn new(mut printer_relay: PWR, mut dryer_relay: DRY, mut light_pwm: LIGHT) -> Self {
        if printer_relay.set_high().is_err() {
            warn!("printer relay init write failed");
        }
        if dryer_relay.set_low().is_err() {
            warn!("dryer relay init write failed");
        }
        if light_pwm.set_duty_cycle_fully_off().is_err() {
            warn!("panel light init write failed");
        }
        Self {
            printer_relay,
            dryer_relay,
            light_pwm,
            printer_on: true,
            dryer_on: false,
            light_level: 0.0,
        }
    }
}

impl<PWR, DRY, LIGHT> OutputPort for GpioOutputs<PWR, DRY, LIGHT>
where
    PWR: OutputPin,
    DRY: OutputPin,
    LIGHT: SetDutyCycle,
{
    fn set_printer_power(&mut self, on: bool) {
        match self.printer_relay.set_state(PinState::from(on)) {
            Ok(()) => self.printer_on = on,
            Err(_) => warn!("printer relay write failed"),
        }
    }

    fn printer_power(&self) -> bool {
        self.printer_on
    }

    fn set_dryer(&mut self, on: bool) {
        match self.dryer_relay.set_state(PinState::from(on)) {
            Ok(()) => self.dryer_on = on,
            Err(_) => warn!("dryer relay write failed"),
        }
    }

    fn dryer(&self) -> bool {
        self.dryer_on
    }

    fn set_light_level(&mut self, level: f32) {
        let level = level.clamp(0.0, 1.0);
        let max = f32::from(self.light_pwm.max_duty_cycle());
        let duty = (level * max).round() as u16;
        match self.light_pwm.set_duty_cycle(duty) {
            Ok(()) => self.light_level = level,
            Err(_) => warn!("panel light write failed"),
        }
    }

    fn light_level(&self) -> f32 {
        self.light_level
    }
}
