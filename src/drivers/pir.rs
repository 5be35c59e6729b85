//! PIR presence sensor driver.
//!
//! HC-SR501-style module with a digital output: HIGH while motion is
//! detected.  Debouncing and retrigger hold time are handled by the
//! module itself, so the driver only samples the level.
//!
//! A failed GPIO read is logged and the previous good reading is
//! returned so a flaky sensor line cannot stall the control loop.  If
//! the line stays dead the last reading persists, and once that reading
//! is "no presence" the inactivity timeout closes the door as usual.

use embedded_hal::digital::InputPin;
use log::warn;

use crate::error::GpioError;

pub struct PirSensor<P> {
    pin: P,
    last: bool,
    read_errors: u32,
}

impl<P: InputPin> PirSensor<P> {
    pub fn new(pin: P) -> Self {
        Self {
            pin,
            last: false,
            read_errors: 0,
        }
    }

    /// Sample the sensor, propagating GPIO errors.
    pub fn try_read(&mut self) -> Result<bool, GpioError> {
        let level = self.pin.is_high().map_err(|_| GpioError::ReadFailed)?;
        self.last = level;
        Ok(level)
    }

    /// Sample the sensor, falling back to the last good reading on error.
    pub fn read(&mut self) -> bool {
        match self.try_read() {
            Ok(level) => level,
            Err(e) => {
                self.read_errors = self.read_errors.saturating_add(1);
                warn!("PIR: {e}, holding last reading ({})", self.last);
                self.last
            }
        }
    }

    /// Last good reading.
    pub fn last_reading(&self) -> bool {
        self.last
    }

    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}
