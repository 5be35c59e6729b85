//! Simulated GPIO for host builds.
//!
//! [`SimPin`] implements the `embedded-hal` digital traits on top of a
//! shared cell, so a test can keep one clone to drive or observe the level
//! while a driver owns another.  A pin can be switched to "faulty" to make
//! every access fail.

use core::cell::Cell;
use std::rc::Rc;

use embedded_hal::digital::{ErrorKind, ErrorType, InputPin, OutputPin};

/// Error returned by a faulty [`SimPin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPinError;

impl embedded_hal::digital::Error for SimPinError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

/// A shared, clonable simulated pin.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    level: Rc<Cell<bool>>,
    faulty: Rc<Cell<bool>>,
    writes: Rc<Cell<u32>>,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        let pin = Self::default();
        pin.level.set(high);
        pin
    }

    /// Drive the level seen by an input reader.
    pub fn set(&self, high: bool) {
        self.level.set(high);
    }

    /// Current level (as last driven by either side).
    pub fn is_set_high(&self) -> bool {
        self.level.get()
    }

    /// Make every subsequent access fail (or succeed again).
    pub fn set_faulty(&self, faulty: bool) {
        self.faulty.set(faulty);
    }

    /// Number of successful output writes.
    pub fn writes(&self) -> u32 {
        self.writes.get()
    }

    fn check(&self) -> Result<(), SimPinError> {
        if self.faulty.get() {
            Err(SimPinError)
        } else {
            Ok(())
        }
    }

    fn write(&mut self, high: bool) -> Result<(), SimPinError> {
        self.check()?;
        self.level.set(high);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

impl ErrorType for SimPin {
    type Error = SimPinError;
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        self.check()?;
        Ok(self.level.get())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true)
    }
}
