//! Single-colour indicator LED with steady and blinking modes.
//!
//! The main loop calls [`IndicatorLed::tick`] each control cycle; in
//! `Blink` mode the output toggles every `semi_period_ms`.

use embedded_hal::digital::OutputPin;

use crate::error::GpioError;
use crate::fsm::context::LedMode;

pub struct IndicatorLed<P> {
    pin: P,
    mode: LedMode,
    lit: bool,
    last_toggle_ms: u64,
    semi_period_ms: u32,
}

impl<P: OutputPin> IndicatorLed<P> {
    pub fn new(pin: P, semi_period_ms: u32) -> Self {
        Self {
            pin,
            mode: LedMode::Off,
            lit: false,
            last_toggle_ms: 0,
            semi_period_ms,
        }
    }

    /// Switch mode.  Re-applying the current mode is a no-op so a blink
    /// phase is not restarted every tick.
    pub fn set_mode(&mut self, mode: LedMode, now_ms: u64) -> Result<(), GpioError> {
        if mode == self.mode {
            return Ok(());
        }
        self.mode = mode;
        self.last_toggle_ms = now_ms;
        match mode {
            LedMode::Off => self.write(false),
            LedMode::On | LedMode::Blink => self.write(true),
        }
    }

    /// Advance the blink phase.
    pub fn tick(&mut self, now_ms: u64) -> Result<(), GpioError> {
        if self.mode != LedMode::Blink {
            return Ok(());
        }
        if now_ms.saturating_sub(self.last_toggle_ms) >= u64::from(self.semi_period_ms) {
            self.last_toggle_ms = now_ms;
            return self.write(!self.lit);
        }
        Ok(())
    }

    pub fn set_semi_period_ms(&mut self, semi_period_ms: u32) {
        self.semi_period_ms = semi_period_ms;
    }

    pub fn mode(&self) -> LedMode {
        self.mode
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }

    fn write(&mut self, on: bool) -> Result<(), GpioError> {
        let result = if on {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        result.map_err(|_| GpioError::WriteFailed)?;
        self.lit = on;
        Ok(())
    }
}
