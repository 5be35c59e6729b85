//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the PIR sensor, the door motor and the two indicator LEDs, and
//! exposes them through [`PresencePort`], [`ActuatorPort`] and
//! [`IndicatorPort`].  This is the only module that touches actual pins.
//!
//! Input pins (PIR, end stops) share one type `I` and output pins
//! (motor enable/dir, LEDs) share `O`; on ESP-IDF both are degraded
//! `PinDriver`s, on host they are simulated pins.

use embedded_hal::digital::{InputPin, OutputPin};
use log::warn;

use crate::app::ports::{ActuatorPort, ClockPort, IndicatorPort, PresencePort};
use crate::drivers::indicator::IndicatorLed;
use crate::drivers::motor::DoorMotor;
use crate::drivers::pir::PirSensor;
use crate::error::Result;
use crate::fsm::context::{ActuatorCommand, IndicatorCommands, MotionFeedback};

/// Concrete adapter that combines all door hardware behind port traits.
pub struct HardwareAdapter<I, O, C> {
    pir: PirSensor<I>,
    motor: DoorMotor<O, O, I, I>,
    open_led: IndicatorLed<O>,
    close_led: IndicatorLed<O>,
    clock: C,
}

impl<I, O, C> HardwareAdapter<I, O, C>
where
    I: InputPin,
    O: OutputPin,
    C: ClockPort,
{
    pub fn new(
        pir: PirSensor<I>,
        motor: DoorMotor<O, O, I, I>,
        open_led: IndicatorLed<O>,
        close_led: IndicatorLed<O>,
        clock: C,
    ) -> Self {
        Self {
            pir,
            motor,
            open_led,
            close_led,
            clock,
        }
    }

    pub fn motor(&self) -> &DoorMotor<O, O, I, I> {
        &self.motor
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }
}

// ── PresencePort implementation ───────────────────────────────

impl<I: InputPin, O: OutputPin, C: ClockPort> PresencePort for HardwareAdapter<I, O, C> {
    fn presence_detected(&mut self) -> bool {
        self.pir.read()
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl<I: InputPin, O: OutputPin, C: ClockPort> ActuatorPort for HardwareAdapter<I, O, C> {
    fn apply(&mut self, cmd: ActuatorCommand) -> Result<()> {
        self.motor.apply(cmd)?;
        Ok(())
    }

    fn poll_feedback(&mut self) -> Option<MotionFeedback> {
        self.motor.poll_feedback()
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<I: InputPin, O: OutputPin, C: ClockPort> IndicatorPort for HardwareAdapter<I, O, C> {
    fn show(&mut self, leds: IndicatorCommands, now_ms: u64) {
        for (name, led, mode) in [
            ("open", &mut self.open_led, leds.open_led),
            ("close", &mut self.close_led, leds.close_led),
        ] {
            if let Err(e) = led.set_mode(mode, now_ms).and_then(|()| led.tick(now_ms)) {
                warn!("{name} LED: {e}");
            }
        }
    }

    fn set_blink_semi_period_ms(&mut self, semi_period_ms: u32) {
        self.open_led.set_semi_period_ms(semi_period_ms);
        self.close_led.set_semi_period_ms(semi_period_ms);
    }
}

// ── ClockPort implementation ──────────────────────────────────

impl<I, O, C: ClockPort> ClockPort for HardwareAdapter<I, O, C> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}
