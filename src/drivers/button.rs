//! Debounced manual "open" push-button.
//!
//! ## Hardware
//!
//! Active-low momentary switch with a pull-up: the line reads LOW while
//! the button is held.  The driver is polled from the main loop at
//! control-tick rate and runs a small debounce state machine.
//!
//! ## Behaviour
//!
//! | Phase         | Condition                          | Result               |
//! |---------------|------------------------------------|----------------------|
//! | Idle          | line goes LOW                      | start debounce       |
//! | DebounceWait  | still LOW after `debounce_ms`      | emit `Pressed` once  |
//! | DebounceWait  | back HIGH before `debounce_ms`     | bounce, back to Idle |
//! | Held          | line HIGH again                    | back to Idle         |
//!
//! Holding the button emits a single `Pressed`; a new press needs a
//! release first.

use embedded_hal::digital::InputPin;
use log::{debug, warn};

/// Button events emitted after debouncing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    Pressed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressState {
    Idle,
    DebounceWait { since_ms: u64 },
    Held,
}

pub struct OpenButton<P> {
    pin: P,
    state: PressState,
    debounce_ms: u32,
}

impl<P: InputPin> OpenButton<P> {
    pub fn new(pin: P, debounce_ms: u32) -> Self {
        Self {
            pin,
            state: PressState::Idle,
            debounce_ms,
        }
    }

    pub fn set_debounce_ms(&mut self, debounce_ms: u32) {
        self.debounce_ms = debounce_ms;
    }

    /// Call from the main loop at each control tick.
    /// Returns `Some(Pressed)` once per debounced press.
    pub fn tick(&mut self, now_ms: u64) -> Option<ButtonEvent> {
        let pressed = match self.pin.is_low() {
            Ok(level) => level,
            Err(_) => {
                warn!("button: GPIO read failed");
                // A dead line reads as released.
                false
            }
        };

        match self.state {
            PressState::Idle => {
                if pressed {
                    self.state = PressState::DebounceWait { since_ms: now_ms };
                    // A zero debounce fires on the first sample.
                    return self.confirm(now_ms, now_ms);
                }
                None
            }

            PressState::DebounceWait { since_ms } => {
                if !pressed {
                    debug!("button: bounce filtered");
                    self.state = PressState::Idle;
                    return None;
                }
                self.confirm(since_ms, now_ms)
            }

            PressState::Held => {
                if !pressed {
                    self.state = PressState::Idle;
                }
                None
            }
        }
    }

    /// True while a debounced press is being held.
    pub fn is_held(&self) -> bool {
        self.state == PressState::Held
    }

    fn confirm(&mut self, since_ms: u64, now_ms: u64) -> Option<ButtonEvent> {
        if now_ms.saturating_sub(since_ms) >= u64::from(self.debounce_ms) {
            self.state = PressState::Held;
            Some(ButtonEvent::Pressed)
        } else {
            None
        }
    }
}
