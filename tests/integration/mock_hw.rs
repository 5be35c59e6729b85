//! Mock hardware adapter for integration tests.
//!
//! Records every actuator command and indicator update so tests can assert
//! on the full history without touching real GPIO.  Presence, clock and
//! actuator feedback are scripted by the test.

use std::cell::Cell;
use std::collections::VecDeque;

use autodoor::ActuatorCommand;
use autodoor::MotionFeedback;
use autodoor::app::events::AppEvent;
use autodoor::app::ports::{ActuatorPort, ClockPort, EventSink, IndicatorPort, PresencePort};
use autodoor::error::{Error, GpioError, Result};
use autodoor::fsm::context::IndicatorCommands;

// ── Manual clock ──────────────────────────────────────────────

/// Clock that only moves when the test says so.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<u64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }
}

impl ClockPort for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub clock: ManualClock,
    pub presence: bool,
    pub feedback: VecDeque<MotionFeedback>,
    pub commands: Vec<ActuatorCommand>,
    pub indicators: Vec<IndicatorCommands>,
    pub blink_semi_period_ms: Option<u32>,
    pub fail_writes: bool,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            clock: ManualClock::new(0),
            presence: false,
            feedback: VecDeque::new(),
            commands: Vec::new(),
            indicators: Vec::new(),
            blink_semi_period_ms: None,
            fail_writes: false,
        }
    }

    pub fn at(&mut self, now_ms: u64) -> &mut Self {
        self.clock.set(now_ms);
        self
    }

    pub fn last_command(&self) -> Option<&ActuatorCommand> {
        self.commands.last()
    }

    pub fn last_indicators(&self) -> Option<&IndicatorCommands> {
        self.indicators.last()
    }

    /// Queue feedback to be returned by the next poll.
    pub fn report(&mut self, feedback: MotionFeedback) {
        self.feedback.push_back(feedback);
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl PresencePort for MockHardware {
    fn presence_detected(&mut self) -> bool {
        self.presence
    }
}

impl ActuatorPort for MockHardware {
    fn apply(&mut self, cmd: ActuatorCommand) -> Result<()> {
        self.commands.push(cmd);
        if self.fail_writes {
            Err(Error::Gpio(GpioError::WriteFailed))
        } else {
            Ok(())
        }
    }

    fn poll_feedback(&mut self) -> Option<MotionFeedback> {
        self.feedback.pop_front()
    }
}

impl IndicatorPort for MockHardware {
    fn show(&mut self, leds: IndicatorCommands, _now_ms: u64) {
        self.indicators.push(leds);
    }

    fn set_blink_semi_period_ms(&mut self, semi_period_ms: u32) {
        self.blink_semi_period_ms = Some(semi_period_ms);
    }
}

impl ClockPort for MockHardware {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }
}

// ── Recording sink ────────────────────────────────────────────

/// Event sink that stores every event.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn contains(&self, event: &AppEvent) -> bool {
        self.events.contains(event)
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
