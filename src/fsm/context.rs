//! Shared context threaded through every FSM handler.
//!
//! `DoorContext` is the single struct that state handlers read from (and
//! that entry/exit actions write indicator outputs to).  It contains the
//! inputs of the current tick, the presence history, the state timing,
//! and the configuration.  Update handlers only ever see `&DoorContext`,
//! so every transition decision is a pure function of this struct.

use crate::config::DoorConfig;

// ---------------------------------------------------------------------------
// Actuator vocabulary
// ---------------------------------------------------------------------------

/// Commands emitted towards the door actuator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    /// Start driving the door open.
    StartOpening,
    /// Start driving the door closed.
    StartClosing,
    /// Cut motor drive immediately.
    Stop,
}

/// Feedback reported by the actuator driver about the motion in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionFeedback {
    /// The door reached its fully-open end stop.
    OpenReached,
    /// The door reached its fully-closed end stop.
    ClosedReached,
    /// The actuator detected it cannot move.
    Stalled,
}

/// Upper bound on commands produced by a single transition
/// (`Stop` followed by a new motion).
pub const MAX_COMMANDS_PER_TICK: usize = 2;

/// Fixed-capacity command buffer, no heap.
pub type CommandBuf = heapless::Vec<ActuatorCommand, MAX_COMMANDS_PER_TICK>;

// ---------------------------------------------------------------------------
// Indicator outputs (written by entry actions; consumed by the service)
// ---------------------------------------------------------------------------

/// Drive mode for one indicator LED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LedMode {
    #[default]
    Off,
    On,
    Blink,
}

/// Requested state of the two door indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndicatorCommands {
    /// Green "opening / open" LED.
    pub open_led: LedMode,
    /// Red "closing / closed" LED.
    pub close_led: LedMode,
}

// ---------------------------------------------------------------------------
// DoorContext
// ---------------------------------------------------------------------------

/// The shared context passed to every state handler function.
#[derive(Debug, Clone)]
pub struct DoorContext {
    // -- Timing --
    /// Timestamp of the tick being evaluated (ms, monotonic).
    pub now_ms: u64,
    /// Timestamp at which the current state was entered.
    pub state_entry_ms: u64,

    // -- Inputs --
    /// Presence reading for this tick.
    pub presence: bool,
    /// Last tick at which presence was detected; `None` = never.
    pub last_presence_ms: Option<u64>,
    /// Actuator feedback consumed by this tick, if any.
    pub feedback: Option<MotionFeedback>,

    // -- Outputs --
    pub indicators: IndicatorCommands,

    // -- Configuration --
    pub config: DoorConfig,
}

impl DoorContext {
    /// Create a new context at time zero.
    pub fn new(config: DoorConfig) -> Self {
        Self {
            now_ms: 0,
            state_entry_ms: 0,
            presence: false,
            last_presence_ms: None,
            feedback: None,
            indicators: IndicatorCommands::default(),
            config,
        }
    }

    /// Milliseconds elapsed since the current state was entered.
    pub fn ms_in_state(&self) -> u64 {
        self.now_ms.saturating_sub(self.state_entry_ms)
    }

    /// Milliseconds since the last detected presence.
    ///
    /// Falls back to the state entry time if no presence was ever seen, so
    /// a door that somehow sits open without history still times out.
    pub fn ms_since_presence(&self) -> u64 {
        let reference = self.last_presence_ms.unwrap_or(self.state_entry_ms);
        self.now_ms.saturating_sub(reference)
    }

    /// True once the current motion has run for the full motion timeout.
    pub fn motion_timed_out(&self) -> bool {
        self.ms_in_state() >= u64::from(self.config.motion_timeout_ms)
    }

    /// True once the door has been unattended for the inactivity timeout.
    pub fn inactivity_expired(&self) -> bool {
        self.ms_since_presence() >= u64::from(self.config.inactivity_timeout_ms)
    }
}
