//! The automatic door controller.
//!
//! [`DoorController`] is the caller-owned value behind the door: it owns
//! the FSM engine, the shared [`DoorContext`], the fault latch and the
//! actuator feedback mailbox.  Construct one per door; nothing here is a
//! singleton.
//!
//! ```text
//!  report_motion(fb) ──▶ pending feedback ─┐
//!                                          ▼
//!  tick(now, presence) ──▶ clamp clock ─▶ Fsm::tick ─▶ TickOutcome
//!                                                     (commands, faults)
//! ```
//!
//! `tick` performs comparisons and timestamp arithmetic only.  It never
//! blocks and never allocates; commands are returned in a fixed-capacity
//! buffer for the caller to forward to the actuator driver.

use log::{debug, warn};

use crate::config::DoorConfig;
use crate::error::{DoorFault, Result};
use crate::fsm::context::{
    ActuatorCommand, CommandBuf, DoorContext, IndicatorCommands, MotionFeedback,
};
use crate::fsm::states::build_state_table;
use crate::fsm::{DoorState, Fsm};
use crate::safety::FaultLatch;

/// Everything one tick produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// State after the tick.
    pub state: DoorState,
    /// Commands to forward to the actuator, in order.
    pub commands: CommandBuf,
    /// `(from, to)` if the tick changed state.
    pub transition: Option<(DoorState, DoorState)>,
    /// Fault newly latched by this tick, if any.  A fault that is already
    /// latched is counted but not reported again.
    pub fault: Option<DoorFault>,
    /// True if the supplied timestamp went backwards and was clamped.
    pub clock_regressed: bool,
}

impl TickOutcome {
    pub fn commands(&self) -> &[ActuatorCommand] {
        &self.commands
    }
}

/// Presence-driven automatic door controller.
pub struct DoorController {
    fsm: Fsm,
    ctx: DoorContext,
    faults: FaultLatch,
    /// Latest actuator feedback, consumed by the next tick.
    pending_feedback: Option<MotionFeedback>,
    /// Last accepted tick timestamp.
    last_tick_ms: Option<u64>,
    started: bool,
}

impl DoorController {
    /// Create a controller with the given timeouts and default timing.
    ///
    /// Both timeouts must be non-zero.
    pub fn new(inactivity_timeout_ms: u32, motion_timeout_ms: u32) -> Result<Self> {
        Self::from_config(DoorConfig::with_timeouts(
            inactivity_timeout_ms,
            motion_timeout_ms,
        ))
    }

    /// Create a controller from a full configuration.
    pub fn from_config(config: DoorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fsm: Fsm::new(build_state_table(), DoorState::Closed),
            ctx: DoorContext::new(config),
            faults: FaultLatch::new(),
            pending_feedback: None,
            last_tick_ms: None,
            started: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Stamp the initial `Closed` entry time and run its entry action.
    ///
    /// Optional: the first [`tick`](Self::tick) starts the controller at its
    /// own timestamp if this was never called.  Calling it twice is a no-op.
    pub fn start(&mut self, now_ms: u64) {
        if self.started {
            return;
        }
        self.ctx.now_ms = now_ms;
        self.fsm.start(&mut self.ctx);
        self.last_tick_ms = Some(now_ms);
        self.started = true;
    }

    // ── Per-tick evaluation ───────────────────────────────────

    /// Evaluate the FSM against one presence sample.
    ///
    /// A timestamp earlier than the previous tick is clamped to the previous
    /// tick's time and flagged as [`DoorFault::ClockRegression`].
    pub fn tick(&mut self, now_ms: u64, presence_detected: bool) -> TickOutcome {
        self.start(now_ms);

        let (now_ms, clock_regressed) = self.clamp(now_ms);
        let mut fault = None;
        if clock_regressed && self.faults.raise(DoorFault::ClockRegression) {
            fault = Some(DoorFault::ClockRegression);
        }

        self.ctx.now_ms = now_ms;
        self.ctx.presence = presence_detected;
        if presence_detected {
            self.ctx.last_presence_ms = Some(now_ms);
        }
        self.ctx.feedback = self.pending_feedback.take();
        if let Some(feedback) = self.ctx.feedback {
            if !self.fsm.current_state().is_moving() {
                debug!(
                    "discarding {:?} reported while {}",
                    feedback,
                    self.fsm.current_name()
                );
            }
        }

        let from = self.fsm.current_state();
        let transition = self.fsm.tick(&mut self.ctx);
        self.ctx.feedback = None;

        let mut outcome = TickOutcome {
            state: self.fsm.current_state(),
            commands: CommandBuf::new(),
            transition: None,
            fault,
            clock_regressed,
        };

        if let Some(t) = transition {
            outcome.transition = Some((from, t.next));
            outcome.commands = t.commands;
            if let Some(f) = t.fault {
                if self.faults.raise(f) {
                    outcome.fault = Some(f);
                }
            }
        }

        outcome
    }

    /// Report actuator feedback.  Latched until the next tick consumes it;
    /// a newer report replaces an unconsumed older one.
    pub fn report_motion(&mut self, feedback: MotionFeedback) {
        debug!("actuator feedback: {:?}", feedback);
        self.pending_feedback = Some(feedback);
    }

    // ── Configuration ─────────────────────────────────────────

    /// Swap in a new configuration without disturbing the current state.
    /// Timeouts take effect from the next tick.
    pub fn update_config(&mut self, config: DoorConfig) -> Result<()> {
        config.validate()?;
        self.ctx.config = config;
        Ok(())
    }

    pub fn config(&self) -> &DoorConfig {
        &self.ctx.config
    }

    // ── Faults ────────────────────────────────────────────────

    /// Current fault bitmask (0 = no faults).
    pub fn faults(&self) -> u8 {
        self.faults.faults()
    }

    pub fn has_fault(&self, fault: DoorFault) -> bool {
        self.faults.has_fault(fault)
    }

    /// Number of times `fault` has been raised.
    pub fn fault_count(&self, fault: DoorFault) -> u32 {
        self.faults.count(fault)
    }

    /// Latch a fault detected outside the FSM, such as an actuator that
    /// rejected a command.  Returns `true` if it was not already latched.
    pub fn raise_fault(&mut self, fault: DoorFault) -> bool {
        self.faults.raise(fault)
    }

    /// Acknowledge every latched fault.
    pub fn clear_faults(&mut self) {
        self.faults.clear_all();
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> DoorState {
        self.fsm.current_state()
    }

    /// Presence reading from the most recent tick.
    pub fn presence_status(&self) -> bool {
        self.ctx.presence
    }

    /// Timestamp of the most recent tick that saw presence.
    /// `None` means presence has never been detected.
    pub fn last_time_presence(&self) -> Option<u64> {
        self.ctx.last_presence_ms
    }

    /// Timestamp at which the current state was entered.
    pub fn state_entry_time(&self) -> u64 {
        self.ctx.state_entry_ms
    }

    /// Time spent in the current state as of the last tick.
    pub fn ms_in_state(&self) -> u64 {
        self.ctx.ms_in_state()
    }

    /// Indicator outputs requested by the current state.
    pub fn indicators(&self) -> IndicatorCommands {
        self.ctx.indicators
    }

    /// Number of ticks evaluated.
    pub fn tick_count(&self) -> u64 {
        self.fsm.tick_count()
    }

    // ── Internal ──────────────────────────────────────────────

    fn clamp(&mut self, now_ms: u64) -> (u64, bool) {
        match self.last_tick_ms {
            Some(last) if now_ms < last => {
                warn!("clock regression: tick at {now_ms}ms after {last}ms, clamping");
                (last, true)
            }
            _ => {
                self.last_tick_ms = Some(now_ms);
                (now_ms, false)
            }
        }
    }
}
