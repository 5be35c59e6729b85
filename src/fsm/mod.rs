//! Function-pointer finite state machine engine for the automatic door.
//!
//! Classic embedded FSM pattern ported to Rust:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │  StateTable                                                   │
//! │  ┌─────────┬───────────┬──────────┬────────────────────────┐  │
//! │  │ State   │ on_enter  │ on_exit  │ on_update              │  │
//! │  ├─────────┼───────────┼──────────┼────────────────────────┤  │
//! │  │ Closed  │ fn(ctx)   │ -        │ fn(&ctx)->Option<Tr>   │  │
//! │  │ Opening │ fn(ctx)   │ fn(ctx)  │ fn(&ctx)->Option<Tr>   │  │
//! │  │ Open    │ fn(ctx)   │ -        │ fn(&ctx)->Option<Tr>   │  │
//! │  │ Closing │ fn(ctx)   │ fn(ctx)  │ fn(&ctx)->Option<Tr>   │  │
//! │  └─────────┴───────────┴──────────┴────────────────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.  The
//! handler only borrows the context immutably and returns an optional
//! [`Transition`] (next state, actuator commands, fault to raise).  If one
//! is returned, the engine runs `on_exit` for the current state, resets the
//! state entry time, then runs `on_enter` for the next state.

pub mod context;
pub mod states;

use context::{ActuatorCommand, CommandBuf, DoorContext, MAX_COMMANDS_PER_TICK};
use log::info;
use serde::Serialize;

use crate::error::DoorFault;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// The four door states.  There is no error state: faults resolve to one
/// of these plus a latched [`DoorFault`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u8)]
pub enum DoorState {
    Closed = 0,
    Opening = 1,
    Open = 2,
    Closing = 3,
}

impl DoorState {
    /// Total number of states, used to size the table array.
    pub const COUNT: usize = 4;

    /// Convert an index back to `DoorState`.  Panics on out-of-range in
    /// debug builds; returns `Closed` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Closed,
            1 => Self::Opening,
            2 => Self::Open,
            3 => Self::Closing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Closed
            }
        }
    }

    /// True while the actuator is commanded to move.
    pub fn is_moving(self) -> bool {
        matches!(self, Self::Opening | Self::Closing)
    }
}

// ---------------------------------------------------------------------------
// Transition
// ---------------------------------------------------------------------------

/// Outcome of an update handler that decided to leave the current state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next: DoorState,
    /// Commands to issue, in order.
    pub commands: CommandBuf,
    /// Fault to latch as part of this transition.
    pub fault: Option<DoorFault>,
}

impl Transition {
    /// Transition to `next` issuing `commands` in order.
    pub fn new(next: DoorState, commands: &[ActuatorCommand]) -> Self {
        debug_assert!(commands.len() <= MAX_COMMANDS_PER_TICK);
        let mut buf = CommandBuf::new();
        buf.extend(commands.iter().copied().take(MAX_COMMANDS_PER_TICK));
        Self {
            next,
            commands: buf,
            fault: None,
        }
    }

    /// Attach a fault to latch when this transition is taken.
    pub fn with_fault(mut self, fault: DoorFault) -> Self {
        self.fault = Some(fault);
        self
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
/// These run exactly once on each state transition.
pub type StateActionFn = fn(&mut DoorContext);

/// Signature for the per-tick update handler.
/// Returns `Some(transition)` to leave the state, or `None` to stay.
pub type StateUpdateFn = fn(&DoorContext) -> Option<Transition>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

/// Static descriptor for a single FSM state.
/// Stored in a fixed-size array (no heap, no `dyn`).
pub struct StateDescriptor {
    pub id: DoorState,
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// The finite state machine engine.
///
/// Owns the state table and the index of the active state.  The mutable
/// [`DoorContext`] is owned by the caller and threaded through every
/// handler call.
pub struct Fsm {
    /// Fixed-size table indexed by `DoorState as usize`.
    table: [StateDescriptor; DoorState::COUNT],
    /// Index of the currently active state.
    current: usize,
    /// Number of ticks evaluated.
    tick_count: u64,
    /// Number of transitions taken.
    transition_count: u64,
}

impl Fsm {
    /// Construct a new FSM with the given state table, starting in `initial`.
    pub fn new(table: [StateDescriptor; DoorState::COUNT], initial: DoorState) -> Self {
        Self {
            table,
            current: initial as usize,
            tick_count: 0,
            transition_count: 0,
        }
    }

    /// Run the initial `on_enter` for the starting state and stamp its
    /// entry time.  Call once after construction, before the first `tick()`.
    pub fn start(&mut self, ctx: &mut DoorContext) {
        info!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_entry_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance the FSM by one tick.
    ///
    /// 1. Call `on_update` for the current state.
    /// 2. If it returns a transition, execute it:
    ///    `on_exit(current)` → update pointer and entry time → `on_enter(next)`.
    /// 3. Return the transition so the caller can issue its commands.
    pub fn tick(&mut self, ctx: &mut DoorContext) -> Option<Transition> {
        self.tick_count = self.tick_count.wrapping_add(1);

        let transition = (self.table[self.current].on_update)(ctx)?;
        self.transition(transition.next, ctx);
        Some(transition)
    }

    /// The current state's identity.
    pub fn current_state(&self) -> DoorState {
        DoorState::from_index(self.current)
    }

    /// Human-readable name of the current state.
    pub fn current_name(&self) -> &'static str {
        self.table[self.current].name
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn transition_count(&self) -> u64 {
        self.transition_count
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: DoorState, ctx: &mut DoorContext) {
        let next_idx = next_id as usize;

        info!(
            "FSM transition: {} -> {} at {}ms",
            self.table[self.current].name, self.table[next_idx].name, ctx.now_ms
        );

        // Exit current state
        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        // Update pointer and timing
        self.current = next_idx;
        self.transition_count += 1;
        ctx.state_entry_ms = ctx.now_ms;

        // Enter new state
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
