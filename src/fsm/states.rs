//! Concrete state handler functions and table builder.
//!
//! Each state is defined by plain `fn` pointers with no closures and no dynamic
//! dispatch or heap.  Update handlers take `&DoorContext` and return the
//! transition to take, so the whole table reads as one pure function of
//! (state, inputs) → (state, commands).
//!
//! ```text
//!            [presence]                [open reached]
//!  CLOSED ──────────────▶ OPENING ─────────────────▶ OPEN
//!    ▲  ▲                  │   ▲                       │
//!    │  └──[stall/timeout]─┘   │ [presence]            │ [no presence for
//!    │      (STOP, flagged)    │ (STOP, START_OPENING) │  inactivity timeout]
//!    │                         │                       ▼
//!    └────[closed reached]──────────────────────── CLOSING
//!    └────[stall/timeout: STOP, door ajar]──────────┘
//! ```

use super::context::{ActuatorCommand, DoorContext, LedMode, MotionFeedback};
use super::{DoorState, StateDescriptor, Transition};
use crate::config::OpeningStallPolicy;
use crate::error::DoorFault;
use log::{info, warn};

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

/// Build the static state table.  Called once per controller.
pub fn build_state_table() -> [StateDescriptor; DoorState::COUNT] {
    [
        // Index 0: Closed
        StateDescriptor {
            id: DoorState::Closed,
            name: "Closed",
            on_enter: Some(closed_enter),
            on_exit: None,
            on_update: closed_update,
        },
        // Index 1: Opening
        StateDescriptor {
            id: DoorState::Opening,
            name: "Opening",
            on_enter: Some(opening_enter),
            on_exit: Some(motion_exit),
            on_update: opening_update,
        },
        // Index 2: Open
        StateDescriptor {
            id: DoorState::Open,
            name: "Open",
            on_enter: Some(open_enter),
            on_exit: None,
            on_update: open_update,
        },
        // Index 3: Closing
        StateDescriptor {
            id: DoorState::Closing,
            name: "Closing",
            on_enter: Some(closing_enter),
            on_exit: Some(motion_exit),
            on_update: closing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLOSED state
// ═══════════════════════════════════════════════════════════════════════════

fn closed_enter(ctx: &mut DoorContext) {
    ctx.indicators.open_led = LedMode::Off;
    ctx.indicators.close_led = LedMode::On;
    info!("CLOSED: waiting for presence");
}

fn closed_update(ctx: &DoorContext) -> Option<Transition> {
    if ctx.presence {
        return Some(Transition::new(
            DoorState::Opening,
            &[ActuatorCommand::StartOpening],
        ));
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPENING state: motor driving towards the open end stop
// ═══════════════════════════════════════════════════════════════════════════

fn opening_enter(ctx: &mut DoorContext) {
    ctx.indicators.close_led = LedMode::Off;
    ctx.indicators.open_led = LedMode::Blink;
    info!(
        "OPENING: presence at {:?}ms, motion timeout {}ms",
        ctx.last_presence_ms, ctx.config.motion_timeout_ms
    );
}

fn opening_update(ctx: &DoorContext) -> Option<Transition> {
    match ctx.feedback {
        Some(MotionFeedback::OpenReached) => {
            return Some(Transition::new(DoorState::Open, &[]));
        }
        Some(MotionFeedback::Stalled) => {
            warn!("OPENING: actuator reported stall after {}ms", ctx.ms_in_state());
            return Some(opening_stall(ctx));
        }
        Some(MotionFeedback::ClosedReached) | None => {}
    }

    if ctx.motion_timed_out() {
        warn!(
            "OPENING: no completion after {}ms (limit {}ms)",
            ctx.ms_in_state(),
            ctx.config.motion_timeout_ms
        );
        return Some(opening_stall(ctx));
    }

    None
}

fn opening_stall(ctx: &DoorContext) -> Transition {
    let transition = match ctx.config.opening_stall_policy {
        OpeningStallPolicy::HaltClosed => {
            Transition::new(DoorState::Closed, &[ActuatorCommand::Stop])
        }
        OpeningStallPolicy::ReverseToClosing => Transition::new(
            DoorState::Closing,
            &[ActuatorCommand::Stop, ActuatorCommand::StartClosing],
        ),
    };
    transition.with_fault(DoorFault::OpeningStalled)
}

// ═══════════════════════════════════════════════════════════════════════════
//  OPEN state: holding open while presence is seen
// ═══════════════════════════════════════════════════════════════════════════

fn open_enter(ctx: &mut DoorContext) {
    ctx.indicators.open_led = LedMode::On;
    ctx.indicators.close_led = LedMode::Off;
    info!(
        "OPEN: closing after {}ms without presence",
        ctx.config.inactivity_timeout_ms
    );
}

fn open_update(ctx: &DoorContext) -> Option<Transition> {
    // Presence refreshes last_presence_ms, which restarts the window.
    if ctx.presence {
        return None;
    }

    if ctx.inactivity_expired() {
        info!(
            "OPEN: no presence for {}ms, closing",
            ctx.ms_since_presence()
        );
        return Some(Transition::new(
            DoorState::Closing,
            &[ActuatorCommand::StartClosing],
        ));
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  CLOSING state: motor driving towards the closed end stop
// ═══════════════════════════════════════════════════════════════════════════

fn closing_enter(ctx: &mut DoorContext) {
    ctx.indicators.open_led = LedMode::Off;
    ctx.indicators.close_led = LedMode::Blink;
    info!("CLOSING: motion timeout {}ms", ctx.config.motion_timeout_ms);
}

fn closing_update(ctx: &DoorContext) -> Option<Transition> {
    // Obstruction or a new arrival: reverse before anything else.
    if ctx.presence {
        info!("CLOSING: presence detected, reopening");
        return Some(Transition::new(
            DoorState::Opening,
            &[ActuatorCommand::Stop, ActuatorCommand::StartOpening],
        ));
    }

    match ctx.feedback {
        Some(MotionFeedback::ClosedReached) => {
            return Some(Transition::new(DoorState::Closed, &[]));
        }
        Some(MotionFeedback::Stalled) => {
            warn!("CLOSING: actuator reported stall, door may be ajar");
            return Some(closing_stall());
        }
        Some(MotionFeedback::OpenReached) | None => {}
    }

    if ctx.motion_timed_out() {
        warn!(
            "CLOSING: no completion after {}ms, door may be ajar",
            ctx.ms_in_state()
        );
        return Some(closing_stall());
    }

    None
}

fn closing_stall() -> Transition {
    Transition::new(DoorState::Closed, &[ActuatorCommand::Stop]).with_fault(DoorFault::ClosingStalled)
}

// ═══════════════════════════════════════════════════════════════════════════
//  Shared exit action for both motion states
// ═══════════════════════════════════════════════════════════════════════════

fn motion_exit(ctx: &mut DoorContext) {
    info!("motion ended after {}ms", ctx.ms_in_state());
}
