//! Interrupt-driven event system.
//!
//! Events are produced by:
//! - GPIO ISRs (manual open button, end-stop switches)
//! - Timer callbacks (control tick, telemetry)
//!
//! Events are consumed by the main control loop, which processes them
//! one at a time in FIFO order.
//!
//! ```text
//! ┌─────────────┐     ┌──────────────┐     ┌──────────────┐
//! │ GPIO ISR    │────▶│  Event Queue │────▶│  Main Loop   │
//! │ Timer ISR   │────▶│  (lock-free) │     │  (consumer)  │
//! └─────────────┘     └──────────────┘     └──────────────┘
//! ```

use core::sync::atomic::{AtomicU8, Ordering};

use crate::fsm::context::MotionFeedback;

/// Maximum number of slots.  One slot stays empty to tell full from
/// empty, so at most `EVENT_QUEUE_CAP - 1` events are pending.
pub const EVENT_QUEUE_CAP: usize = 32;

/// System event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Event {
    // ── Control ───────────────────────────────────────────
    /// Control loop tick.
    ControlTick = 0,
    /// Telemetry report timer fired.
    TelemetryTick = 1,

    // ── User input ────────────────────────────────────────
    /// Debounced press of the manual open button.
    ButtonPressed = 10,

    // ── Actuator ──────────────────────────────────────────
    MotionOpenReached = 20,
    MotionClosedReached = 21,
    MotionStalled = 22,
}

impl Event {
    /// Actuator feedback carried by this event, if any.
    pub fn motion(self) -> Option<MotionFeedback> {
        match self {
            Self::MotionOpenReached => Some(MotionFeedback::OpenReached),
            Self::MotionClosedReached => Some(MotionFeedback::ClosedReached),
            Self::MotionStalled => Some(MotionFeedback::Stalled),
            _ => None,
        }
    }

    fn from_u8(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::ControlTick),
            1 => Some(Self::TelemetryTick),
            10 => Some(Self::ButtonPressed),
            20 => Some(Self::MotionOpenReached),
            21 => Some(Self::MotionClosedReached),
            22 => Some(Self::MotionStalled),
            _ => None,
        }
    }
}

// ── Lock-free SPSC ring buffer ────────────────────────────────
//
// ISRs write (produce), main loop reads (consume).  Slots are atomics
// too, so the queue can live in a plain `static` without `static mut`.

pub struct EventQueue {
    head: AtomicU8,
    tail: AtomicU8,
    slots: [AtomicU8; EVENT_QUEUE_CAP],
}

impl EventQueue {
    pub const fn new() -> Self {
        Self {
            head: AtomicU8::new(0),
            tail: AtomicU8::new(0),
            slots: [const { AtomicU8::new(0) }; EVENT_QUEUE_CAP],
        }
    }

    /// Push an event.  Safe to call from ISR context (lock-free).
    /// Returns `false` if the queue is full (event dropped).
    pub fn push(&self, event: Event) -> bool {
        let head = self.head.load(Ordering::Relaxed);
        let tail = self.tail.load(Ordering::Acquire);
        let next_head = next(head);

        if next_head == tail {
            return false;
        }

        self.slots[usize::from(head)].store(event as u8, Ordering::Relaxed);
        self.head.store(next_head, Ordering::Release);
        true
    }

    /// Pop the next event.  Single consumer only.
    pub fn pop(&self) -> Option<Event> {
        loop {
            let tail = self.tail.load(Ordering::Relaxed);
            let head = self.head.load(Ordering::Acquire);

            if tail == head {
                return None;
            }

            let raw = self.slots[usize::from(tail)].load(Ordering::Relaxed);
            self.tail.store(next(tail), Ordering::Release);

            // Unknown codes cannot be pushed; skip rather than stop draining.
            if let Some(event) = Event::from_u8(raw) {
                return Some(event);
            }
        }
    }

    /// Drain all pending events into a callback, in FIFO order.
    pub fn drain(&self, mut handler: impl FnMut(Event)) {
        while let Some(event) = self.pop() {
            handler(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tail.load(Ordering::Relaxed) == self.head.load(Ordering::Acquire)
    }

    /// Number of pending events.
    pub fn len(&self) -> usize {
        let head = usize::from(self.head.load(Ordering::Relaxed));
        let tail = usize::from(self.tail.load(Ordering::Relaxed));
        (head + EVENT_QUEUE_CAP - tail) % EVENT_QUEUE_CAP
    }
}

impl Default for EventQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn next(index: u8) -> u8 {
    ((usize::from(index) + 1) % EVENT_QUEUE_CAP) as u8
}

/// Process-wide queue shared by ISR callbacks and the main loop.
pub static EVENTS: EventQueue = EventQueue::new();

/// Push onto the global queue.  Returns `false` if it is full.
pub fn push_event(event: Event) -> bool {
    EVENTS.push(event)
}

/// Drain the global queue in FIFO order.
pub fn drain_events(handler: impl FnMut(Event)) {
    EVENTS.drain(handler);
}
