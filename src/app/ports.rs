//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ DoorService (domain)
//! ```
//!
//! Driven adapters (sensors, motor, LEDs, clock, event sinks) implement
//! these traits.  The [`DoorService`](super::service::DoorService) consumes
//! them via generics, so the domain core never touches hardware directly.

use crate::error::Result;
use crate::fsm::context::{ActuatorCommand, IndicatorCommands, MotionFeedback};

// ───────────────────────────────────────────────────────────────
// Presence port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the occupancy sensor.
pub trait PresencePort {
    /// Sample the sensor.  `true` while presence is detected.
    fn presence_detected(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain ↔ motor)
// ───────────────────────────────────────────────────────────────

/// Door motor port.
pub trait ActuatorPort {
    /// Execute one command.  Commands from a single tick are applied in
    /// the order they were produced.
    fn apply(&mut self, cmd: ActuatorCommand) -> Result<()>;

    /// Completion or stall observed since the last poll, if any.
    fn poll_feedback(&mut self) -> Option<MotionFeedback>;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → LEDs)
// ───────────────────────────────────────────────────────────────

/// Status LED port.  Called every tick with the modes requested by the
/// current state; the adapter advances blink phases from `now_ms`.
pub trait IndicatorPort {
    fn show(&mut self, leds: IndicatorCommands, now_ms: u64);

    /// Change the half-period used by blinking LEDs.
    fn set_blink_semi_period_ms(&mut self, semi_period_ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic millisecond clock.
pub trait ClockPort {
    fn now_ms(&self) -> u64;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
