//! Outbound application events.
//!
//! The [`DoorService`](super::service::DoorService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.

use serde::Serialize;

use crate::error::DoorFault;
use crate::fsm::DoorState;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// The service has started (carries initial state).
    Started(DoorState),

    /// The FSM transitioned between states.
    StateChanged { from: DoorState, to: DoorState },

    /// Presence went from absent to detected.
    PresenceDetected { at_ms: u64 },

    /// A fault was newly latched.
    FaultRaised(DoorFault),

    /// Latched faults were acknowledged.  Carries the cleared bitmask.
    FaultCleared(u8),

    /// The clock went backwards and the sample was clamped.
    ClockRegression { count: u32 },

    /// A new configuration was accepted.
    ConfigUpdated,

    /// Periodic telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TelemetryData {
    pub state: DoorState,
    pub presence: bool,
    pub last_presence_ms: Option<u64>,
    pub ms_in_state: u64,
    pub fault_flags: u8,
    pub opening_stalls: u32,
    pub closing_stalls: u32,
    pub tick_count: u64,
    /// A rejected `Stop` is still being retried.
    pub stop_pending: bool,
}
