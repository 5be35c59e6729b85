//! Application core: door orchestration, zero I/O.
//!
//! This module wires the [`DoorController`](crate::controller::DoorController)
//! to the outside world: presence sampling, actuator commands and feedback,
//! indicator LEDs, and outbound events.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
