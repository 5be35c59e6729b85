//! AutoDoor firmware library.
//!
//! Exposes the controller, application service, drivers and adapters for
//! integration testing and for the firmware binary.  ESP-IDF-specific code
//! is guarded by the `espidf` feature within each module.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod controller;
pub mod drivers;
pub mod error;
pub mod events;
pub mod fsm;
pub mod pins;
pub mod safety;

pub use config::DoorConfig;
pub use controller::{DoorController, TickOutcome};
pub use error::{DoorFault, Error, Result};
pub use fsm::DoorState;
pub use fsm::context::{ActuatorCommand, MotionFeedback};
