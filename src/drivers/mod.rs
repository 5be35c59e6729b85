//! Peripheral drivers, generic over `embedded-hal` digital pins.

pub mod button;
pub mod indicator;
pub mod motor;
pub mod pir;
#[cfg(not(target_os = "espidf"))]
pub mod sim;
