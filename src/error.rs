//! Unified error types for the automatic door firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! control loop's error handling uniform.  All variants are `Copy` so they
//! can be passed through the controller and service without allocation.
//!
//! Door faults ([`DoorFault`]) are deliberately *not* errors: a stalled
//! motion or a regressive clock sample is recovered inside the FSM and only
//! reported upward as a latched flag.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Configuration is invalid and was rejected before use.
    Config(ConfigError),
    /// A GPIO read or write failed.
    Gpio(GpioError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Gpio(e) => write!(f, "gpio: {e}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

/// A configuration value failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A duration field was zero.  Carries the field name.
    ZeroDuration(&'static str),
    /// The serialized configuration could not be decoded.
    Malformed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::Malformed => write!(f, "malformed configuration"),
        }
    }
}

impl core::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// GPIO errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpioError {
    /// Reading an input pin failed.
    ReadFailed,
    /// Driving an output pin failed.
    WriteFailed,
}

impl fmt::Display for GpioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "GPIO read failed"),
            Self::WriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl core::error::Error for GpioError {}

impl From<GpioError> for Error {
    fn from(e: GpioError) -> Self {
        Self::Gpio(e)
    }
}

// ---------------------------------------------------------------------------
// Door faults
// ---------------------------------------------------------------------------

/// Recoverable door faults.  Latched in a bitfield by the
/// [`FaultLatch`](crate::safety::FaultLatch) so several can be tracked at
/// once and cleared together by the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DoorFault {
    /// An opening motion did not complete within the motion timeout, or the
    /// actuator reported a stall while opening.
    OpeningStalled = 0b0000_0001,
    /// A closing motion did not complete; the door may be ajar.
    ClosingStalled = 0b0000_0010,
    /// A tick arrived with a timestamp earlier than the previous one.
    ClockRegression = 0b0000_0100,
    /// The motor did not accept a stop; the service keeps retrying it.
    ActuatorUnresponsive = 0b0000_1000,
}

impl DoorFault {
    /// Every fault, in bit order.
    pub const ALL: [Self; 4] = [
        Self::OpeningStalled,
        Self::ClosingStalled,
        Self::ClockRegression,
        Self::ActuatorUnresponsive,
    ];

    /// Return the bitmask for this fault.
    pub const fn mask(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for DoorFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OpeningStalled => write!(f, "opening stalled"),
            Self::ClosingStalled => write!(f, "closing stalled, door may be ajar"),
            Self::ClockRegression => write!(f, "clock regression"),
            Self::ActuatorUnresponsive => write!(f, "motor did not accept stop"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
