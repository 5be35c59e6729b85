//! Door motor driver (H-bridge enable + direction) with end-stop switches.
//!
//! Two digital outputs drive the bridge: `enable` gates the motor and
//! `dir` selects the direction (HIGH = opening).  Two active-low limit
//! switches report the open and closed end stops.
//!
//! ## Safety contract
//!
//! The driver cuts the enable line itself as soon as the end stop for the
//! current direction closes, then reports the completion once through
//! [`DoorMotor::poll_feedback`].  A GPIO write failure while commanding
//! the bridge leaves the motor in an unknown state and is reported as
//! [`MotionFeedback::Stalled`] on the next poll.
//!
//! ## Dual-target design
//!
//! Generic over `embedded-hal` pins: `PinDriver`s on ESP-IDF, simulated
//! pins on host.

use embedded_hal::digital::{InputPin, OutputPin};
use log::{debug, error, warn};

use crate::error::GpioError;
use crate::fsm::context::{ActuatorCommand, MotionFeedback};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Opening,
    Closing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotorState {
    Stopped,
    Driving(Direction),
}

/// Output half of the motor wiring.
pub struct MotorPins<EN, DIR> {
    pub enable: EN,
    pub dir: DIR,
}

/// End-stop inputs (LOW = switch closed).
pub struct LimitSwitches<OL, CL> {
    pub open: OL,
    pub closed: CL,
}

pub struct DoorMotor<EN, DIR, OL, CL> {
    pins: MotorPins<EN, DIR>,
    limits: LimitSwitches<OL, CL>,
    state: MotorState,
    pending_stall: bool,
}

impl<EN, DIR, OL, CL> DoorMotor<EN, DIR, OL, CL>
where
    EN: OutputPin,
    DIR: OutputPin,
    OL: InputPin,
    CL: InputPin,
{
    pub fn new(pins: MotorPins<EN, DIR>, limits: LimitSwitches<OL, CL>) -> Self {
        Self {
            pins,
            limits,
            state: MotorState::Stopped,
            pending_stall: false,
        }
    }

    /// Execute one actuator command.
    ///
    /// On failure the error is returned and a stall is latched for the
    /// next [`poll_feedback`](Self::poll_feedback).
    pub fn apply(&mut self, cmd: ActuatorCommand) -> Result<(), GpioError> {
        let result = match cmd {
            ActuatorCommand::StartOpening => self.drive(Direction::Opening),
            ActuatorCommand::StartClosing => self.drive(Direction::Closing),
            ActuatorCommand::Stop => self.stop(),
        };
        if let Err(e) = result {
            error!("motor: {cmd:?} failed: {e}");
            self.pending_stall = true;
        }
        result
    }

    /// Report a completion or stall observed since the last poll.
    pub fn poll_feedback(&mut self) -> Option<MotionFeedback> {
        if self.pending_stall {
            self.pending_stall = false;
            return Some(MotionFeedback::Stalled);
        }

        let MotorState::Driving(dir) = self.state else {
            return None;
        };

        let reached = match dir {
            Direction::Opening => self.limits.open.is_low().map_err(|_| GpioError::ReadFailed),
            Direction::Closing => self
                .limits
                .closed
                .is_low()
                .map_err(|_| GpioError::ReadFailed),
        };

        match reached {
            Ok(true) => {
                if let Err(e) = self.stop() {
                    error!("motor: failed to stop at end stop: {e}");
                    return Some(MotionFeedback::Stalled);
                }
                Some(match dir {
                    Direction::Opening => MotionFeedback::OpenReached,
                    Direction::Closing => MotionFeedback::ClosedReached,
                })
            }
            Ok(false) => None,
            Err(e) => {
                // Leave it to the motion timeout.
                warn!("motor: limit switch {dir:?}: {e}");
                None
            }
        }
    }

    pub fn state(&self) -> MotorState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        !matches!(self.state, MotorState::Stopped)
    }

    fn drive(&mut self, dir: Direction) -> Result<(), GpioError> {
        // Direction changes only with the bridge disabled.
        self.pins.enable.set_low().map_err(|_| GpioError::WriteFailed)?;
        self.state = MotorState::Stopped;

        let dir_result = match dir {
            Direction::Opening => self.pins.dir.set_high(),
            Direction::Closing => self.pins.dir.set_low(),
        };
        dir_result.map_err(|_| GpioError::WriteFailed)?;

        self.pins.enable.set_high().map_err(|_| GpioError::WriteFailed)?;
        self.state = MotorState::Driving(dir);
        debug!("motor: driving {dir:?}");
        Ok(())
    }

    fn stop(&mut self) -> Result<(), GpioError> {
        self.pins.enable.set_low().map_err(|_| GpioError::WriteFailed)?;
        if self.state != MotorState::Stopped {
            debug!("motor: stopped");
        }
        self.state = MotorState::Stopped;
        Ok(())
    }
}
