//! Application service: the hexagonal core.
//!
//! [`DoorService`] owns the [`DoorController`] and the small amount of
//! glue state around it (pending manual open request, previous presence
//! sample, a stop the motor has not yet accepted).  All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.
//!
//! ```text
//!  PresencePort ──▶ ┌────────────────────────┐ ──▶ EventSink
//!  ClockPort    ──▶ │      DoorService       │
//!  ActuatorPort ◀──▶│  DoorController · FSM  │
//!  IndicatorPort ◀──└────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::DoorConfig;
use crate::controller::DoorController;
use crate::error::{DoorFault, Result};
use crate::events::Event;
use crate::fsm::DoorState;
use crate::fsm::context::ActuatorCommand;

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, ClockPort, EventSink, IndicatorPort, PresencePort};

// ───────────────────────────────────────────────────────────────
// DoorService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates the door.
pub struct DoorService {
    controller: DoorController,
    /// Manual open request waiting for the next tick.
    open_requested: bool,
    /// Presence input of the previous tick, for rising-edge detection.
    prev_presence: bool,
    /// The last `Stop` failed; retried each tick while the door is at rest.
    stop_pending: bool,
    /// Indicator timing changed and has not reached the hardware yet.
    timing_changed: bool,
}

impl DoorService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the controller; call [`start`](Self::start) next.
    pub fn new(config: DoorConfig) -> Result<Self> {
        Ok(Self {
            controller: DoorController::from_config(config)?,
            open_requested: false,
            prev_presence: false,
            stop_pending: false,
            timing_changed: false,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Start the controller in `Closed` and light the initial indicators.
    pub fn start(
        &mut self,
        hw: &mut (impl ClockPort + IndicatorPort),
        sink: &mut impl EventSink,
    ) {
        let now_ms = hw.now_ms();
        self.controller.start(now_ms);
        hw.set_blink_semi_period_ms(self.controller.config().indicator_blink_semi_period_ms);
        hw.show(self.controller.indicators(), now_ms);
        sink.emit(&AppEvent::Started(self.controller.state()));
        info!("DoorService started in {:?}", self.controller.state());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle:
    /// clock → feedback → stop retry → presence → controller → actuator →
    /// indicators.
    pub fn tick(
        &mut self,
        hw: &mut (impl PresencePort + ActuatorPort + IndicatorPort + ClockPort),
        sink: &mut impl EventSink,
    ) {
        let now_ms = hw.now_ms();

        // 1. Actuator feedback is latched before the tick that consumes it.
        if let Some(feedback) = hw.poll_feedback() {
            self.controller.report_motion(feedback);
        }

        // 2. A motor that ignored `Stop` must not keep running at rest.
        if self.stop_pending && !self.controller.state().is_moving() {
            self.apply(hw, ActuatorCommand::Stop, sink);
        }

        // 3. Presence: sensor OR a pending manual request.
        let sensed = hw.presence_detected();
        let presence = sensed || core::mem::take(&mut self.open_requested);

        // 4. Pure FSM evaluation
        let outcome = self.controller.tick(now_ms, presence);

        // 5. Commands, in order
        for &cmd in outcome.commands() {
            self.apply(hw, cmd, sink);
        }

        // 6. Indicators follow the state every tick (blink phase).
        if core::mem::take(&mut self.timing_changed) {
            hw.set_blink_semi_period_ms(self.controller.config().indicator_blink_semi_period_ms);
        }
        hw.show(self.controller.indicators(), now_ms);

        // 7. Events
        if outcome.clock_regressed {
            sink.emit(&AppEvent::ClockRegression {
                count: self.controller.fault_count(DoorFault::ClockRegression),
            });
        }
        if presence && !self.prev_presence {
            if let Some(at_ms) = self.controller.last_time_presence() {
                sink.emit(&AppEvent::PresenceDetected { at_ms });
            }
        }
        self.prev_presence = presence;

        if let Some((from, to)) = outcome.transition {
            sink.emit(&AppEvent::StateChanged { from, to });
        }
        if let Some(fault) = outcome.fault {
            if fault != DoorFault::ClockRegression {
                sink.emit(&AppEvent::FaultRaised(fault));
            }
        }
    }

    /// Forward one command to the actuator.  A failed `Stop` latches
    /// [`DoorFault::ActuatorUnresponsive`] and is retried on later ticks;
    /// any accepted command means the motor is under control again.
    fn apply(
        &mut self,
        hw: &mut impl ActuatorPort,
        cmd: ActuatorCommand,
        sink: &mut impl EventSink,
    ) {
        match hw.apply(cmd) {
            Ok(()) => {
                if core::mem::take(&mut self.stop_pending) {
                    info!("actuator accepted {cmd:?}, motor back under control");
                }
            }
            Err(e) => {
                warn!("actuator {cmd:?} failed: {e}");
                if cmd == ActuatorCommand::Stop {
                    self.stop_pending = true;
                    if self.controller.raise_fault(DoorFault::ActuatorUnresponsive) {
                        sink.emit(&AppEvent::FaultRaised(DoorFault::ActuatorUnresponsive));
                    }
                }
            }
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (button, serial, etc.).
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) -> Result<()> {
        match cmd {
            AppCommand::OpenRequest => self.request_open(),
            AppCommand::UpdateConfig(config) => {
                if let Err(e) = self.controller.update_config(config) {
                    warn!("configuration rejected: {e}");
                    return Err(e);
                }
                info!("Configuration updated at runtime");
                self.timing_changed = true;
                sink.emit(&AppEvent::ConfigUpdated);
            }
            AppCommand::ClearFaults => {
                let cleared = self.controller.faults();
                if cleared != 0 {
                    self.controller.clear_faults();
                    sink.emit(&AppEvent::FaultCleared(cleared));
                }
            }
        }
        Ok(())
    }

    /// Dispatch one event from the ISR/timer queue.
    pub fn handle_event(
        &mut self,
        event: Event,
        hw: &mut (impl PresencePort + ActuatorPort + IndicatorPort + ClockPort),
        sink: &mut impl EventSink,
    ) {
        if let Some(feedback) = event.motion() {
            self.controller.report_motion(feedback);
            return;
        }
        match event {
            Event::ControlTick => self.tick(hw, sink),
            Event::TelemetryTick => sink.emit(&AppEvent::Telemetry(self.build_telemetry())),
            Event::ButtonPressed => self.request_open(),
            Event::MotionOpenReached | Event::MotionClosedReached | Event::MotionStalled => {}
        }
    }

    fn request_open(&mut self) {
        info!("manual open requested");
        self.open_requested = true;
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot.
    pub fn build_telemetry(&self) -> TelemetryData {
        let c = &self.controller;
        TelemetryData {
            state: c.state(),
            presence: c.presence_status(),
            last_presence_ms: c.last_time_presence(),
            ms_in_state: c.ms_in_state(),
            fault_flags: c.faults(),
            opening_stalls: c.fault_count(DoorFault::OpeningStalled),
            closing_stalls: c.fault_count(DoorFault::ClosingStalled),
            tick_count: c.tick_count(),
            stop_pending: self.stop_pending,
        }
    }

    pub fn state(&self) -> DoorState {
        self.controller.state()
    }

    /// Current fault bitmask (0 = no faults).
    pub fn fault_flags(&self) -> u8 {
        self.controller.faults()
    }

    pub fn controller(&self) -> &DoorController {
        &self.controller
    }

    /// Clone of the live configuration.
    pub fn current_config(&self) -> DoorConfig {
        self.controller.config().clone()
    }
}
