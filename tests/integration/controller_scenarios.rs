//! End-to-end scenarios against the bare `DoorController`.
//!
//! These drive the controller the way an embedding control loop would:
//! a monotonic timestamp and a presence sample per tick, with actuator
//! feedback reported between ticks.

use autodoor::config::{
    AUTOMATIC_DOOR_INACTIVITY_TIMEOUT_MS, AUTOMATIC_DOOR_OPENING_CLOSING_TIMEOUT_MS,
    DoorConfig, OpeningStallPolicy,
};
use autodoor::{ActuatorCommand, DoorController, DoorFault, DoorState, MotionFeedback};

fn standard() -> DoorController {
    DoorController::new(
        AUTOMATIC_DOOR_INACTIVITY_TIMEOUT_MS,
        AUTOMATIC_DOOR_OPENING_CLOSING_TIMEOUT_MS,
    )
    .unwrap()
}

/// Drive a fresh controller to OPEN with presence at t=0 and the open end
/// stop reached at `open_at`.
fn opened_at(open_at: u64) -> DoorController {
    let mut door = standard();
    door.tick(0, true);
    door.report_motion(MotionFeedback::OpenReached);
    let out = door.tick(open_at, false);
    assert_eq!(out.state, DoorState::Open);
    door
}

// ── Full cycle ────────────────────────────────────────────────

#[test]
fn full_open_close_cycle() {
    let mut door = standard();

    let out = door.tick(0, true);
    assert_eq!(out.state, DoorState::Opening);
    assert_eq!(out.commands(), &[ActuatorCommand::StartOpening]);

    door.report_motion(MotionFeedback::OpenReached);
    let out = door.tick(100, false);
    assert_eq!(out.state, DoorState::Open);
    assert!(out.commands().is_empty());

    let out = door.tick(5000, false);
    assert_eq!(out.state, DoorState::Closing);
    assert_eq!(out.commands(), &[ActuatorCommand::StartClosing]);

    door.report_motion(MotionFeedback::ClosedReached);
    let out = door.tick(5500, false);
    assert_eq!(out.state, DoorState::Closed);
    assert!(out.commands().is_empty());
    assert_eq!(door.faults(), 0);
}

// ── Inactivity window is measured from the last presence ─────

#[test]
fn inactivity_measured_from_last_presence_not_open_entry() {
    let mut door = opened_at(100);
    for t in [200, 1000, 4999] {
        assert_eq!(door.tick(t, false).state, DoorState::Open, "t={t}");
    }
    // 5000 - last presence (0) >= 5000, although OPEN was entered at 100.
    let out = door.tick(5000, false);
    assert_eq!(out.state, DoorState::Closing);
    assert_eq!(out.commands(), &[ActuatorCommand::StartClosing]);
}

#[test]
fn sparse_ticks_close_on_first_tick_past_window() {
    let mut door = opened_at(100);
    assert_eq!(door.tick(200, false).state, DoorState::Open);
    let out = door.tick(5201, false);
    assert_eq!(out.state, DoorState::Closing);
    assert_eq!(out.commands(), &[ActuatorCommand::StartClosing]);
}

#[test]
fn presence_while_open_extends_the_window() {
    let mut door = opened_at(100);
    door.tick(3000, true);
    assert_eq!(door.last_time_presence(), Some(3000));
    assert_eq!(door.tick(7999, false).state, DoorState::Open);
    assert_eq!(door.tick(8000, false).state, DoorState::Closing);
}

// ── Motion timeouts ───────────────────────────────────────────

#[test]
fn opening_without_completion_halts_closed_and_flags() {
    let mut door = standard();
    door.tick(0, true);
    assert_eq!(door.tick(2999, false).state, DoorState::Opening);

    let out = door.tick(3001, false);
    assert_eq!(out.state, DoorState::Closed);
    assert_eq!(out.commands(), &[ActuatorCommand::Stop]);
    assert_eq!(out.fault, Some(DoorFault::OpeningStalled));
    assert!(door.has_fault(DoorFault::OpeningStalled));
}

#[test]
fn opening_timeout_with_reverse_policy_retries_closing() {
    let mut config = DoorConfig::default();
    config.opening_stall_policy = OpeningStallPolicy::ReverseToClosing;
    let mut door = DoorController::from_config(config).unwrap();
    door.tick(0, true);

    let out = door.tick(3000, false);
    assert_eq!(out.state, DoorState::Closing);
    assert_eq!(
        out.commands(),
        &[ActuatorCommand::Stop, ActuatorCommand::StartClosing]
    );
    assert!(door.has_fault(DoorFault::OpeningStalled));

    // The closing retry also times out: ajar, flagged, stopped.
    let out = door.tick(6000, false);
    assert_eq!(out.state, DoorState::Closed);
    assert_eq!(out.commands(), &[ActuatorCommand::Stop]);
    assert!(door.has_fault(DoorFault::ClosingStalled));
}

#[test]
fn closing_stall_report_stops_immediately() {
    let mut door = opened_at(100);
    door.tick(5000, false);
    door.report_motion(MotionFeedback::Stalled);
    let out = door.tick(5050, false);
    assert_eq!(out.state, DoorState::Closed);
    assert_eq!(out.commands(), &[ActuatorCommand::Stop]);
    assert_eq!(out.fault, Some(DoorFault::ClosingStalled));
}

// ── Obstruction / re-trigger ──────────────────────────────────

#[test]
fn presence_while_closing_reopens() {
    let mut door = opened_at(100);
    door.tick(5000, false);
    let out = door.tick(5500, true);
    assert_eq!(out.state, DoorState::Opening);
    assert_eq!(
        out.commands(),
        &[ActuatorCommand::Stop, ActuatorCommand::StartOpening]
    );
    assert_eq!(door.state_entry_time(), 5500);
}

#[test]
fn presence_beats_simultaneous_closed_report() {
    let mut door = opened_at(100);
    door.tick(5000, false);
    door.report_motion(MotionFeedback::ClosedReached);
    let out = door.tick(5100, true);
    assert_eq!(out.state, DoorState::Opening);
}

// ── Accessors ─────────────────────────────────────────────────

#[test]
fn presence_accessors_track_ticks() {
    let mut door = standard();
    assert!(!door.presence_status());
    assert_eq!(door.last_time_presence(), None);

    door.tick(10, true);
    assert!(door.presence_status());
    assert_eq!(door.last_time_presence(), Some(10));

    door.tick(20, false);
    assert!(!door.presence_status());
    assert_eq!(door.last_time_presence(), Some(10));
}

#[test]
fn independent_doors_do_not_share_state() {
    let mut front = standard();
    let mut back = standard();
    front.tick(0, true);
    back.tick(0, false);
    assert_eq!(front.state(), DoorState::Opening);
    assert_eq!(back.state(), DoorState::Closed);
}
