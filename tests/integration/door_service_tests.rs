//! Integration tests for the DoorService → controller → ports pipeline.
//!
//! These run on the host and verify the per-tick orchestration against a
//! recording mock adapter: feedback is polled before the tick that uses
//! it, commands reach the actuator in order, indicators follow the state,
//! and the right events are emitted.

use crate::mock_hw::{MockHardware, RecordingSink};

use autodoor::app::commands::AppCommand;
use autodoor::app::events::AppEvent;
use autodoor::app::service::DoorService;
use autodoor::config::DoorConfig;
use autodoor::events::{Event, EventQueue};
use autodoor::fsm::context::LedMode;
use autodoor::{ActuatorCommand, DoorFault, DoorState, MotionFeedback};

fn make_app() -> (DoorService, MockHardware, RecordingSink) {
    let mut app = DoorService::new(DoorConfig::default()).unwrap();
    let mut hw = MockHardware::new();
    let mut sink = RecordingSink::new();
    app.start(&mut hw, &mut sink);
    (app, hw, sink)
}

#[test]
fn presence_opens_and_inactivity_closes() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    assert_eq!(app.state(), DoorState::Opening);
    assert_eq!(hw.commands, vec![ActuatorCommand::StartOpening]);
    assert!(sink.contains(&AppEvent::PresenceDetected { at_ms: 0 }));

    hw.presence = false;
    hw.report(MotionFeedback::OpenReached);
    app.tick(hw.at(100), &mut sink);
    assert_eq!(app.state(), DoorState::Open);

    app.tick(hw.at(4999), &mut sink);
    assert_eq!(app.state(), DoorState::Open);
    app.tick(hw.at(5000), &mut sink);
    assert_eq!(app.state(), DoorState::Closing);
    assert_eq!(hw.last_command(), Some(&ActuatorCommand::StartClosing));

    hw.report(MotionFeedback::ClosedReached);
    app.tick(hw.at(6000), &mut sink);
    assert_eq!(app.state(), DoorState::Closed);

    let changes: Vec<_> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (DoorState::Closed, DoorState::Opening),
            (DoorState::Opening, DoorState::Open),
            (DoorState::Open, DoorState::Closing),
            (DoorState::Closing, DoorState::Closed),
        ]
    );
}

#[test]
fn indicators_follow_each_state() {
    let (mut app, mut hw, mut sink) = make_app();
    let leds = |hw: &MockHardware| {
        let l = hw.last_indicators().copied().unwrap_or_default();
        (l.open_led, l.close_led)
    };

    assert_eq!(leds(&hw), (LedMode::Off, LedMode::On));

    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    assert_eq!(leds(&hw), (LedMode::Blink, LedMode::Off));

    hw.report(MotionFeedback::OpenReached);
    app.tick(hw.at(100), &mut sink);
    assert_eq!(leds(&hw), (LedMode::On, LedMode::Off));

    hw.presence = false;
    app.tick(hw.at(5100), &mut sink);
    assert_eq!(app.state(), DoorState::Closing);
    assert_eq!(leds(&hw), (LedMode::Off, LedMode::Blink));
}

#[test]
fn stalled_opening_is_reported_and_recoverable() {
    let (mut app, mut hw, mut sink) = make_app();

    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    hw.presence = false;
    app.tick(hw.at(3001), &mut sink);

    assert_eq!(app.state(), DoorState::Closed);
    assert_eq!(hw.last_command(), Some(&ActuatorCommand::Stop));
    assert!(sink.contains(&AppEvent::FaultRaised(DoorFault::OpeningStalled)));
    assert_eq!(app.fault_flags(), DoorFault::OpeningStalled.mask());

    // The door still works while the fault is latched.
    hw.presence = true;
    app.tick(hw.at(4000), &mut sink);
    assert_eq!(app.state(), DoorState::Opening);

    app.handle_command(AppCommand::ClearFaults, &mut sink).unwrap();
    assert_eq!(app.fault_flags(), 0);
    assert!(sink.contains(&AppEvent::FaultCleared(DoorFault::OpeningStalled.mask())));
}

#[test]
fn clear_faults_without_faults_emits_nothing() {
    let (mut app, _hw, mut sink) = make_app();
    let before = sink.events.len();
    app.handle_command(AppCommand::ClearFaults, &mut sink).unwrap();
    assert_eq!(sink.events.len(), before);
}

#[test]
fn actuator_write_failure_does_not_stop_the_loop() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.fail_writes = true;
    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    assert_eq!(app.state(), DoorState::Opening);

    // The driver reports the failed motion as a stall.
    hw.report(MotionFeedback::Stalled);
    hw.presence = false;
    app.tick(hw.at(50), &mut sink);
    assert_eq!(app.state(), DoorState::Closed);
    assert!(sink.contains(&AppEvent::FaultRaised(DoorFault::OpeningStalled)));
}

#[test]
fn rejected_stop_keeps_retrying_until_the_motor_obeys() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    hw.presence = false;

    hw.fail_writes = true;
    app.tick(hw.at(3000), &mut sink);
    assert_eq!(app.state(), DoorState::Closed);
    assert!(sink.contains(&AppEvent::FaultRaised(DoorFault::ActuatorUnresponsive)));

    app.tick(hw.at(3050), &mut sink);
    app.tick(hw.at(4000), &mut sink);
    assert_eq!(
        hw.commands[1..],
        [ActuatorCommand::Stop, ActuatorCommand::Stop, ActuatorCommand::Stop]
    );

    hw.fail_writes = false;
    app.tick(hw.at(4050), &mut sink);
    app.tick(hw.at(4100), &mut sink);
    assert_eq!(hw.commands.len(), 5);
    assert!(!app.build_telemetry().stop_pending);
    assert_eq!(
        sink.count(|e| *e == AppEvent::FaultRaised(DoorFault::ActuatorUnresponsive)),
        1
    );
}

#[test]
fn manual_open_request_behaves_like_presence() {
    let (mut app, mut hw, mut sink) = make_app();
    app.handle_command(AppCommand::OpenRequest, &mut sink).unwrap();
    app.tick(hw.at(250), &mut sink);
    assert_eq!(app.state(), DoorState::Opening);
    assert_eq!(app.controller().last_time_presence(), Some(250));
    assert!(sink.contains(&AppEvent::PresenceDetected { at_ms: 250 }));
}

#[test]
fn config_update_applies_new_inactivity_timeout() {
    let (mut app, mut hw, mut sink) = make_app();
    let config = DoorConfig::with_timeouts(1000, 3000);
    app.handle_command(AppCommand::UpdateConfig(config.clone()), &mut sink)
        .unwrap();
    assert!(sink.contains(&AppEvent::ConfigUpdated));
    assert_eq!(app.current_config(), config);
    assert_eq!(hw.blink_semi_period_ms, Some(250));

    hw.presence = true;
    app.tick(hw.at(0), &mut sink);
    hw.presence = false;
    hw.report(MotionFeedback::OpenReached);
    app.tick(hw.at(100), &mut sink);
    app.tick(hw.at(1000), &mut sink);
    assert_eq!(app.state(), DoorState::Closing);
}

#[test]
fn events_from_queue_drive_the_service() {
    let (mut app, mut hw, mut sink) = make_app();
    let queue = EventQueue::new();

    assert!(queue.push(Event::ButtonPressed));
    assert!(queue.push(Event::ControlTick));
    queue.drain(|e| app.handle_event(e, hw.at(10), &mut sink));
    assert_eq!(app.state(), DoorState::Opening);

    assert!(queue.push(Event::MotionOpenReached));
    assert!(queue.push(Event::ControlTick));
    assert!(queue.push(Event::TelemetryTick));
    queue.drain(|e| app.handle_event(e, hw.at(20), &mut sink));
    assert_eq!(app.state(), DoorState::Open);

    match sink.events.last() {
        Some(AppEvent::Telemetry(t)) => {
            assert_eq!(t.state, DoorState::Open);
            assert_eq!(t.last_presence_ms, Some(10));
            assert_eq!(t.fault_flags, 0);
        }
        other => panic!("expected telemetry, got {other:?}"),
    }
}

#[test]
fn clock_regression_is_clamped_and_reported() {
    let (mut app, mut hw, mut sink) = make_app();
    hw.presence = true;
    app.tick(hw.at(1000), &mut sink);
    hw.presence = false;
    app.tick(hw.at(10), &mut sink);

    assert!(sink.contains(&AppEvent::ClockRegression { count: 1 }));
    assert_eq!(app.fault_flags(), DoorFault::ClockRegression.mask());
    // Clamped to 1000: elapsed 0, still opening.
    assert_eq!(app.state(), DoorState::Opening);
    assert_eq!(app.controller().ms_in_state(), 0);
}
