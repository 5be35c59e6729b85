//! AutoDoor Firmware: Main Entry Point
//!
//! Hexagonal architecture with event-driven execution.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter              LogEventSink      SystemClock    │
//! │  (Presence+Actuator+LEDs)     (EventSink)       (ClockPort)    │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            DoorService (pure logic)                    │    │
//! │  │  DoorController · FSM · FaultLatch                     │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  OpenButton (polled) ──▶ Event queue ──▶ main loop             │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use log::info;

use autodoor::adapters::hardware::HardwareAdapter;
use autodoor::adapters::log_sink::LogEventSink;
use autodoor::adapters::time::SystemClock;
use autodoor::app::ports::ClockPort;
use autodoor::app::service::DoorService;
use autodoor::config::DoorConfig;
use autodoor::drivers::button::OpenButton;
use autodoor::drivers::indicator::IndicatorLed;
use autodoor::drivers::motor::{DoorMotor, LimitSwitches, MotorPins};
use autodoor::drivers::pir::PirSensor;
use autodoor::events::{drain_events, push_event, Event};
use autodoor::pins;

type InPin = PinDriver<'static, AnyIOPin, Input>;
type OutPin = PinDriver<'static, AnyOutputPin, Output>;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  AutoDoor v{}                        ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration ──────────────────────────────────────
    let config = DoorConfig::default();
    config.validate()?;
    info!(
        "Timeouts: inactivity={}ms motion={}ms, loop={}ms",
        config.inactivity_timeout_ms, config.motion_timeout_ms, config.control_loop_interval_ms
    );

    // ── 3. Peripherals ────────────────────────────────────────
    let pir = PirSensor::new(input_pin(pins::PIR_GPIO, Pull::Down)?);
    let motor = DoorMotor::new(
        MotorPins {
            enable: output_pin(pins::MOTOR_ENABLE_GPIO)?,
            dir: output_pin(pins::MOTOR_DIR_GPIO)?,
        },
        LimitSwitches {
            open: input_pin(pins::LIMIT_OPEN_GPIO, Pull::Up)?,
            closed: input_pin(pins::LIMIT_CLOSED_GPIO, Pull::Up)?,
        },
    );
    let open_led = IndicatorLed::new(
        output_pin(pins::LED_OPENING_GPIO)?,
        config.indicator_blink_semi_period_ms,
    );
    let close_led = IndicatorLed::new(
        output_pin(pins::LED_CLOSING_GPIO)?,
        config.indicator_blink_semi_period_ms,
    );
    let mut button = OpenButton::new(
        input_pin(pins::OPEN_BUTTON_GPIO, Pull::Up)?,
        config.button_debounce_ms,
    );

    let mut hw = HardwareAdapter::new(pir, motor, open_led, close_led, SystemClock::new());
    let mut log_sink = LogEventSink::new();

    // ── 4. Application service ────────────────────────────────
    let mut app = DoorService::new(config)?;
    app.start(&mut hw, &mut log_sink);

    info!("System ready. Entering event loop.");

    // ── 5. Event loop ─────────────────────────────────────────
    let mut last_telemetry_ms = hw.now_ms();

    loop {
        // Runtime config updates take effect from the next iteration.
        let config = app.current_config();
        button.set_debounce_ms(config.button_debounce_ms);

        FreeRtos::delay_ms(config.control_loop_interval_ms);
        let now_ms = hw.now_ms();

        // Button is polled here; a press becomes an open request.
        if button.tick(now_ms).is_some() {
            push_event(Event::ButtonPressed);
        }

        push_event(Event::ControlTick);

        if now_ms.saturating_sub(last_telemetry_ms) >= u64::from(config.telemetry_interval_ms) {
            push_event(Event::TelemetryTick);
            last_telemetry_ms = now_ms;
        }

        drain_events(|event| app.handle_event(event, &mut hw, &mut log_sink));
    }
}

// ── Pin helpers ───────────────────────────────────────────────

fn input_pin(gpio: i32, pull: Pull) -> Result<InPin> {
    // SAFETY: every GPIO number in `pins` is distinct and claimed once, here.
    let pin = unsafe { AnyIOPin::new(gpio) };
    let mut driver = PinDriver::input(pin)?;
    driver.set_pull(pull)?;
    Ok(driver)
}

fn output_pin(gpio: i32) -> Result<OutPin> {
    // SAFETY: as above.
    let pin = unsafe { AnyOutputPin::new(gpio) };
    let mut driver = PinDriver::output(pin)?;
    driver.set_low()?;
    Ok(driver)
}
