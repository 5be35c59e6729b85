//! GPIO pin assignments for the door controller board (ESP32-S3).
//!
//! Single source of truth: the firmware entry point claims every pin
//! from here rather than hard-coding numbers.

// ---------------------------------------------------------------------------
// Presence
// ---------------------------------------------------------------------------

/// HC-SR501 PIR output.  HIGH = presence.
pub const PIR_GPIO: i32 = 10;

/// Manual open push-button.  Active LOW, internal pull-up.
pub const OPEN_BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// Door motor (H-bridge)
// ---------------------------------------------------------------------------

/// Digital output: HIGH = bridge enabled.
pub const MOTOR_ENABLE_GPIO: i32 = 1;
/// Digital output: HIGH = opening, LOW = closing.
pub const MOTOR_DIR_GPIO: i32 = 2;

/// End stop at the fully-open position.  LOW = switch closed.
pub const LIMIT_OPEN_GPIO: i32 = 4;
/// End stop at the fully-closed position.  LOW = switch closed.
pub const LIMIT_CLOSED_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

/// Green LED: blinking while opening, steady while open.
pub const LED_OPENING_GPIO: i32 = 11;
/// Red LED: blinking while closing, steady while closed.
pub const LED_CLOSING_GPIO: i32 = 12;
