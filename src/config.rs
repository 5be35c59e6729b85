//! Door controller configuration.
//!
//! All tunable parameters for the automatic door.  The two timeout
//! constants are the compiled-in defaults; a provisioning blob (JSON or
//! postcard) may override them, but every value goes through
//! [`DoorConfig::validate`] before the controller accepts it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Maximum time the door may stay open with no presence before closing.
pub const AUTOMATIC_DOOR_INACTIVITY_TIMEOUT_MS: u32 = 5_000;

/// Maximum time an opening or closing motion may take before it is
/// treated as a stall.
pub const AUTOMATIC_DOOR_OPENING_CLOSING_TIMEOUT_MS: u32 = 3_000;

/// What the controller does when an opening motion stalls or times out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OpeningStallPolicy {
    /// Stop the motor and fall back to `Closed` with the fault flagged.
    #[default]
    HaltClosed,
    /// Stop the motor and immediately drive the door closed again.
    ReverseToClosing,
}

/// Core door configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoorConfig {
    // --- Timeouts ---
    /// Time without presence before an open door closes (ms).
    pub inactivity_timeout_ms: u32,
    /// Maximum duration of an opening or closing motion (ms).
    pub motion_timeout_ms: u32,
    /// Reaction to an opening stall.
    pub opening_stall_policy: OpeningStallPolicy,

    // --- Timing ---
    /// Control loop interval (ms).
    pub control_loop_interval_ms: u32,
    /// Half-period of the indicator LED blink (ms).
    pub indicator_blink_semi_period_ms: u32,
    /// Open button debounce window (ms).
    pub button_debounce_ms: u32,
    /// Telemetry report interval (ms).
    pub telemetry_interval_ms: u32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        Self {
            // Timeouts
            inactivity_timeout_ms: AUTOMATIC_DOOR_INACTIVITY_TIMEOUT_MS,
            motion_timeout_ms: AUTOMATIC_DOOR_OPENING_CLOSING_TIMEOUT_MS,
            opening_stall_policy: OpeningStallPolicy::HaltClosed,

            // Timing
            control_loop_interval_ms: 50,        // 20 Hz
            indicator_blink_semi_period_ms: 250, // 2 Hz blink
            button_debounce_ms: 50,
            telemetry_interval_ms: 60_000, // 1/min
        }
    }
}

impl DoorConfig {
    /// Build a config with the given timeouts and default timing.
    pub fn with_timeouts(inactivity_timeout_ms: u32, motion_timeout_ms: u32) -> Self {
        Self {
            inactivity_timeout_ms,
            motion_timeout_ms,
            ..Self::default()
        }
    }

    /// Reject any zero duration.  Values are never clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("inactivity_timeout_ms", self.inactivity_timeout_ms),
            ("motion_timeout_ms", self.motion_timeout_ms),
            ("control_loop_interval_ms", self.control_loop_interval_ms),
            (
                "indicator_blink_semi_period_ms",
                self.indicator_blink_semi_period_ms,
            ),
            ("telemetry_interval_ms", self.telemetry_interval_ms),
        ];
        for (name, value) in fields {
            if value == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON provisioning blob.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }

    /// Encode as a compact postcard blob.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(|_| ConfigError::Malformed)
    }

    /// Decode and validate a postcard blob produced by [`to_bytes`](Self::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Malformed)?;
        config.validate()?;
        Ok(config)
    }
}
