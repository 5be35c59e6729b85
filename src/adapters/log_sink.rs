//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  Telemetry is rendered as a
//! single JSON line so it can be scraped off the serial console.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Telemetry(t) => match serde_json::to_string(t) {
                Ok(json) => info!("TELEM | {json}"),
                Err(e) => warn!("TELEM | encode failed: {e}"),
            },
            AppEvent::StateChanged { from, to } => {
                info!("STATE | {:?} -> {:?}", from, to);
            }
            AppEvent::PresenceDetected { at_ms } => {
                info!("PRESENCE | detected at {}ms", at_ms);
            }
            AppEvent::FaultRaised(fault) => {
                warn!("FAULT | raised: {fault} (0b{:04b})", fault.mask());
            }
            AppEvent::FaultCleared(flags) => {
                info!("FAULT | cleared, flags=0b{:04b}", flags);
            }
            AppEvent::ClockRegression { count } => {
                warn!("CLOCK | regression #{count}, sample clamped");
            }
            AppEvent::ConfigUpdated => {
                info!("CONFIG | updated");
            }
            AppEvent::Started(state) => {
                info!("START | initial_state={:?}", state);
            }
        }
    }
}
