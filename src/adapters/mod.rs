//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements         | Connects to                  |
//! |-------------|--------------------|------------------------------|
//! | `hardware`  | PresencePort       | PIR sensor GPIO              |
//! |             | ActuatorPort       | Motor enable/dir, end stops  |
//! |             | IndicatorPort      | Open / close LEDs            |
//! |             | ClockPort          | Injected clock               |
//! | `log_sink`  | EventSink          | Serial log output            |
//! | `time`      | ClockPort          | ESP32 system timer           |

pub mod hardware;
pub mod log_sink;
pub mod time;
