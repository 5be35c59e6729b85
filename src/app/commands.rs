//! Inbound commands to the application service.

use crate::config::DoorConfig;

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Manual open request (push-button).  Counts as presence on the
    /// next tick.
    OpenRequest,

    /// Hot-reload configuration.  Rejected if invalid.
    UpdateConfig(DoorConfig),

    /// Acknowledge every latched fault.
    ClearFaults,
}
