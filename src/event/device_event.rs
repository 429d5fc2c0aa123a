// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device event types.

use chrono::{DateTime, Utc};

use crate::state::StateChange;

use super::{DeviceId, Severity};

/// Events emitted towards the host controller.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::event::{DeviceEvent, DeviceId, Severity};
/// use shelly_mqtt::state::StateChange;
/// use shelly_mqtt::types::PowerState;
///
/// let device_id = DeviceId::new();
///
/// let changed = DeviceEvent::state_changed(device_id, StateChange::Power(PowerState::On));
/// assert!(changed.is_state_change());
///
/// let logged = DeviceEvent::logged(device_id, Severity::Info, "\"Kitchen\" on");
/// assert_eq!(logged.device_id(), device_id);
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub enum DeviceEvent {
    /// A device was added to the manager.
    DeviceAdded {
        /// The ID of the added device.
        device_id: DeviceId,
    },

    /// A device was removed from the manager.
    DeviceRemoved {
        /// The ID of the removed device.
        device_id: DeviceId,
    },

    /// A normalized state field changed.
    StateChanged {
        /// The ID of the device.
        device_id: DeviceId,
        /// The field update.
        change: StateChange,
        /// Display string for fields that carry a unit (`"101.123 W"`).
        display: Option<String>,
    },

    /// A device logged a host-visible message.
    Logged {
        /// The ID of the device.
        device_id: DeviceId,
        /// Message severity.
        severity: Severity,
        /// The message text.
        message: String,
        /// When the message was logged.
        at: DateTime<Utc>,
    },
}

impl DeviceEvent {
    /// Returns the device ID associated with this event.
    #[must_use]
    pub fn device_id(&self) -> DeviceId {
        match self {
            Self::DeviceAdded { device_id }
            | Self::DeviceRemoved { device_id }
            | Self::StateChanged { device_id, .. }
            | Self::Logged { device_id, .. } => *device_id,
        }
    }

    /// Returns `true` if this is a device lifecycle event (added/removed).
    #[must_use]
    pub fn is_lifecycle(&self) -> bool {
        matches!(self, Self::DeviceAdded { .. } | Self::DeviceRemoved { .. })
    }

    /// Returns `true` if this is a state change event.
    #[must_use]
    pub fn is_state_change(&self) -> bool {
        matches!(self, Self::StateChanged { .. })
    }

    /// Returns `true` if this is a log event.
    #[must_use]
    pub fn is_log(&self) -> bool {
        matches!(self, Self::Logged { .. })
    }

    /// Creates a device added event.
    #[must_use]
    pub fn device_added(device_id: DeviceId) -> Self {
        Self::DeviceAdded { device_id }
    }

    /// Creates a device removed event.
    #[must_use]
    pub fn device_removed(device_id: DeviceId) -> Self {
        Self::DeviceRemoved { device_id }
    }

    /// Creates a state changed event, deriving the display string.
    #[must_use]
    pub fn state_changed(device_id: DeviceId, change: StateChange) -> Self {
        let display = change.display();
        Self::StateChanged {
            device_id,
            change,
            display,
        }
    }

    /// Creates a log event stamped with the current time.
    #[must_use]
    pub fn logged(device_id: DeviceId, severity: Severity, message: impl Into<String>) -> Self {
        Self::Logged {
            device_id,
            severity,
            message: message.into(),
            at: Utc::now(),
        }
    }
}
