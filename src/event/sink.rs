// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host controller boundary.

use std::fmt;

use crate::state::StateChange;

use super::DeviceId;

/// Severity of a host-visible log event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Diagnostic detail.
    Debug,
    /// Normal activity, such as a command being sent.
    Info,
    /// Something was ignored that the user may care about.
    Warning,
    /// A payload or action was rejected.
    Error,
}

impl Severity {
    /// Returns the lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receiver of normalized state updates and log events.
///
/// This is where the host controller plugs in its device record store.
/// Implementations must not block; they are called while the device's
/// lock is held.
///
/// # Examples
///
/// ```
/// use std::sync::Mutex;
///
/// use shelly_mqtt::event::{DeviceId, Severity, StateSink};
/// use shelly_mqtt::state::StateChange;
///
/// #[derive(Default)]
/// struct Recorder(Mutex<Vec<String>>);
///
/// impl StateSink for Recorder {
///     fn set_state(&self, _device: DeviceId, change: &StateChange) {
///         self.0.lock().unwrap().push(change.field_name().to_string());
///     }
///
///     fn log_event(&self, _device: DeviceId, _severity: Severity, message: &str) {
///         self.0.lock().unwrap().push(message.to_string());
///     }
/// }
/// ```
pub trait StateSink: Send + Sync {
    /// Records a field update that changed the device's state.
    fn set_state(&self, device: DeviceId, change: &StateChange);

    /// Records a log event for the device.
    fn log_event(&self, device: DeviceId, severity: Severity, message: &str);
}
