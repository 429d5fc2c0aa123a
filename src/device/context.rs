// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-device dependencies handed to variant handlers.

use std::sync::Arc;

use crate::command::Command;
use crate::event::{DeviceId, Severity, StateSink};
use crate::manager::DeviceConfig;
use crate::protocol::Publisher;
use crate::state::{DeviceState, StateChange};
use crate::topic::Endpoint;
use crate::types::{Percent, PowerState};

/// Everything a handler may touch while processing one message or action.
///
/// The state record belongs to this device alone; handlers reach the host
/// and the transport only through the sink and publisher held here.
pub(crate) struct DeviceContext {
    pub(crate) id: DeviceId,
    pub(crate) name: String,
    pub(crate) config: DeviceConfig,
    pub(crate) state: DeviceState,
    publisher: Arc<dyn Publisher>,
    sink: Arc<dyn StateSink>,
}

impl DeviceContext {
    pub(crate) fn new(
        id: DeviceId,
        name: String,
        config: DeviceConfig,
        publisher: Arc<dyn Publisher>,
        sink: Arc<dyn StateSink>,
    ) -> Self {
        Self {
            id,
            name,
            config,
            state: DeviceState::new(),
            publisher,
            sink,
        }
    }

    /// Applies a change, notifying the host only if the state moved.
    pub(crate) fn update(&mut self, change: StateChange) -> bool {
        let changed = self.state.apply(&change);
        if changed {
            tracing::debug!(device = %self.name, field = change.field_name(), "State updated");
            self.sink.set_state(self.id, &change);
        }
        changed
    }

    /// Sets a fault flag, logging an error when it becomes set.
    pub(crate) fn update_fault(&mut self, change: StateChange, message: &str) {
        let raised = matches!(
            change,
            StateChange::Overpower(true)
                | StateChange::Overload(true)
                | StateChange::Overtemperature(true)
                | StateChange::LoadError(true)
                | StateChange::Flood(true)
        );
        if self.update(change) && raised {
            self.log(Severity::Error, &format!("\"{}\" {message}", self.name));
        }
    }

    /// Sets brightness and derives power from it: on exactly when positive.
    pub(crate) fn apply_brightness(&mut self, level: Percent) -> bool {
        let power = self.update(StateChange::Power(PowerState::from(level.is_positive())));
        self.update(StateChange::Brightness(level)) || power
    }

    /// Emits a host-visible log event.
    pub(crate) fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => tracing::debug!(device = %self.name, "{message}"),
            Severity::Info => tracing::info!(device = %self.name, "{message}"),
            Severity::Warning => tracing::warn!(device = %self.name, "{message}"),
            Severity::Error => tracing::error!(device = %self.name, "{message}"),
        }
        self.sink.log_event(self.id, severity, message);
    }

    /// Logs a change reported by the device, e.g. `received "Porch" on`.
    pub(crate) fn log_received(&self, what: &str) {
        self.log(Severity::Info, &format!("received \"{}\" {what}", self.name));
    }

    /// Logs a command sent to the device, e.g. `sent "Porch" brightness to 50%`.
    pub(crate) fn log_sent(&self, what: &str) {
        self.log(Severity::Info, &format!("sent \"{}\" {what}", self.name));
    }

    /// Publishes a command for this device.
    pub(crate) fn send(&self, endpoint: &Endpoint, command: &impl Command) {
        let topic = command.topic(endpoint);
        let payload = command.payload();
        tracing::debug!(device = %self.name, topic = %topic, payload = %payload, "Sending command");
        self.publisher.publish(&topic, &payload);
    }

    /// Returns the known brightness, treating unknown as 0.
    pub(crate) fn brightness(&self) -> Percent {
        self.state.brightness().unwrap_or(Percent::MIN)
    }

    /// Returns `On` only when the device is definitively on.
    pub(crate) fn turn(&self) -> PowerState {
        PowerState::from(self.state.is_on())
    }
}
