// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Registry of configured devices sharing one broker connection.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::device::{Action, Device};
use crate::error::{Error, Result};
use crate::event::{DeviceEvent, DeviceId, EventBus, StateSink};
use crate::protocol::Publisher;
use crate::state::DeviceState;
use crate::topic::TopicSet;

use super::device_config::DeviceConfig;

/// Routes broker traffic to the devices that subscribed to it.
///
/// Each device sits behind its own lock, so one device's handler never
/// blocks another's state. Devices are kept in insertion order, which makes
/// the merged subscription list stable across calls.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use shelly_mqtt::device::{Action, Model};
/// use shelly_mqtt::event::EventBus;
/// use shelly_mqtt::manager::{DeviceConfig, DeviceManager};
/// use shelly_mqtt::protocol::MemoryPublisher;
///
/// let publisher = Arc::new(MemoryPublisher::new());
/// let manager = DeviceManager::with_event_bus(publisher.clone(), EventBus::new());
///
/// let config = DeviceConfig::new(Model::Relay, "shellies/shelly1-test")
///     .with_broker("12345", "shellies");
/// let id = manager.add_device("Porch", config).unwrap();
///
/// manager.deliver("shellies/shelly1-test/relay/0", "on");
/// assert!(manager.state(id).unwrap().is_on());
///
/// manager.apply_action(id, Action::TurnOff).unwrap();
/// assert_eq!(publisher.last().unwrap().payload, "off");
/// ```
pub struct DeviceManager {
    devices: RwLock<Vec<Arc<Mutex<Device>>>>,
    publisher: Arc<dyn Publisher>,
    sink: Arc<dyn StateSink>,
    events: Option<EventBus>,
}

impl DeviceManager {
    /// Creates a manager reporting state and log events to `sink`.
    #[must_use]
    pub fn new(publisher: Arc<dyn Publisher>, sink: Arc<dyn StateSink>) -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            publisher,
            sink,
            events: None,
        }
    }

    /// Creates a manager reporting everything, lifecycle included, on `bus`.
    #[must_use]
    pub fn with_event_bus(publisher: Arc<dyn Publisher>, bus: EventBus) -> Self {
        Self {
            devices: RwLock::new(Vec::new()),
            publisher,
            sink: Arc::new(bus.clone()),
            events: Some(bus),
        }
    }

    /// Returns the event bus, if the manager was created with one.
    #[must_use]
    pub fn event_bus(&self) -> Option<&EventBus> {
        self.events.as_ref()
    }

    /// Validates and registers a new device under a fresh ID.
    ///
    /// The host should persist the returned ID with the record and pass it
    /// to [`restore_device`](Self::restore_device) from then on.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is incomplete or
    /// holds an unusable option.
    pub fn add_device(&self, name: impl Into<String>, config: DeviceConfig) -> Result<DeviceId> {
        self.insert(DeviceId::new(), name.into(), config, None)
    }

    /// Registers a persisted device under its stored ID.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is invalid, or
    /// [`Error::DuplicateDevice`] if `id` is already registered.
    pub fn restore_device(
        &self,
        id: DeviceId,
        name: impl Into<String>,
        config: DeviceConfig,
        state: DeviceState,
    ) -> Result<DeviceId> {
        self.insert(id, name.into(), config, Some(state))
    }

    fn insert(
        &self,
        id: DeviceId,
        name: String,
        config: DeviceConfig,
        state: Option<DeviceState>,
    ) -> Result<DeviceId> {
        config.validate()?;
        if self.find(id).is_some() {
            return Err(Error::DuplicateDevice(id));
        }

        tracing::info!(%id, name = %name, model = %config.model, "Adding device");
        let mut device = Device::new(
            id,
            name,
            config,
            Arc::clone(&self.publisher),
            Arc::clone(&self.sink),
        );
        if let Some(state) = state {
            device = device.with_state(state);
        }

        let known = self.subscriptions();
        self.devices.write().push(Arc::new(Mutex::new(device)));
        self.subscribe_new(&known);
        if let Some(bus) = &self.events {
            bus.publish(DeviceEvent::device_added(id));
        }
        Ok(id)
    }

    /// Removes a device. Returns `false` if it was not registered.
    pub fn remove_device(&self, id: DeviceId) -> bool {
        let removed = {
            let mut devices = self.devices.write();
            let before = devices.len();
            devices.retain(|device| device.lock().id() != id);
            devices.len() != before
        };
        if removed {
            tracing::info!(%id, "Removed device");
            if let Some(bus) = &self.events {
                bus.publish(DeviceEvent::device_removed(id));
            }
        }
        removed
    }

    /// Replaces a device's configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown ID and
    /// [`Error::Validation`] for an invalid configuration.
    pub fn update_config(&self, id: DeviceId, config: DeviceConfig) -> Result<()> {
        config.validate()?;
        let device = self.find(id).ok_or(Error::DeviceNotFound)?;
        let known = self.subscriptions();
        device.lock().set_config(config);
        self.subscribe_new(&known);
        Ok(())
    }

    /// Subscribes the transport to merged topics missing from `known`.
    ///
    /// Topics a device stops using stay subscribed; [`deliver`](Self::deliver)
    /// drops their messages.
    fn subscribe_new(&self, known: &[String]) {
        let added: Vec<String> = self
            .subscriptions()
            .into_iter()
            .filter(|topic| !known.contains(topic))
            .collect();
        if !added.is_empty() {
            tracing::debug!(count = added.len(), "Device topics added");
            self.publisher.subscribe(&added);
        }
    }

    /// Returns the registered device IDs in insertion order.
    #[must_use]
    pub fn device_ids(&self) -> Vec<DeviceId> {
        self.devices.read().iter().map(|d| d.lock().id()).collect()
    }

    /// Returns the number of registered devices.
    #[must_use]
    pub fn device_count(&self) -> usize {
        self.devices.read().len()
    }

    /// Returns a snapshot of a device's state.
    #[must_use]
    pub fn state(&self, id: DeviceId) -> Option<DeviceState> {
        self.find(id).map(|device| device.lock().state().clone())
    }

    /// Returns a copy of a device's configuration.
    #[must_use]
    pub fn config(&self, id: DeviceId) -> Option<DeviceConfig> {
        self.find(id).map(|device| device.lock().config().clone())
    }

    /// Returns every topic any device needs, without duplicates.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        let mut topics = TopicSet::default();
        for device in self.devices.read().iter() {
            for topic in device.lock().subscriptions() {
                topics.push(topic);
            }
        }
        topics.into_vec()
    }

    /// Hands an inbound message to every device subscribed to its topic.
    pub fn deliver(&self, topic: &str, payload: &str) {
        let devices = self.devices.read();
        let mut delivered = 0_usize;
        for device in devices.iter() {
            let mut device = device.lock();
            if device.subscriptions().iter().any(|t| t == topic) {
                device.deliver(topic, payload);
                delivered += 1;
            }
        }
        if delivered == 0 {
            tracing::trace!(topic = %topic, "No device subscribed");
        }
    }

    /// Applies an action, logging any device-level failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown ID.
    pub fn apply_action(&self, id: DeviceId, action: Action) -> Result<()> {
        let device = self.find(id).ok_or(Error::DeviceNotFound)?;
        device.lock().apply_action(action);
        Ok(())
    }

    /// Applies an action, returning any failure to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DeviceNotFound`] for an unknown ID, or whatever the
    /// device reports, e.g. [`Error::UnsupportedAction`].
    pub fn handle_action(&self, id: DeviceId, action: &Action) -> Result<()> {
        let device = self.find(id).ok_or(Error::DeviceNotFound)?;
        let mut device = device.lock();
        device.handle_action(action)
    }

    fn find(&self, id: DeviceId) -> Option<Arc<Mutex<Device>>> {
        self.devices
            .read()
            .iter()
            .find(|device| device.lock().id() == id)
            .map(Arc::clone)
    }
}

impl std::fmt::Debug for DeviceManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceManager")
            .field("devices", &self.device_count())
            .field("events", &self.events.is_some())
            .finish_non_exhaustive()
    }
}
