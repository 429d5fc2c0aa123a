// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting device events.

use tokio::sync::broadcast;

use crate::state::StateChange;

use super::{DeviceEvent, DeviceId, Severity, StateSink};

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// Event bus for broadcasting device events to multiple subscribers.
///
/// The bus is the default [`StateSink`]: every state update and log event a
/// device emits becomes a [`DeviceEvent`] on the channel. Sending never
/// blocks, so it is safe to call while a device lock is held.
///
/// # Capacity
///
/// The event bus has a fixed capacity (default 256). If the channel fills
/// up because a subscriber is slow, older events may be dropped for that
/// subscriber (they will receive a `RecvError::Lagged` error).
///
/// # Examples
///
/// ```
/// use shelly_mqtt::event::{DeviceEvent, DeviceId, EventBus, Severity, StateSink};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.log_event(DeviceId::new(), Severity::Info, "\"Porch\" on");
///
/// assert!(matches!(rx.try_recv(), Ok(DeviceEvent::Logged { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Subscribes to device events.
    ///
    /// Returns a receiver that will receive all events published after
    /// the subscription is created.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// If there are no subscribers, the event is silently discarded.
    pub fn publish(&self, event: DeviceEvent) {
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl StateSink for EventBus {
    fn set_state(&self, device: DeviceId, change: &StateChange) {
        self.publish(DeviceEvent::state_changed(device, change.clone()));
    }

    fn log_event(&self, device: DeviceId, severity: Severity, message: &str) {
        self.publish(DeviceEvent::logged(device, severity, message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PowerState;

    #[test]
    fn new_bus_has_no_subscribers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn drop_subscriber_decrements_count() {
        let bus = EventBus::new();

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_delivers_to_multiple_subscribers() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        let device_id = DeviceId::new();
        bus.publish(DeviceEvent::device_added(device_id));

        assert_eq!(rx1.recv().await.unwrap().device_id(), device_id);
        assert_eq!(rx2.recv().await.unwrap().device_id(), device_id);
    }

    #[tokio::test]
    async fn sink_publishes_state_changes() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let device_id = DeviceId::new();

        bus.set_state(device_id, &StateChange::Power(PowerState::Off));

        match rx.recv().await.unwrap() {
            DeviceEvent::StateChanged { change, .. } => {
                assert_eq!(change, StateChange::Power(PowerState::Off));
            }
            other => panic!("expected StateChanged, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn sink_publishes_log_events() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();
        let device_id = DeviceId::new();

        bus.log_event(device_id, Severity::Error, "\"Bulb\" was overloaded!");

        match rx.recv().await.unwrap() {
            DeviceEvent::Logged { severity, message, .. } => {
                assert_eq!(severity, Severity::Error);
                assert_eq!(message, "\"Bulb\" was overloaded!");
            }
            other => panic!("expected Logged, got {other:?}"),
        }
    }

    #[test]
    fn sink_without_subscribers_is_silent() {
        let bus = EventBus::new();
        bus.set_state(DeviceId::new(), &StateChange::Online(true));
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::new();
        let bus2 = bus1.clone();

        let _rx = bus1.subscribe();
        assert_eq!(bus2.subscriber_count(), 1);
    }
}
