// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! rumqttc transport.
//!
//! [`connect`] splits one broker connection into a [`MqttPublisher`], handed
//! to devices, and an [`MqttEvents`] loop that feeds incoming messages into
//! a [`DeviceManager`].
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelly_mqtt::event::EventBus;
//! use shelly_mqtt::manager::DeviceManager;
//! use shelly_mqtt::protocol::{MqttBrokerConfig, connect};
//!
//! # async fn example() -> shelly_mqtt::Result<()> {
//! let config = MqttBrokerConfig::from_url("mqtt://192.168.1.50:1883")?;
//! let (publisher, events) = connect(&config);
//!
//! let manager = DeviceManager::new(Arc::new(publisher), Arc::new(EventBus::new()));
//! events.run(&manager).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use rumqttc::{AsyncClient, Event, EventLoop, MqttOptions, Packet, QoS, SubscribeFilter};

use crate::error::ProtocolError;
use crate::manager::DeviceManager;

use super::{MqttBrokerConfig, Publisher};

/// Global counter for generating unique client IDs.
static CLIENT_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Capacity of the request channel between client handles and the event loop.
const REQUEST_CHANNEL_CAPACITY: usize = 64;

/// Opens a broker connection.
///
/// Nothing is sent until [`MqttEvents::run`] polls the connection.
#[must_use]
pub fn connect(config: &MqttBrokerConfig) -> (MqttPublisher, MqttEvents) {
    let client_id = config.client_id().map_or_else(
        || {
            let counter = CLIENT_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("shelly_mqtt_{}_{}", std::process::id(), counter)
        },
        str::to_string,
    );

    let mut options = MqttOptions::new(client_id, config.host(), config.port());
    options.set_keep_alive(config.keep_alive());
    options.set_clean_session(true);
    if let Some((username, password)) = config.credentials() {
        options.set_credentials(username, password);
    }

    let (client, event_loop) = AsyncClient::new(options, REQUEST_CHANNEL_CAPACITY);

    (
        MqttPublisher {
            client: client.clone(),
        },
        MqttEvents { client, event_loop },
    )
}

/// Publishes device commands on the broker connection.
///
/// Cheap to clone; all clones share the connection.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    client: AsyncClient,
}

impl MqttPublisher {
    /// Disconnects from the broker.
    ///
    /// # Errors
    ///
    /// Returns error if the disconnect request cannot be queued.
    pub async fn disconnect(&self) -> Result<(), ProtocolError> {
        self.client.disconnect().await.map_err(ProtocolError::Mqtt)
    }
}

impl Publisher for MqttPublisher {
    fn publish(&self, topic: &str, payload: &str) {
        tracing::debug!(topic = %topic, payload = %payload, "Publishing MQTT message");
        if let Err(e) = self
            .client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
        {
            tracing::warn!(topic = %topic, error = %e, "Failed to queue MQTT publish");
        }
    }

    fn subscribe(&self, topics: &[String]) {
        if topics.is_empty() {
            return;
        }
        tracing::debug!(count = topics.len(), "Subscribing to new device topics");
        if let Err(e) = self.client.try_subscribe_many(filters(topics.iter().cloned())) {
            tracing::warn!(error = %e, "Failed to queue MQTT subscribe");
        }
    }
}

fn filters(topics: impl IntoIterator<Item = String>) -> impl Iterator<Item = SubscribeFilter> {
    topics
        .into_iter()
        .map(|topic| SubscribeFilter::new(topic, QoS::AtMostOnce))
}

/// Incoming side of the broker connection.
pub struct MqttEvents {
    client: AsyncClient,
    event_loop: EventLoop,
}

impl MqttEvents {
    /// Polls the connection, routing every incoming publish to `manager`.
    ///
    /// On each (re)connect the union of all managed devices' topics is
    /// subscribed; devices added later subscribe through the
    /// [`MqttPublisher`]. Returns when the broker disconnects.
    ///
    /// # Errors
    ///
    /// Returns [`ProtocolError::ConnectionFailed`] when the connection
    /// breaks, or an MQTT error if the subscription cannot be queued.
    pub async fn run(mut self, manager: &DeviceManager) -> Result<(), ProtocolError> {
        loop {
            match self.event_loop.poll().await {
                Ok(Event::Incoming(Packet::ConnAck(connack))) => {
                    tracing::info!(?connack, "MQTT broker connected");
                    self.subscribe_all(manager)?;
                }
                Ok(Event::Incoming(Packet::SubAck(suback))) => {
                    tracing::debug!(?suback, "MQTT subscription acknowledged");
                }
                Ok(Event::Incoming(Packet::Publish(publish))) => {
                    match String::from_utf8(publish.payload.to_vec()) {
                        Ok(payload) => manager.deliver(&publish.topic, &payload),
                        Err(_) => {
                            tracing::warn!(topic = %publish.topic, "Dropping non UTF-8 payload");
                        }
                    }
                }
                Ok(Event::Incoming(Packet::Disconnect)) => {
                    tracing::info!("MQTT broker disconnected");
                    return Ok(());
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!(error = %e, "MQTT event loop error");
                    return Err(ProtocolError::ConnectionFailed(e.to_string()));
                }
            }
        }
    }

    fn subscribe_all(&self, manager: &DeviceManager) -> Result<(), ProtocolError> {
        let topics = manager.subscriptions();
        if topics.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = topics.len(), "Subscribing to device topics");
        self.client
            .try_subscribe_many(filters(topics))
            .map_err(ProtocolError::Mqtt)
    }
}

impl std::fmt::Debug for MqttEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MqttEvents").finish_non_exhaustive()
    }
}
