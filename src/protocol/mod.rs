// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Transport boundary.
//!
//! Devices hand outbound messages to a [`Publisher`]; they never wait for a
//! broker acknowledgment. Inbound messages reach devices through
//! [`DeviceManager::deliver`](crate::manager::DeviceManager::deliver).
//!
//! # Transports
//!
//! - [`MqttPublisher`] / [`MqttEvents`]: a rumqttc connection (feature `mqtt`)
//! - [`MemoryPublisher`]: keeps published messages in memory, for dry runs
//!   and tests

mod broker_config;
mod memory;
#[cfg(feature = "mqtt")]
mod mqtt;

pub use broker_config::MqttBrokerConfig;
pub use memory::{MemoryPublisher, PublishedMessage};
#[cfg(feature = "mqtt")]
pub use mqtt::{MqttEvents, MqttPublisher, connect};

/// Outbound side of the transport.
///
/// Publishing is fire-and-forget: delivery guarantees belong to the
/// transport, and failures are only logged by the implementation.
pub trait Publisher: Send + Sync {
    /// Publishes `payload` on `topic`.
    fn publish(&self, topic: &str, payload: &str);

    /// Starts routing `topics` to this connection.
    ///
    /// Called when devices added or reconfigured on a live connection need
    /// topics nobody asked for yet.
    fn subscribe(&self, topics: &[String]);
}
