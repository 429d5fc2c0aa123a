// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device registry and persisted configuration.
//!
//! The [`DeviceManager`] owns every configured [`Device`](crate::Device),
//! answers the transport's "what should I subscribe to" question and routes
//! each inbound message to the devices that asked for its topic.
//!
//! # Event Subscription
//!
//! ```
//! use std::sync::Arc;
//!
//! use shelly_mqtt::device::Model;
//! use shelly_mqtt::event::{DeviceEvent, EventBus};
//! use shelly_mqtt::manager::{DeviceConfig, DeviceManager};
//! use shelly_mqtt::protocol::MemoryPublisher;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let manager = DeviceManager::with_event_bus(Arc::new(MemoryPublisher::new()), EventBus::new());
//! let mut events = manager.event_bus().unwrap().subscribe();
//!
//! let config = DeviceConfig::new(Model::HumidityTemperature, "shellies/shelly-ht-test")
//!     .with_broker("12345", "shellies");
//! manager.add_device("Cellar", config).unwrap();
//! manager.deliver("shellies/shelly-ht-test/sensor/humidity", "64");
//!
//! assert!(events.recv().await.unwrap().is_lifecycle());
//! match events.recv().await.unwrap() {
//!     DeviceEvent::StateChanged { display, .. } => assert_eq!(display.as_deref(), Some("64%")),
//!     other => panic!("unexpected event {other:?}"),
//! }
//! # }
//! ```

mod device_config;
mod device_manager;

pub use device_config::DeviceConfig;
pub use device_manager::DeviceManager;
