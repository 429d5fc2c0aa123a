// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly MQTT - Gen1 Shelly devices as normalized home-automation state.
//!
//! This library turns the per-field MQTT topics published by first
//! generation Shelly devices into typed state updates, and host actions
//! (turn on, dim, set color) into the exact command payloads each model
//! accepts.
//!
//! # Supported Models
//!
//! - **Relays**: Shelly 1, Shelly 1PM (power and energy metering)
//! - **Lights**: Dimmer, Bulb, RGBW2 (color or white channels), Duo
//! - **Sensors**: H&T, Flood, Door/Window
//! - **Covers**: Shelly 2.5 in roller mode
//!
//! # Architecture
//!
//! - [`Device`] holds one device's configuration and normalized
//!   [`DeviceState`](state::DeviceState), and handles messages and actions
//!   synchronously.
//! - Outbound commands go through a [`Publisher`](protocol::Publisher);
//!   state changes and log lines go to a [`StateSink`](event::StateSink).
//! - [`DeviceManager`](manager::DeviceManager) routes inbound messages by
//!   topic and merges every device's subscriptions.
//! - With the default `mqtt` feature, [`protocol::connect`] runs the whole
//!   thing over a rumqttc connection.
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use shelly_mqtt::device::{Action, Model};
//! use shelly_mqtt::event::EventBus;
//! use shelly_mqtt::manager::{DeviceConfig, DeviceManager};
//! use shelly_mqtt::protocol::MemoryPublisher;
//!
//! let publisher = Arc::new(MemoryPublisher::new());
//! let manager = DeviceManager::with_event_bus(publisher.clone(), EventBus::new());
//!
//! let config = DeviceConfig::new(Model::Dimmer, "shellies/shellydimmer-test")
//!     .with_broker("12345", "shellies");
//! let id = manager.add_device("Hallway", config)?;
//!
//! manager.apply_action(id, Action::SetBrightness(40))?;
//!
//! let sent = publisher.last().unwrap();
//! assert_eq!(sent.topic, "shellies/shellydimmer-test/light/0/set");
//! assert_eq!(sent.payload, r#"{"turn":"on","brightness":40}"#);
//! # Ok::<(), shelly_mqtt::Error>(())
//! ```
//!
//! ## Over MQTT
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use shelly_mqtt::event::EventBus;
//! use shelly_mqtt::manager::DeviceManager;
//! use shelly_mqtt::protocol::{MqttBrokerConfig, connect};
//!
//! #[tokio::main]
//! async fn main() -> shelly_mqtt::Result<()> {
//!     let config = MqttBrokerConfig::from_url("mqtt://192.168.1.50:1883")?;
//!     let (publisher, events) = connect(&config);
//!
//!     let bus = EventBus::new();
//!     let mut updates = bus.subscribe();
//!     let manager = DeviceManager::with_event_bus(Arc::new(publisher), bus);
//!
//!     tokio::spawn(async move {
//!         while let Ok(event) = updates.recv().await {
//!             println!("{event:?}");
//!         }
//!     });
//!
//!     events.run(&manager).await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod device;
pub mod error;
pub mod event;
pub mod manager;
pub mod normalize;
pub mod protocol;
pub mod state;
pub mod telemetry;
pub mod topic;
pub mod types;

pub use device::{Action, ColorLevels, Device, Model, Outcome};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValidationErrors};
pub use event::{DeviceEvent, DeviceId, EventBus, Severity, StateSink};
pub use manager::{DeviceConfig, DeviceManager};
pub use protocol::{MemoryPublisher, MqttBrokerConfig, Publisher};
pub use state::{DeviceState, StateChange};
pub use types::{ContactState, LightMode, Percent, PowerState, RgbColor, RollerState};
