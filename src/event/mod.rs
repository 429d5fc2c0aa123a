// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host controller boundary and event system.
//!
//! Devices report normalized state updates and log events through the
//! [`StateSink`] trait. The [`EventBus`] implementation turns them into
//! [`DeviceEvent`]s on a tokio broadcast channel that any number of host
//! components can subscribe to.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::event::{DeviceEvent, DeviceId, EventBus};
//!
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe();
//!
//! let device_id = DeviceId::new();
//! bus.publish(DeviceEvent::DeviceAdded { device_id });
//! assert_eq!(rx.try_recv().unwrap().device_id(), device_id);
//! ```

mod device_event;
mod device_id;
mod event_bus;
mod sink;

pub use device_event::DeviceEvent;
pub use device_id::DeviceId;
pub use event_bus::EventBus;
pub use sink::{Severity, StateSink};
