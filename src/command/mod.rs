// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly command definitions.
//!
//! Typed representations of the outbound messages a device adapter
//! publishes. A command knows its topic relative to a device [`Endpoint`]
//! and renders its own payload.
//!
//! # Available Commands
//!
//! | Command Type | Topic | Payload |
//! |-------------|-------|---------|
//! | [`SwitchCommand`] | `<address>/<segment>/<n>/command` | `on`, `off` |
//! | [`StatusRequest`] | `<address>/command` | `update` |
//! | [`RollerCommand`] | `<address>/roller/<n>/command[/pos]` | `open`, `close`, `0`-`100` |
//! | [`BrightnessSet`] | `<address>/<segment>/<n>/set` | `{"turn","brightness"}` |
//! | [`BulbSet`] | `<address>/light/<n>/set` | `{"turn","mode","white","red","green","blue","gain"}` |
//! | [`ColorSet`] | `<address>/color/<n>/set` | `{"turn","red","green","blue","white","gain"}` |
//!
//! Combined `set` payloads carry every field relevant to the channel in a
//! single publish, and never fields belonging to another channel type.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::command::{Command, StatusRequest, SwitchCommand};
//! use shelly_mqtt::topic::{Endpoint, RELAY};
//! use shelly_mqtt::types::PowerState;
//!
//! let endpoint = Endpoint::new("shellies/shelly1-test", 0);
//!
//! let on = SwitchCommand::new(RELAY, PowerState::On);
//! assert_eq!(on.topic(&endpoint), "shellies/shelly1-test/relay/0/command");
//! assert_eq!(on.payload(), "on");
//!
//! assert_eq!(StatusRequest.topic(&endpoint), "shellies/shelly1-test/command");
//! assert_eq!(StatusRequest.payload(), "update");
//! ```

mod light;
mod power;
mod roller;
mod status;

pub use light::{BrightnessSet, BulbSet, ColorSet};
pub use power::SwitchCommand;
pub use roller::RollerCommand;
pub use status::StatusRequest;

use crate::topic::Endpoint;

/// An outbound message for a Shelly device.
pub trait Command {
    /// Returns the full topic for this command on the given endpoint.
    fn topic(&self, endpoint: &Endpoint) -> String;

    /// Returns the payload, either a bare token or a JSON object.
    fn payload(&self) -> String;
}

/// Renders a `set` payload struct as compact JSON.
fn to_json<T: serde::Serialize>(value: &T) -> String {
    // Flat structs of strings and integers always serialize
    serde_json::to_string(value).unwrap_or_default()
}
