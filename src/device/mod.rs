// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device adapters for Shelly models.
//!
//! A [`Device`] is one configured Shelly unit (or one channel of a
//! multi-channel unit). Its [`Model`] selects the variant that knows the
//! model's topics, payload shapes and command encodings.
//!
//! # Delegation
//!
//! Variants are small and compose by explicit fallback instead of
//! inheritance. A message or action the specialized variant does not
//! recognize is passed down the chain:
//!
//! ```text
//! Dimmer / Bulb / RGBW2 / Duo / Roller
//!   -> MeteredRelay(segment)   power, energy, energy reset
//!     -> Relay(segment)        on/off/overpower, input, longpush, switching
//!       -> base                announce, online, device flags, status request
//! ```
//!
//! A topic nobody recognizes is ignored. An action nobody recognizes fails
//! with [`Error::UnsupportedAction`](crate::Error::UnsupportedAction).
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use shelly_mqtt::device::{Action, Device, Model};
//! use shelly_mqtt::event::{DeviceId, EventBus};
//! use shelly_mqtt::manager::DeviceConfig;
//! use shelly_mqtt::protocol::MemoryPublisher;
//!
//! let publisher = Arc::new(MemoryPublisher::new());
//! let config = DeviceConfig::new(Model::Relay, "shellies/shelly1-test");
//! let mut device = Device::new(
//!     DeviceId::new(),
//!     "Porch",
//!     config,
//!     publisher.clone(),
//!     Arc::new(EventBus::new()),
//! );
//!
//! device.deliver("shellies/shelly1-test/relay/0", "on");
//! assert!(device.is_on());
//!
//! device.apply_action(Action::TurnOff);
//! assert!(device.is_off());
//! assert_eq!(publisher.last().unwrap().topic, "shellies/shelly1-test/relay/0/command");
//! ```

mod action;
mod base;
mod context;
mod light;
mod model;
mod relay;
mod roller;
mod sensor;

pub use action::{Action, ActionKind, ColorLevels};
pub use model::Model;

use std::sync::Arc;

use crate::error::Result;
use crate::event::{DeviceId, Severity, StateSink};
use crate::manager::DeviceConfig;
use crate::protocol::Publisher;
use crate::state::DeviceState;
use crate::topic::{Endpoint, TopicSet};

pub(crate) use context::DeviceContext;

/// Whether a variant in the chain dealt with a message or action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The message or action was handled.
    Handled,
    /// No variant recognized it.
    Unhandled,
}

/// An inbound message bound to the device's current endpoint.
#[derive(Clone, Copy)]
pub(crate) struct Message<'a> {
    pub(crate) endpoint: &'a Endpoint,
    pub(crate) topic: &'a str,
    pub(crate) payload: &'a str,
}

/// The adapter contract every device family implements.
pub(crate) trait Variant: Sync {
    /// Appends this variant's topics after the announce and online topics.
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet);

    /// Handles a message or passes it to the fallback variant.
    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome>;

    /// Handles an action or passes it to the fallback variant.
    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome>;
}

/// One configured Shelly device.
///
/// Owns its normalized state exclusively. Message and action processing
/// runs to completion without suspending; the only side effects are
/// publishes through the [`Publisher`] and updates through the
/// [`StateSink`].
pub struct Device {
    ctx: DeviceContext,
}

impl Device {
    /// Creates a device adapter.
    #[must_use]
    pub fn new(
        id: DeviceId,
        name: impl Into<String>,
        config: DeviceConfig,
        publisher: Arc<dyn Publisher>,
        sink: Arc<dyn StateSink>,
    ) -> Self {
        Self {
            ctx: DeviceContext::new(id, name.into(), config, publisher, sink),
        }
    }

    /// Restores previously persisted state.
    #[must_use]
    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.ctx.state = state;
        self
    }

    /// Returns the device ID.
    #[must_use]
    pub fn id(&self) -> DeviceId {
        self.ctx.id
    }

    /// Returns the device name used in log messages.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.ctx.name
    }

    /// Returns the device model.
    #[must_use]
    pub fn model(&self) -> Model {
        self.ctx.config.model
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DeviceConfig {
        &self.ctx.config
    }

    /// Replaces the configuration.
    ///
    /// Topics are derived from the configuration on every call, so a new
    /// address or channel applies to the next subscription request.
    pub fn set_config(&mut self, config: DeviceConfig) {
        self.ctx.config = config;
    }

    /// Returns the normalized state.
    #[must_use]
    pub fn state(&self) -> &DeviceState {
        &self.ctx.state
    }

    /// Returns `true` only if the device is definitively on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.ctx.state.is_on()
    }

    /// Returns `true` only if the device is definitively off.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.ctx.state.is_off()
    }

    /// Returns the topics this device listens on, in a stable order.
    ///
    /// Empty when the device has no address.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        let Some(endpoint) = self.ctx.config.endpoint() else {
            return Vec::new();
        };
        let mut topics = TopicSet::for_endpoint(&endpoint);
        self.model().variant().subscriptions(&endpoint, &mut topics);
        topics.into_vec()
    }

    /// Handles one inbound message.
    ///
    /// # Errors
    ///
    /// Returns error if the payload is malformed, declares the wrong mode,
    /// or needs a configuration option that cannot be parsed.
    pub fn handle_message(&mut self, topic: &str, payload: &str) -> Result<Outcome> {
        let Some(endpoint) = self.ctx.config.endpoint() else {
            return Ok(Outcome::Unhandled);
        };
        let message = Message {
            endpoint: &endpoint,
            topic,
            payload,
        };
        self.model().variant().handle_message(&mut self.ctx, &message)
    }

    /// Handles one inbound message, logging and dropping any failure.
    pub fn deliver(&mut self, topic: &str, payload: &str) {
        match self.handle_message(topic, payload) {
            Ok(Outcome::Handled) => {}
            Ok(Outcome::Unhandled) => {
                tracing::trace!(device = %self.ctx.name, topic = %topic, "Ignoring topic");
            }
            Err(e) => {
                self.ctx.log(
                    Severity::Error,
                    &format!(
                        "\"{}\" rejected message on {topic}: {e} (payload {payload:?})",
                        self.ctx.name
                    ),
                );
            }
        }
    }

    /// Handles one action.
    ///
    /// A device without an address ignores actions with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAction`](crate::Error::UnsupportedAction)
    /// if no variant in the chain handles the action.
    pub fn handle_action(&mut self, action: &Action) -> Result<()> {
        let Some(endpoint) = self.ctx.config.endpoint() else {
            self.ctx.log(
                Severity::Warning,
                &format!("\"{}\" has no address, ignoring {}", self.ctx.name, action.kind()),
            );
            return Ok(());
        };
        match self
            .model()
            .variant()
            .handle_action(&mut self.ctx, &endpoint, action)?
        {
            Outcome::Handled => Ok(()),
            Outcome::Unhandled => Err(crate::Error::UnsupportedAction(action.kind())),
        }
    }

    /// Handles one action, logging and dropping any failure.
    pub fn apply_action(&mut self, action: Action) {
        tracing::debug!(device = %self.ctx.name, action = %action.kind(), "Applying action");
        if let Err(e) = self.handle_action(&action) {
            self.ctx.log(
                Severity::Error,
                &format!("\"{}\" {} failed: {e}", self.ctx.name, action.kind()),
            );
        }
    }
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Device")
            .field("id", &self.ctx.id)
            .field("name", &self.ctx.name)
            .field("model", &self.ctx.config.model)
            .field("address", &self.ctx.config.address())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Shared fixtures for variant tests.

    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::{Device, Model};
    use crate::event::{DeviceId, Severity, StateSink};
    use crate::manager::DeviceConfig;
    use crate::protocol::MemoryPublisher;
    use crate::state::StateChange;

    /// Sink recording every call.
    #[derive(Default)]
    pub(crate) struct RecordingSink {
        pub(crate) changes: Mutex<Vec<StateChange>>,
        pub(crate) logs: Mutex<Vec<(Severity, String)>>,
    }

    impl StateSink for RecordingSink {
        fn set_state(&self, _device: DeviceId, change: &StateChange) {
            self.changes.lock().push(change.clone());
        }

        fn log_event(&self, _device: DeviceId, severity: Severity, message: &str) {
            self.logs.lock().push((severity, message.to_string()));
        }
    }

    pub(crate) struct Fixture {
        pub(crate) device: Device,
        pub(crate) publisher: Arc<MemoryPublisher>,
        pub(crate) sink: Arc<RecordingSink>,
    }

    impl Fixture {
        pub(crate) fn new(config: DeviceConfig) -> Self {
            let publisher = Arc::new(MemoryPublisher::new());
            let sink = Arc::new(RecordingSink::default());
            let device = Device::new(
                DeviceId::new(),
                "New Device",
                config,
                publisher.clone(),
                sink.clone(),
            );
            Self {
                device,
                publisher,
                sink,
            }
        }

        pub(crate) fn model(model: Model, address: &str) -> Self {
            Self::new(DeviceConfig::new(model, address))
        }

        /// Returns the last published `(topic, payload)`.
        pub(crate) fn last_publish(&self) -> Option<(String, String)> {
            self.publisher.last().map(|m| (m.topic, m.payload))
        }

        /// Returns the last published payload parsed as JSON.
        pub(crate) fn last_json(&self) -> serde_json::Value {
            let (_, payload) = self.last_publish().expect("nothing published");
            serde_json::from_str(&payload).expect("payload is not JSON")
        }

        pub(crate) fn error_logs(&self) -> usize {
            self.sink
                .logs
                .lock()
                .iter()
                .filter(|(severity, _)| *severity == Severity::Error)
                .count()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Fixture;
    use super::*;
    use crate::Error;

    #[test]
    fn no_address_means_no_subscriptions() {
        let mut config = DeviceConfig::new(Model::Bulb, "x");
        config.address = None;
        let fx = Fixture::new(config);
        assert!(fx.device.subscriptions().is_empty());
    }

    #[test]
    fn address_change_applies_to_next_call() {
        let mut fx = Fixture::model(Model::Relay, "shellies/old");
        assert!(fx.device.subscriptions().contains(&"shellies/old/relay/0".to_string()));

        fx.device
            .set_config(DeviceConfig::new(Model::Relay, "shellies/new").with_channel(1));
        let topics = fx.device.subscriptions();
        assert!(topics.contains(&"shellies/new/relay/1".to_string()));
        assert!(!topics.iter().any(|t| t.starts_with("shellies/old")));
    }

    #[test]
    fn actions_without_address_are_ignored() {
        let mut config = DeviceConfig::new(Model::Relay, "x");
        config.address = Some(String::new());
        let mut fx = Fixture::new(config);
        assert!(fx.device.handle_action(&Action::TurnOn).is_ok());
        assert!(fx.publisher.is_empty());
        assert_eq!(fx.sink.logs.lock()[0].0, Severity::Warning);
    }

    #[test]
    fn unsupported_action_is_reported() {
        let mut fx = Fixture::model(Model::HumidityTemperature, "shellies/shelly-ht-test");
        let result = fx.device.handle_action(&Action::TurnOn);
        assert!(matches!(
            result,
            Err(Error::UnsupportedAction(ActionKind::TurnOn))
        ));

        fx.device.apply_action(Action::TurnOn);
        assert_eq!(fx.error_logs(), 1);
    }

    #[test]
    fn deliver_logs_parse_failures_once() {
        let mut fx = Fixture::model(Model::Relay, "shellies/shelly1-test");
        fx.device.deliver("shellies/shelly1-test/relay/0", "sideways");
        assert_eq!(fx.error_logs(), 1);
        assert_eq!(fx.device.state().power(), None);
    }

    #[test]
    fn unknown_topic_is_ignored() {
        let mut fx = Fixture::model(Model::Relay, "shellies/shelly1-test");
        let outcome = fx
            .device
            .handle_message("shellies/shelly1-test/something/else", "1")
            .unwrap();
        assert_eq!(outcome, Outcome::Unhandled);
        assert!(fx.sink.logs.lock().is_empty());
    }
}
