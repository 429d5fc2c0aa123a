// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shelly topic construction.
//!
//! Every Shelly Gen1 device publishes under a base address such as
//! `shellies/shelly1pm-ABC123`. Topics for one device are built from that
//! address and the device's channel index:
//!
//! ```text
//! shellies/announce                          (shared discovery beacon)
//! <address>/online                           (liveness)
//! <address>/relay/<channel>                  (channel state)
//! <address>/relay/<channel>/power            (channel telemetry)
//! <address>/relay/<channel>/command          (channel command)
//! <address>/input/<channel>                  (indexed input)
//! <address>/sensor/temperature               (device-level value)
//! ```
//!
//! Inbound topics are matched by exact string comparison against topics
//! built this way; no wildcards are involved.

/// Topic on which every device publishes its discovery announcement.
pub const ANNOUNCE_TOPIC: &str = "shellies/announce";

/// Channel segment used by relays.
pub const RELAY: &str = "relay";

/// Channel segment used by dimmers, bulbs and the Duo.
pub const LIGHT: &str = "light";

/// Channel segment used by RGBW2 controllers in color mode.
pub const COLOR: &str = "color";

/// Channel segment used by RGBW2 controllers in white mode.
pub const WHITE: &str = "white";

/// Channel segment used by roller shutters.
pub const ROLLER: &str = "roller";

/// A device's base address paired with its channel index.
///
/// Built fresh from the device configuration on every dispatch, so a
/// changed address or channel takes effect on the next call.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::topic::Endpoint;
///
/// let endpoint = Endpoint::new("shellies/shelly1-test", 0);
/// assert_eq!(endpoint.online(), "shellies/shelly1-test/online");
/// assert_eq!(endpoint.channel("relay"), "shellies/shelly1-test/relay/0");
/// assert_eq!(endpoint.channel_topic("relay", "command"), "shellies/shelly1-test/relay/0/command");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    address: String,
    channel: u32,
}

impl Endpoint {
    /// Creates an endpoint for the given address and channel.
    #[must_use]
    pub fn new(address: impl Into<String>, channel: u32) -> Self {
        Self {
            address: address.into(),
            channel,
        }
    }

    /// Returns the base address.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Returns the channel index.
    #[must_use]
    pub const fn channel_index(&self) -> u32 {
        self.channel
    }

    /// Returns the device identifier part of the address.
    ///
    /// This is the last path segment, which is what the device puts in the
    /// `id` field of its announcement.
    #[must_use]
    pub fn device_id(&self) -> &str {
        self.address
            .rsplit('/')
            .next()
            .unwrap_or(self.address.as_str())
    }

    /// `<address>/<suffix>`
    #[must_use]
    pub fn device(&self, suffix: &str) -> String {
        format!("{}/{suffix}", self.address)
    }

    /// `<address>/online`
    #[must_use]
    pub fn online(&self) -> String {
        self.device("online")
    }

    /// `<address>/command`
    #[must_use]
    pub fn command(&self) -> String {
        self.device("command")
    }

    /// `<address>/<segment>/<channel>`
    #[must_use]
    pub fn channel(&self, segment: &str) -> String {
        format!("{}/{segment}/{}", self.address, self.channel)
    }

    /// `<address>/<segment>/<channel>/<suffix>`
    #[must_use]
    pub fn channel_topic(&self, segment: &str, suffix: &str) -> String {
        format!("{}/{segment}/{}/{suffix}", self.address, self.channel)
    }

    /// `<address>/sensor/<name>`
    #[must_use]
    pub fn sensor(&self, name: &str) -> String {
        format!("{}/sensor/{name}", self.address)
    }
}

/// Ordered, duplicate-free set of topics a device subscribes to.
///
/// Every set starts with the announcement topic and the device's liveness
/// topic; variants append their own topics in precedence order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicSet {
    topics: Vec<String>,
}

impl TopicSet {
    /// Creates the base set for an endpoint.
    #[must_use]
    pub fn for_endpoint(endpoint: &Endpoint) -> Self {
        let mut set = Self::default();
        set.push(ANNOUNCE_TOPIC);
        set.push(endpoint.online());
        set
    }

    /// Appends a topic unless it is already present.
    pub fn push(&mut self, topic: impl Into<String>) {
        let topic = topic.into();
        if !self.topics.contains(&topic) {
            self.topics.push(topic);
        }
    }

    /// Returns `true` if the set contains the topic.
    #[must_use]
    pub fn contains(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t == topic)
    }

    /// Returns the topics in subscription order.
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.topics
    }

    /// Consumes the set, returning the topics in order.
    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.topics
    }
}
