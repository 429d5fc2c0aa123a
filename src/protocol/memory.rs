// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! In-memory publisher.

use parking_lot::Mutex;

use super::Publisher;

/// A message handed to a [`MemoryPublisher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedMessage {
    /// Topic the message was published on.
    pub topic: String,
    /// Message payload.
    pub payload: String,
}

/// Publisher that records every message instead of sending it.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::protocol::{MemoryPublisher, Publisher};
///
/// let publisher = MemoryPublisher::new();
/// publisher.publish("shellies/shelly1-test/relay/0/command", "on");
///
/// let last = publisher.last().unwrap();
/// assert_eq!(last.payload, "on");
/// assert_eq!(publisher.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MemoryPublisher {
    messages: Mutex<Vec<PublishedMessage>>,
    subscriptions: Mutex<Vec<String>>,
}

impl MemoryPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every recorded message, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<PublishedMessage> {
        self.messages.lock().clone()
    }

    /// Returns the most recent message.
    #[must_use]
    pub fn last(&self) -> Option<PublishedMessage> {
        self.messages.lock().last().cloned()
    }

    /// Returns the number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.lock().len()
    }

    /// Returns `true` if nothing was published.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.lock().is_empty()
    }

    /// Removes and returns every recorded message.
    pub fn take(&self) -> Vec<PublishedMessage> {
        std::mem::take(&mut *self.messages.lock())
    }

    /// Returns every topic passed to [`Publisher::subscribe`], in order.
    #[must_use]
    pub fn subscriptions(&self) -> Vec<String> {
        self.subscriptions.lock().clone()
    }
}

impl Publisher for MemoryPublisher {
    fn publish(&self, topic: &str, payload: &str) {
        self.messages.lock().push(PublishedMessage {
            topic: topic.to_string(),
            payload: payload.to_string(),
        });
    }

    fn subscribe(&self, topics: &[String]) {
        self.subscriptions.lock().extend_from_slice(topics);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_in_order() {
        let publisher = MemoryPublisher::new();
        assert!(publisher.is_empty());

        publisher.publish("a", "1");
        publisher.publish("b", "2");

        let messages = publisher.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].topic, "a");
        assert_eq!(messages[1].payload, "2");
    }

    #[test]
    fn take_drains() {
        let publisher = MemoryPublisher::new();
        publisher.publish("a", "1");

        assert_eq!(publisher.take().len(), 1);
        assert!(publisher.is_empty());
        assert!(publisher.last().is_none());
    }

    #[test]
    fn records_subscriptions() {
        let publisher = MemoryPublisher::new();
        publisher.subscribe(&["a/online".to_string()]);
        publisher.subscribe(&["b/online".to_string()]);
        assert_eq!(publisher.subscriptions(), vec!["a/online", "b/online"]);
        assert!(publisher.is_empty());
    }
}
