// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Channel on/off commands.

use crate::command::Command;
use crate::topic::Endpoint;
use crate::types::PowerState;

/// Command switching a channel on or off with a bare token.
///
/// Relays always switch this way. Lights use it when brightness should be
/// restored by the device instead of being sent with the command.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{Command, SwitchCommand};
/// use shelly_mqtt::topic::{Endpoint, WHITE};
/// use shelly_mqtt::types::PowerState;
///
/// let endpoint = Endpoint::new("shellies/shellyrgbw2-test", 2);
/// let off = SwitchCommand::new(WHITE, PowerState::Off);
///
/// assert_eq!(off.topic(&endpoint), "shellies/shellyrgbw2-test/white/2/command");
/// assert_eq!(off.payload(), "off");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwitchCommand {
    segment: &'static str,
    state: PowerState,
}

impl SwitchCommand {
    /// Creates a command for the channel under `segment`.
    #[must_use]
    pub const fn new(segment: &'static str, state: PowerState) -> Self {
        Self { segment, state }
    }

    /// Returns the requested state.
    #[must_use]
    pub const fn state(&self) -> PowerState {
        self.state
    }
}

impl Command for SwitchCommand {
    fn topic(&self, endpoint: &Endpoint) -> String {
        endpoint.channel_topic(self.segment, "command")
    }

    fn payload(&self) -> String {
        self.state.as_str().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::{LIGHT, RELAY};

    #[test]
    fn relay_on() {
        let endpoint = Endpoint::new("shellies/shelly1-test", 0);
        let cmd = SwitchCommand::new(RELAY, PowerState::On);
        assert_eq!(cmd.topic(&endpoint), "shellies/shelly1-test/relay/0/command");
        assert_eq!(cmd.payload(), "on");
        assert_eq!(cmd.state(), PowerState::On);
    }

    #[test]
    fn light_off_uses_channel() {
        let endpoint = Endpoint::new("shellies/shellydimmer-test", 1);
        let cmd = SwitchCommand::new(LIGHT, PowerState::Off);
        assert_eq!(cmd.topic(&endpoint), "shellies/shellydimmer-test/light/1/command");
        assert_eq!(cmd.payload(), "off");
    }
}
