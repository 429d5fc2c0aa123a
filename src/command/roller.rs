// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roller shutter commands.

use crate::command::Command;
use crate::topic::{Endpoint, ROLLER};
use crate::types::Percent;

/// Command moving a roller shutter.
///
/// Rollers have no combined `set` topic; every field goes out on its own.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{Command, RollerCommand};
/// use shelly_mqtt::topic::Endpoint;
/// use shelly_mqtt::types::Percent;
///
/// let endpoint = Endpoint::new("shellies/shellyswitch25-test", 0);
///
/// assert_eq!(RollerCommand::Open.payload(), "open");
/// let pos = RollerCommand::Position(Percent::clamped(40));
/// assert_eq!(pos.topic(&endpoint), "shellies/shellyswitch25-test/roller/0/command/pos");
/// assert_eq!(pos.payload(), "40");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollerCommand {
    /// Open fully.
    Open,
    /// Close fully.
    Close,
    /// Stop moving.
    Stop,
    /// Move to a position, 0 closed to 100 open.
    Position(Percent),
}

impl Command for RollerCommand {
    fn topic(&self, endpoint: &Endpoint) -> String {
        match self {
            Self::Open | Self::Close | Self::Stop => endpoint.channel_topic(ROLLER, "command"),
            Self::Position(_) => endpoint.channel_topic(ROLLER, "command/pos"),
        }
    }

    fn payload(&self) -> String {
        match self {
            Self::Open => "open".to_string(),
            Self::Close => "close".to_string(),
            Self::Stop => "stop".to_string(),
            Self::Position(pos) => pos.value().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roller_commands() {
        let endpoint = Endpoint::new("shellies/roller", 1);
        assert_eq!(
            RollerCommand::Close.topic(&endpoint),
            "shellies/roller/roller/1/command"
        );
        assert_eq!(RollerCommand::Close.payload(), "close");
        assert_eq!(RollerCommand::Stop.payload(), "stop");
        assert_eq!(RollerCommand::Position(Percent::MAX).payload(), "100");
    }
}
