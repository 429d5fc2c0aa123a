// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door/window contact and roller movement states.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// State reported on a door/window sensor's `sensor/state` topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactState {
    /// The contact is open.
    Open,
    /// The contact is closed.
    Closed,
}

impl ContactState {
    /// Returns the display representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

impl fmt::Display for ContactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContactState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "close" | "closed" => Ok(Self::Closed),
            _ => Err(ParseError::InvalidToken {
                expected: "open or close",
                payload: s.to_string(),
            }),
        }
    }
}

/// Movement state reported on a roller's `roller/<n>` topic.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::RollerState;
///
/// assert_eq!("stop".parse::<RollerState>().unwrap(), RollerState::Stop);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollerState {
    /// Opening, or stopped after opening.
    Open,
    /// Closing, or stopped after closing.
    Close,
    /// Stopped mid-travel.
    Stop,
}

impl RollerState {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Close => "close",
            Self::Stop => "stop",
        }
    }
}

impl fmt::Display for RollerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollerState {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "open" => Ok(Self::Open),
            "close" => Ok(Self::Close),
            "stop" => Ok(Self::Stop),
            _ => Err(ParseError::InvalidToken {
                expected: "open, close or stop",
                payload: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_state_accepts_close_and_closed() {
        assert_eq!("close".parse::<ContactState>().unwrap(), ContactState::Closed);
        assert_eq!("closed".parse::<ContactState>().unwrap(), ContactState::Closed);
        assert_eq!("open".parse::<ContactState>().unwrap(), ContactState::Open);
        assert!("ajar".parse::<ContactState>().is_err());
    }

    #[test]
    fn roller_state_tokens() {
        assert_eq!("open".parse::<RollerState>().unwrap(), RollerState::Open);
        assert_eq!("close".parse::<RollerState>().unwrap(), RollerState::Close);
        assert_eq!(RollerState::Stop.to_string(), "stop");
        assert!("up".parse::<RollerState>().is_err());
    }
}
