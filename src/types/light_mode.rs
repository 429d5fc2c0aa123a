// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Light channel operating mode.

use std::fmt;
use std::str::FromStr;

use crate::error::ParseError;

/// Operating mode of a light channel.
///
/// RGBW2 controllers and bulbs switch between driving white LEDs and
/// driving color channels. Status payloads carry the active mode as
/// `"white"` or `"color"`.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::LightMode;
///
/// assert_eq!("white".parse::<LightMode>().unwrap(), LightMode::White);
/// assert_eq!(LightMode::Color.as_str(), "color");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightMode {
    /// White channel(s) only.
    White,
    /// RGB color channels with gain.
    Color,
}

impl LightMode {
    /// Returns the wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Color => "color",
        }
    }
}

impl fmt::Display for LightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LightMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(Self::White),
            "color" => Ok(Self::Color),
            _ => Err(ParseError::InvalidToken {
                expected: "white or color",
                payload: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_mode_round_trip_tokens() {
        assert_eq!("color".parse::<LightMode>().unwrap(), LightMode::Color);
        assert_eq!(LightMode::White.to_string(), "white");
    }

    #[test]
    fn light_mode_rejects_unknown() {
        assert!("White".parse::<LightMode>().is_err());
        assert!("".parse::<LightMode>().is_err());
    }
}
