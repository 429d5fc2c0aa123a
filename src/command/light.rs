// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Combined light `set` commands.
//!
//! Each struct serializes to exactly the JSON object its channel type
//! accepts on `<address>/<segment>/<n>/set`.

use serde::Serialize;

use crate::command::{Command, to_json};
use crate::topic::{COLOR, Endpoint, LIGHT};
use crate::types::{LightMode, Percent, PowerState, RgbColor};

/// `{"turn", "brightness"}` payload for dimmers, Duo and RGBW2 white
/// channels.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{BrightnessSet, Command};
/// use shelly_mqtt::topic::{Endpoint, LIGHT};
/// use shelly_mqtt::types::{Percent, PowerState};
///
/// let endpoint = Endpoint::new("shellies/shellydimmer-test", 0);
/// let cmd = BrightnessSet::new(LIGHT, PowerState::On, Percent::clamped(50));
///
/// assert_eq!(cmd.topic(&endpoint), "shellies/shellydimmer-test/light/0/set");
/// assert_eq!(cmd.payload(), r#"{"turn":"on","brightness":50}"#);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BrightnessSet {
    #[serde(skip)]
    segment: &'static str,
    turn: PowerState,
    brightness: u8,
}

impl BrightnessSet {
    /// Creates a set command for the channel under `segment`.
    #[must_use]
    pub const fn new(segment: &'static str, turn: PowerState, brightness: Percent) -> Self {
        Self {
            segment,
            turn,
            brightness: brightness.value(),
        }
    }
}

impl Command for BrightnessSet {
    fn topic(&self, endpoint: &Endpoint) -> String {
        endpoint.channel_topic(self.segment, "set")
    }

    fn payload(&self) -> String {
        to_json(self)
    }
}

/// Color bulb payload. The bulb channel is always driven in color mode.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{BulbSet, Command};
/// use shelly_mqtt::types::{Percent, PowerState, RgbColor};
///
/// let cmd = BulbSet::new(PowerState::On, RgbColor::new(0, 0, 0), 100, Percent::MAX);
/// assert_eq!(
///     cmd.payload(),
///     r#"{"turn":"on","mode":"color","white":100,"red":0,"green":0,"blue":0,"gain":100}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BulbSet {
    turn: PowerState,
    mode: LightMode,
    white: u8,
    red: u8,
    green: u8,
    blue: u8,
    gain: u8,
}

impl BulbSet {
    /// Creates a bulb set command.
    #[must_use]
    pub const fn new(turn: PowerState, color: RgbColor, white: u8, gain: Percent) -> Self {
        Self {
            turn,
            mode: LightMode::Color,
            white,
            red: color.red(),
            green: color.green(),
            blue: color.blue(),
            gain: gain.value(),
        }
    }
}

impl Command for BulbSet {
    fn topic(&self, endpoint: &Endpoint) -> String {
        endpoint.channel_topic(LIGHT, "set")
    }

    fn payload(&self) -> String {
        to_json(self)
    }
}

/// RGBW2 color channel payload.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::command::{ColorSet, Command};
/// use shelly_mqtt::topic::Endpoint;
/// use shelly_mqtt::types::{Percent, PowerState, RgbColor};
///
/// let endpoint = Endpoint::new("shellies/shellyrgbw2-test", 0);
/// let cmd = ColorSet::new(PowerState::Off, RgbColor::new(255, 0, 10), 0, Percent::MIN);
///
/// assert_eq!(cmd.topic(&endpoint), "shellies/shellyrgbw2-test/color/0/set");
/// assert_eq!(
///     cmd.payload(),
///     r#"{"turn":"off","red":255,"green":0,"blue":10,"white":0,"gain":0}"#
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorSet {
    turn: PowerState,
    red: u8,
    green: u8,
    blue: u8,
    white: u8,
    gain: u8,
}

impl ColorSet {
    /// Creates a color channel set command.
    #[must_use]
    pub const fn new(turn: PowerState, color: RgbColor, white: u8, gain: Percent) -> Self {
        Self {
            turn,
            red: color.red(),
            green: color.green(),
            blue: color.blue(),
            white,
            gain: gain.value(),
        }
    }
}

impl Command for ColorSet {
    fn topic(&self, endpoint: &Endpoint) -> String {
        endpoint.channel_topic(COLOR, "set")
    }

    fn payload(&self) -> String {
        to_json(self)
    }
}
