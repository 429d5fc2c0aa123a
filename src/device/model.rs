// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Supported Shelly models.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::Variant;
use super::light::{Bulb, Dimmer, Duo, RgbwColor, RgbwWhite};
use super::relay::{MeteredRelay, Relay};
use super::roller::Roller;
use super::sensor::{DoorWindow, Flood, HumidityTemperature};
use crate::error::ConfigError;

/// A Shelly model, identified by its persisted model id.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Model {
    /// Shelly 1 relay.
    #[default]
    #[serde(rename = "shelly-1")]
    Relay,
    /// Shelly 1PM relay with power metering.
    #[serde(rename = "shelly-1pm")]
    MeteredRelay,
    /// Shelly Dimmer.
    #[serde(rename = "shelly-dimmer")]
    Dimmer,
    /// Shelly Bulb, driven in color mode.
    #[serde(rename = "shelly-bulb")]
    Bulb,
    /// Shelly RGBW2 in color mode.
    #[serde(rename = "shelly-rgbw2-color")]
    RgbwColor,
    /// One white channel of a Shelly RGBW2.
    #[serde(rename = "shelly-rgbw2-white")]
    RgbwWhite,
    /// Shelly Duo tunable white bulb.
    #[serde(rename = "shelly-duo")]
    Duo,
    /// Shelly H&T humidity and temperature sensor.
    #[serde(rename = "shelly-ht")]
    HumidityTemperature,
    /// Shelly Flood sensor.
    #[serde(rename = "shelly-flood")]
    Flood,
    /// Shelly Door/Window sensor.
    #[serde(rename = "shelly-door-window")]
    DoorWindow,
    /// Shelly 2.5 in roller shutter mode.
    #[serde(rename = "shelly-roller")]
    Roller,
}

impl Model {
    /// Every supported model.
    pub const ALL: [Self; 11] = [
        Self::Relay,
        Self::MeteredRelay,
        Self::Dimmer,
        Self::Bulb,
        Self::RgbwColor,
        Self::RgbwWhite,
        Self::Duo,
        Self::HumidityTemperature,
        Self::Flood,
        Self::DoorWindow,
        Self::Roller,
    ];

    /// Returns the persisted model id.
    #[must_use]
    pub const fn id(&self) -> &'static str {
        match self {
            Self::Relay => "shelly-1",
            Self::MeteredRelay => "shelly-1pm",
            Self::Dimmer => "shelly-dimmer",
            Self::Bulb => "shelly-bulb",
            Self::RgbwColor => "shelly-rgbw2-color",
            Self::RgbwWhite => "shelly-rgbw2-white",
            Self::Duo => "shelly-duo",
            Self::HumidityTemperature => "shelly-ht",
            Self::Flood => "shelly-flood",
            Self::DoorWindow => "shelly-door-window",
            Self::Roller => "shelly-roller",
        }
    }

    /// Returns `true` for battery-powered sensors.
    #[must_use]
    pub const fn is_sensor(&self) -> bool {
        matches!(
            self,
            Self::HumidityTemperature | Self::Flood | Self::DoorWindow
        )
    }

    pub(crate) fn variant(self) -> &'static dyn Variant {
        match self {
            Self::Relay => &Relay::SWITCH,
            Self::MeteredRelay => &MeteredRelay::SWITCH,
            Self::Dimmer => &Dimmer,
            Self::Bulb => &Bulb,
            Self::RgbwColor => &RgbwColor,
            Self::RgbwWhite => &RgbwWhite,
            Self::Duo => &Duo,
            Self::HumidityTemperature => &HumidityTemperature,
            Self::Flood => &Flood,
            Self::DoorWindow => &DoorWindow,
            Self::Roller => &Roller,
        }
    }
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Model {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|model| model.id() == s)
            .ok_or_else(|| ConfigError::UnknownModel(s.to_string()))
    }
}
