// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State change representation.
//!
//! A [`StateChange`] is one normalized field update. Device adapters build
//! changes from inbound payloads or from optimistic command application,
//! apply them to the device's [`DeviceState`](super::DeviceState), and
//! forward them to the host through
//! [`StateSink::set_state`](crate::event::StateSink::set_state).
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::state::{DeviceState, StateChange};
//! use shelly_mqtt::types::{Percent, PowerState};
//!
//! let mut state = DeviceState::new();
//!
//! // Apply returns true if state actually changed
//! assert!(state.apply(&StateChange::Power(PowerState::On)));
//! assert!(!state.apply(&StateChange::Power(PowerState::On)));
//!
//! let dim = StateChange::Brightness(Percent::clamped(40));
//! assert_eq!(dim.field_name(), "brightness");
//! assert_eq!(dim.display().as_deref(), Some("40%"));
//! ```

use crate::normalize::{Measurement, format_energy};
use crate::types::{ContactState, Percent, PowerState, RgbColor, RollerState};

/// One normalized field update.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum StateChange {
    /// Channel power state.
    Power(PowerState),
    /// Light brightness (0-100).
    Brightness(Percent),
    /// Color channel levels (0-255 each).
    Color(RgbColor),
    /// White channel level.
    WhiteLevel(u8),
    /// White color temperature in Kelvin.
    WhiteTemperature(u16),
    /// Instantaneous power draw in Watts.
    CurrentPower(Measurement),
    /// Accumulated energy in kWh.
    AccumulatedEnergy(f64),
    /// Sensor temperature, unit-converted.
    Temperature(Measurement),
    /// Device internal temperature, unit-converted.
    InternalTemperature(Measurement),
    /// Relative humidity.
    Humidity(Measurement),
    /// Battery charge.
    Battery(Percent),
    /// Illuminance in lux.
    Lux(Measurement),
    /// Liveness flag.
    Online(bool),
    /// IP address from the announcement.
    IpAddress(String),
    /// MAC address from the announcement.
    MacAddress(String),
    /// Firmware version from the announcement.
    Firmware(String),
    /// Whether newer firmware is available.
    UpdateAvailable(bool),
    /// Switch input state.
    Input(bool),
    /// Long-push state of the switch input.
    LongPush(bool),
    /// Output switched off by overpower protection.
    Overpower(bool),
    /// Device reported an overload.
    Overload(bool),
    /// Device reported overheating.
    Overtemperature(bool),
    /// Dimmer reported a load error.
    LoadError(bool),
    /// Flood sensor detected water.
    Flood(bool),
    /// Door/window contact state.
    Contact(ContactState),
    /// Roller movement state.
    Roller(RollerState),
    /// Roller position (0 closed, 100 open).
    Position(Percent),
}

impl StateChange {
    /// Returns the normalized field this change updates.
    #[must_use]
    pub const fn field_name(&self) -> &'static str {
        match self {
            Self::Power(_) => "power",
            Self::Brightness(_) => "brightness",
            Self::Color(_) => "color",
            Self::WhiteLevel(_) => "white_level",
            Self::WhiteTemperature(_) => "white_temperature",
            Self::CurrentPower(_) => "current_power",
            Self::AccumulatedEnergy(_) => "accumulated_energy",
            Self::Temperature(_) => "temperature",
            Self::InternalTemperature(_) => "internal_temperature",
            Self::Humidity(_) => "humidity",
            Self::Battery(_) => "battery",
            Self::Lux(_) => "lux",
            Self::Online(_) => "online",
            Self::IpAddress(_) => "ip_address",
            Self::MacAddress(_) => "mac_address",
            Self::Firmware(_) => "firmware",
            Self::UpdateAvailable(_) => "update_available",
            Self::Input(_) => "input",
            Self::LongPush(_) => "long_push",
            Self::Overpower(_) => "overpower",
            Self::Overload(_) => "overload",
            Self::Overtemperature(_) => "overtemperature",
            Self::LoadError(_) => "load_error",
            Self::Flood(_) => "flood",
            Self::Contact(_) => "contact",
            Self::Roller(_) => "roller",
            Self::Position(_) => "position",
        }
    }

    /// Returns the display string for fields that carry a unit.
    #[must_use]
    pub fn display(&self) -> Option<String> {
        match self {
            Self::Brightness(level) | Self::Battery(level) | Self::Position(level) => {
                Some(level.to_string())
            }
            Self::WhiteTemperature(kelvin) => Some(format!("{kelvin} K")),
            Self::CurrentPower(m)
            | Self::Temperature(m)
            | Self::InternalTemperature(m)
            | Self::Humidity(m)
            | Self::Lux(m) => Some(m.display.clone()),
            Self::AccumulatedEnergy(kwh) => Some(format_energy(*kwh)),
            _ => None,
        }
    }

    /// Returns `true` if this change affects power or brightness.
    #[must_use]
    pub const fn is_power(&self) -> bool {
        matches!(self, Self::Power(_) | Self::Brightness(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_for_unit_fields() {
        assert_eq!(
            StateChange::CurrentPower(Measurement::new(101.123, "101.123 W"))
                .display()
                .as_deref(),
            Some("101.123 W")
        );
        assert_eq!(
            StateChange::AccumulatedEnergy(0.5).display().as_deref(),
            Some("0.5000 kWh")
        );
        assert_eq!(
            StateChange::WhiteTemperature(2700).display().as_deref(),
            Some("2700 K")
        );
        assert!(StateChange::Online(true).display().is_none());
    }

    #[test]
    fn field_names_are_distinct() {
        let changes = [
            StateChange::Power(PowerState::On),
            StateChange::Brightness(Percent::MAX),
            StateChange::Battery(Percent::MAX),
            StateChange::Position(Percent::MAX),
            StateChange::Overpower(true),
            StateChange::Overload(true),
        ];
        let mut names: Vec<_> = changes.iter().map(StateChange::field_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), changes.len());
    }

    #[test]
    fn is_power() {
        assert!(StateChange::Power(PowerState::Off).is_power());
        assert!(StateChange::Brightness(Percent::MIN).is_power());
        assert!(!StateChange::Online(true).is_power());
    }
}
