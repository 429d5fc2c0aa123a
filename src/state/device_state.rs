// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized device state.

use crate::types::{ContactState, Percent, PowerState, RgbColor, RollerState};

use super::StateChange;

/// Normalized state of one Shelly device instance.
///
/// Fields are optional because nothing is known until the device reports
/// it. In particular a `None` power state is indeterminate: it is neither
/// on nor off. The accumulated energy total starts at zero and is only
/// ever increased by energy reports or reset by an explicit action.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::state::{DeviceState, StateChange};
/// use shelly_mqtt::types::PowerState;
///
/// let mut state = DeviceState::new();
/// assert!(!state.is_on() && !state.is_off());
///
/// state.apply(&StateChange::Power(PowerState::On));
/// assert!(state.is_on());
/// ```
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DeviceState {
    power: Option<PowerState>,
    brightness: Option<Percent>,
    color: Option<RgbColor>,
    white_level: Option<u8>,
    white_temperature: Option<u16>,
    current_power: Option<f64>,
    accumulated_energy: f64,
    temperature: Option<f64>,
    internal_temperature: Option<f64>,
    humidity: Option<f64>,
    battery: Option<Percent>,
    lux: Option<f64>,
    online: bool,
    ip_address: Option<String>,
    mac_address: Option<String>,
    firmware: Option<String>,
    update_available: Option<bool>,
    input: Option<bool>,
    long_push: Option<bool>,
    overpower: bool,
    overload: bool,
    overtemperature: bool,
    load_error: bool,
    flood: Option<bool>,
    contact: Option<ContactState>,
    roller: Option<RollerState>,
    position: Option<Percent>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a change, returning `true` if the state actually changed.
    pub fn apply(&mut self, change: &StateChange) -> bool {
        match change {
            StateChange::Power(v) => replace(&mut self.power, Some(*v)),
            StateChange::Brightness(v) => replace(&mut self.brightness, Some(*v)),
            StateChange::Color(v) => replace(&mut self.color, Some(*v)),
            StateChange::WhiteLevel(v) => replace(&mut self.white_level, Some(*v)),
            StateChange::WhiteTemperature(v) => replace(&mut self.white_temperature, Some(*v)),
            StateChange::CurrentPower(m) => replace(&mut self.current_power, Some(m.value)),
            StateChange::AccumulatedEnergy(v) => replace(&mut self.accumulated_energy, *v),
            StateChange::Temperature(m) => replace(&mut self.temperature, Some(m.value)),
            StateChange::InternalTemperature(m) => {
                replace(&mut self.internal_temperature, Some(m.value))
            }
            StateChange::Humidity(m) => replace(&mut self.humidity, Some(m.value)),
            StateChange::Battery(v) => replace(&mut self.battery, Some(*v)),
            StateChange::Lux(m) => replace(&mut self.lux, Some(m.value)),
            StateChange::Online(v) => replace(&mut self.online, *v),
            StateChange::IpAddress(v) => replace(&mut self.ip_address, Some(v.clone())),
            StateChange::MacAddress(v) => replace(&mut self.mac_address, Some(v.clone())),
            StateChange::Firmware(v) => replace(&mut self.firmware, Some(v.clone())),
            StateChange::UpdateAvailable(v) => replace(&mut self.update_available, Some(*v)),
            StateChange::Input(v) => replace(&mut self.input, Some(*v)),
            StateChange::LongPush(v) => replace(&mut self.long_push, Some(*v)),
            StateChange::Overpower(v) => replace(&mut self.overpower, *v),
            StateChange::Overload(v) => replace(&mut self.overload, *v),
            StateChange::Overtemperature(v) => replace(&mut self.overtemperature, *v),
            StateChange::LoadError(v) => replace(&mut self.load_error, *v),
            StateChange::Flood(v) => replace(&mut self.flood, Some(*v)),
            StateChange::Contact(v) => replace(&mut self.contact, Some(*v)),
            StateChange::Roller(v) => replace(&mut self.roller, Some(*v)),
            StateChange::Position(v) => replace(&mut self.position, Some(*v)),
        }
    }

    // ========== Power ==========

    /// Gets the power state, `None` while indeterminate.
    #[must_use]
    pub fn power(&self) -> Option<PowerState> {
        self.power
    }

    /// Returns `true` only if the device is definitively on.
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.power == Some(PowerState::On)
    }

    /// Returns `true` only if the device is definitively off.
    #[must_use]
    pub fn is_off(&self) -> bool {
        self.power == Some(PowerState::Off)
    }

    // ========== Light ==========

    /// Gets the brightness level.
    #[must_use]
    pub fn brightness(&self) -> Option<Percent> {
        self.brightness
    }

    /// Gets the color channel levels.
    #[must_use]
    pub fn color(&self) -> Option<RgbColor> {
        self.color
    }

    /// Gets the white channel level.
    #[must_use]
    pub fn white_level(&self) -> Option<u8> {
        self.white_level
    }

    /// Gets the white color temperature in Kelvin.
    #[must_use]
    pub fn white_temperature(&self) -> Option<u16> {
        self.white_temperature
    }

    // ========== Energy ==========

    /// Gets the instantaneous power draw in Watts.
    #[must_use]
    pub fn current_power(&self) -> Option<f64> {
        self.current_power
    }

    /// Gets the accumulated energy in kWh.
    #[must_use]
    pub fn accumulated_energy(&self) -> f64 {
        self.accumulated_energy
    }

    // ========== Sensors ==========

    /// Gets the sensor temperature.
    #[must_use]
    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Gets the device internal temperature.
    #[must_use]
    pub fn internal_temperature(&self) -> Option<f64> {
        self.internal_temperature
    }

    /// Gets the relative humidity.
    #[must_use]
    pub fn humidity(&self) -> Option<f64> {
        self.humidity
    }

    /// Gets the battery charge.
    #[must_use]
    pub fn battery(&self) -> Option<Percent> {
        self.battery
    }

    /// Gets the illuminance in lux.
    #[must_use]
    pub fn lux(&self) -> Option<f64> {
        self.lux
    }

    /// Gets the flood flag.
    #[must_use]
    pub fn flood(&self) -> Option<bool> {
        self.flood
    }

    /// Gets the door/window contact state.
    #[must_use]
    pub fn contact(&self) -> Option<ContactState> {
        self.contact
    }

    // ========== Inputs ==========

    /// Gets the switch input state.
    #[must_use]
    pub fn input(&self) -> Option<bool> {
        self.input
    }

    /// Gets the long-push state.
    #[must_use]
    pub fn long_push(&self) -> Option<bool> {
        self.long_push
    }

    // ========== Roller ==========

    /// Gets the roller movement state.
    #[must_use]
    pub fn roller(&self) -> Option<RollerState> {
        self.roller
    }

    /// Gets the roller position.
    #[must_use]
    pub fn position(&self) -> Option<Percent> {
        self.position
    }

    // ========== Identity & liveness ==========

    /// Returns `true` if the device last reported itself online.
    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    /// Gets the best-known IP address.
    #[must_use]
    pub fn ip_address(&self) -> Option<&str> {
        self.ip_address.as_deref()
    }

    /// Gets the best-known MAC address.
    #[must_use]
    pub fn mac_address(&self) -> Option<&str> {
        self.mac_address.as_deref()
    }

    /// Gets the best-known firmware version.
    #[must_use]
    pub fn firmware(&self) -> Option<&str> {
        self.firmware.as_deref()
    }

    /// Gets the update-available flag.
    #[must_use]
    pub fn update_available(&self) -> Option<bool> {
        self.update_available
    }

    // ========== Fault flags ==========

    /// Returns `true` if the output was cut by overpower protection.
    #[must_use]
    pub fn overpower(&self) -> bool {
        self.overpower
    }

    /// Returns `true` if the device reported an overload.
    #[must_use]
    pub fn overload(&self) -> bool {
        self.overload
    }

    /// Returns `true` if the device reported overheating.
    #[must_use]
    pub fn overtemperature(&self) -> bool {
        self.overtemperature
    }

    /// Returns `true` if the dimmer reported a load error.
    #[must_use]
    pub fn load_error(&self) -> bool {
        self.load_error
    }
}

fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        false
    } else {
        *slot = value;
        true
    }
}
