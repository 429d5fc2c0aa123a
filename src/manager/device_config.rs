// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Persisted per-device configuration.

use serde::{Deserialize, Deserializer, Serialize};

use crate::device::Model;
use crate::error::{ConfigError, ValidationErrors};
use crate::normalize::{TemperatureUnits, parse_decimals, parse_offset};
use crate::topic::Endpoint;

const DEFAULT_TEMPERATURE_DECIMALS: u32 = 1;
const DEFAULT_HUMIDITY_DECIMALS: u32 = 0;

/// Configuration for one Shelly device instance.
///
/// This mirrors the host controller's persisted property map, so keys are
/// kebab-case and numeric options are kept as the strings the user typed.
/// They are parsed when a message needs them: a bad `temp-offset` only fails
/// temperature updates, never anything else.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::device::Model;
/// use shelly_mqtt::manager::DeviceConfig;
///
/// let config: DeviceConfig = serde_json::from_str(r#"{
///     "model": "shelly-ht",
///     "address": "shellies/shelly-ht-test",
///     "broker-id": "12345",
///     "message-type": "shellies",
///     "announce-message-type-same-as-message-type": true,
///     "temp-units": "C->F",
///     "temp-offset": "2",
///     "temp-decimals": "1"
/// }"#).unwrap();
///
/// assert_eq!(config.model, Model::HumidityTemperature);
/// assert!(config.validate().is_ok());
/// assert!((config.temperature_offset().unwrap() - 2.0).abs() < f64::EPSILON);
///
/// // Built in code
/// let relay = DeviceConfig::new(Model::Relay, "shellies/shelly1-test")
///     .with_channel(1)
///     .with_broker("12345", "shellies");
/// assert_eq!(relay.endpoint().unwrap().channel_index(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DeviceConfig {
    /// Device model, selecting the adapter variant.
    pub model: Model,
    /// Base topic address; blank or absent leaves the device inert.
    pub address: Option<String>,
    /// Channel index on multi-channel devices.
    ///
    /// Accepted as a number or as the string the host stored.
    #[serde(deserialize_with = "deserialize_channel")]
    pub channel: u32,
    /// Host identifier of the broker this device is reached through.
    pub broker_id: Option<String>,
    /// Message type the host files this device's messages under.
    pub message_type: Option<String>,
    /// Whether announcements use the same message type.
    pub announce_message_type_same_as_message_type: bool,
    /// Message type for announcements when it differs.
    pub announce_message_type: Option<String>,
    /// Sensor temperature conversion (`C`, `F`, `C->F`, `F->C`).
    pub temp_units: Option<String>,
    /// Offset added to converted sensor temperatures.
    pub temp_offset: Option<String>,
    /// Decimal places kept on sensor temperatures.
    pub temp_decimals: Option<String>,
    /// Offset added to humidity readings.
    pub humidity_offset: Option<String>,
    /// Decimal places kept on humidity readings.
    pub humidity_decimals: Option<String>,
    /// Internal (device) temperature conversion.
    pub int_temp_units: Option<String>,
    /// Let lights restore their own brightness when switched on.
    pub restore_brightness: bool,
}

impl DeviceConfig {
    /// Creates a configuration for a model at an address.
    #[must_use]
    pub fn new(model: Model, address: impl Into<String>) -> Self {
        Self {
            model,
            address: Some(address.into()),
            ..Self::default()
        }
    }

    /// Sets the channel index.
    #[must_use]
    pub fn with_channel(mut self, channel: u32) -> Self {
        self.channel = channel;
        self
    }

    /// Sets the broker and message type, with announcements sharing it.
    #[must_use]
    pub fn with_broker(mut self, broker_id: impl Into<String>, message_type: impl Into<String>) -> Self {
        self.broker_id = Some(broker_id.into());
        self.message_type = Some(message_type.into());
        self.announce_message_type_same_as_message_type = true;
        self
    }

    /// Sets the sensor temperature conversion, offset and precision.
    #[must_use]
    pub fn with_temperature(
        mut self,
        units: impl Into<String>,
        offset: impl Into<String>,
        decimals: impl Into<String>,
    ) -> Self {
        self.temp_units = Some(units.into());
        self.temp_offset = Some(offset.into());
        self.temp_decimals = Some(decimals.into());
        self
    }

    /// Sets the humidity offset and precision.
    #[must_use]
    pub fn with_humidity(mut self, offset: impl Into<String>, decimals: impl Into<String>) -> Self {
        self.humidity_offset = Some(offset.into());
        self.humidity_decimals = Some(decimals.into());
        self
    }

    /// Sets the internal temperature conversion.
    #[must_use]
    pub fn with_internal_temperature_units(mut self, units: impl Into<String>) -> Self {
        self.int_temp_units = Some(units.into());
        self
    }

    /// Sets whether lights restore their own brightness.
    #[must_use]
    pub fn with_restore_brightness(mut self, restore: bool) -> Self {
        self.restore_brightness = restore;
        self
    }

    /// Returns the trimmed address, or `None` if unset or blank.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref().map(str::trim).filter(|a| !a.is_empty())
    }

    /// Returns the topic endpoint, or `None` for an unconfigured device.
    #[must_use]
    pub fn endpoint(&self) -> Option<Endpoint> {
        self.address().map(|address| Endpoint::new(address, self.channel))
    }

    /// Returns the sensor temperature conversion.
    ///
    /// # Errors
    ///
    /// Returns error if `temp-units` is not a known mode.
    pub fn temperature_units(&self) -> Result<TemperatureUnits, ConfigError> {
        self.temp_units.as_deref().unwrap_or_default().parse()
    }

    /// Returns the sensor temperature offset, 0 when unset.
    ///
    /// # Errors
    ///
    /// Returns error if `temp-offset` is not a number.
    pub fn temperature_offset(&self) -> Result<f64, ConfigError> {
        parse_offset("temp-offset", self.temp_offset.as_deref())
    }

    /// Returns the sensor temperature precision, 1 when unset.
    ///
    /// # Errors
    ///
    /// Returns error if `temp-decimals` is not a non-negative integer.
    pub fn temperature_decimals(&self) -> Result<u32, ConfigError> {
        parse_decimals(
            "temp-decimals",
            self.temp_decimals.as_deref(),
            DEFAULT_TEMPERATURE_DECIMALS,
        )
    }

    /// Returns the humidity offset, 0 when unset.
    ///
    /// # Errors
    ///
    /// Returns error if `humidity-offset` is not a number.
    pub fn humidity_offset(&self) -> Result<f64, ConfigError> {
        parse_offset("humidity-offset", self.humidity_offset.as_deref())
    }

    /// Returns the humidity precision, 0 when unset.
    ///
    /// # Errors
    ///
    /// Returns error if `humidity-decimals` is not a non-negative integer.
    pub fn humidity_decimals(&self) -> Result<u32, ConfigError> {
        parse_decimals(
            "humidity-decimals",
            self.humidity_decimals.as_deref(),
            DEFAULT_HUMIDITY_DECIMALS,
        )
    }

    /// Returns the internal temperature conversion.
    ///
    /// # Errors
    ///
    /// Returns error if `int-temp-units` is not a known mode.
    pub fn internal_temperature_units(&self) -> Result<TemperatureUnits, ConfigError> {
        self.int_temp_units.as_deref().unwrap_or_default().parse()
    }

    /// Validates the configuration as a whole.
    ///
    /// Checks required connection fields and that every numeric option the
    /// device will read is usable.
    ///
    /// # Errors
    ///
    /// Returns every failing field, keyed by its persisted name.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if is_blank(self.broker_id.as_deref()) {
            errors.insert("broker-id", "You must select the broker for the device to use");
        }
        if self.address().is_none() {
            errors.insert("address", "You must enter the MQTT topic root for the device");
        }
        if is_blank(self.message_type.as_deref()) {
            errors.insert("message-type", "You must specify the message type");
        }
        if !self.announce_message_type_same_as_message_type
            && is_blank(self.announce_message_type.as_deref())
        {
            errors.insert(
                "announce-message-type",
                "You must specify the announce message type",
            );
        }

        let option_checks = [
            ("temp-units", self.temperature_units().err()),
            ("temp-offset", self.temperature_offset().err()),
            ("temp-decimals", self.temperature_decimals().err()),
            ("humidity-offset", self.humidity_offset().err()),
            ("humidity-decimals", self.humidity_decimals().err()),
            ("int-temp-units", self.internal_temperature_units().err()),
        ];
        for (field, error) in option_checks {
            if let Some(error) = error {
                errors.insert(field, error.to_string());
            }
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn deserialize_channel<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Channel {
        Number(u32),
        Text(String),
    }

    match Channel::deserialize(deserializer)? {
        Channel::Number(channel) => Ok(channel),
        Channel::Text(text) if text.trim().is_empty() => Ok(0),
        Channel::Text(text) => text.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!("channel must be a non-negative integer, got {text:?}"))
        }),
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
