// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit and value normalization.
//!
//! Pure functions turning raw sensor readings into the values stored in
//! [`DeviceState`](crate::state::DeviceState): temperature unit conversion,
//! offset and precision handling, and energy accumulation.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::normalize::{convert_temperature, TemperatureUnits};
//!
//! let reading = convert_temperature(43.0, TemperatureUnits::CelsiusToFahrenheit, 2.0, 1);
//! assert!((reading.value - 111.4).abs() < 1e-9);
//! assert_eq!(reading.display, "111.4 °F");
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Number of watt-minutes in one kilowatt-hour.
pub const WATT_MINUTES_PER_KWH: f64 = 60_000.0;

/// Upper bound on configured decimal places.
const MAX_DECIMALS: u32 = 10;

/// Temperature unit handling configured per device.
///
/// The persisted option values are `C`, `F`, `C->F` and `F->C`. The first
/// two leave the reading untouched and only pick the display symbol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TemperatureUnits {
    /// Reading is Celsius, displayed as Celsius.
    #[default]
    Celsius,
    /// Reading is Fahrenheit, displayed as Fahrenheit.
    Fahrenheit,
    /// Reading is Celsius, converted to Fahrenheit.
    CelsiusToFahrenheit,
    /// Reading is Fahrenheit, converted to Celsius.
    FahrenheitToCelsius,
}

impl TemperatureUnits {
    /// Converts a raw reading into the target unit.
    #[must_use]
    pub fn convert(self, raw: f64) -> f64 {
        match self {
            Self::Celsius | Self::Fahrenheit => raw,
            Self::CelsiusToFahrenheit => raw * 9.0 / 5.0 + 32.0,
            Self::FahrenheitToCelsius => (raw - 32.0) * 5.0 / 9.0,
        }
    }

    /// Returns the display symbol of the target unit.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Celsius | Self::FahrenheitToCelsius => "°C",
            Self::Fahrenheit | Self::CelsiusToFahrenheit => "°F",
        }
    }

    /// Returns the persisted option value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Celsius => "C",
            Self::Fahrenheit => "F",
            Self::CelsiusToFahrenheit => "C->F",
            Self::FahrenheitToCelsius => "F->C",
        }
    }
}

impl fmt::Display for TemperatureUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemperatureUnits {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "C" => Ok(Self::Celsius),
            "F" => Ok(Self::Fahrenheit),
            "C->F" => Ok(Self::CelsiusToFahrenheit),
            "F->C" => Ok(Self::FahrenheitToCelsius),
            other => Err(ConfigError::UnknownUnits(other.to_string())),
        }
    }
}

/// A normalized reading together with its display string.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Measurement {
    /// The normalized value.
    pub value: f64,
    /// Human-readable value with its unit, e.g. `111.4 °F`.
    pub display: String,
}

impl Measurement {
    /// Creates a measurement from a value and display string.
    #[must_use]
    pub fn new(value: f64, display: impl Into<String>) -> Self {
        Self {
            value,
            display: display.into(),
        }
    }
}

/// Converts a temperature reading.
///
/// The unit conversion runs first, then the offset is added, then the
/// result is rounded to `decimals` places.
#[must_use]
pub fn convert_temperature(
    raw: f64,
    units: TemperatureUnits,
    offset: f64,
    decimals: u32,
) -> Measurement {
    let value = round_to(units.convert(raw) + offset, decimals);
    let precision = decimals.min(MAX_DECIMALS) as usize;
    Measurement::new(value, format!("{value:.precision$} {}", units.symbol()))
}

/// Applies an offset and precision to a relative humidity reading.
#[must_use]
pub fn convert_humidity(raw: f64, offset: f64, decimals: u32) -> Measurement {
    let value = round_to(raw + offset, decimals);
    let precision = decimals.min(MAX_DECIMALS) as usize;
    Measurement::new(value, format!("{value:.precision$}%"))
}

/// Rounds a value to the given number of decimal places.
#[must_use]
pub fn round_to(value: f64, decimals: u32) -> f64 {
    // Safe: capped at MAX_DECIMALS
    #[allow(clippy::cast_possible_wrap)]
    let factor = 10f64.powi(decimals.min(MAX_DECIMALS) as i32);
    (value * factor).round() / factor
}

/// Adds a watt-minute increment to a running kWh total.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::normalize::accumulate_energy;
///
/// let total = accumulate_energy(0.0, 60_000.0);
/// assert!((total - 1.0).abs() < f64::EPSILON);
/// ```
#[must_use]
pub fn accumulate_energy(current_total: f64, increment_watt_minutes: f64) -> f64 {
    current_total + increment_watt_minutes / WATT_MINUTES_PER_KWH
}

/// Formats an energy total for display.
#[must_use]
pub fn format_energy(kwh: f64) -> String {
    format!("{kwh:.4} kWh")
}

/// Parses a numeric offset option. Absent or blank means zero.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] when the value is not a number.
pub fn parse_offset(option: &'static str, value: Option<&str>) -> Result<f64, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(0.0),
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ConfigError::InvalidNumber {
                option,
                value: raw.to_string(),
            }),
    }
}

/// Parses a decimal-places option. Absent or blank means `default`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidNumber`] when the value is not a
/// non-negative integer.
pub fn parse_decimals(
    option: &'static str,
    value: Option<&str>,
    default: u32,
) -> Result<u32, ConfigError> {
    match value.map(str::trim) {
        None | Some("") => Ok(default),
        Some(raw) => raw.parse::<u32>().map_err(|_| ConfigError::InvalidNumber {
            option,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn celsius_to_fahrenheit_with_offset_and_decimals() {
        let m = convert_temperature(43.0, TemperatureUnits::CelsiusToFahrenheit, 2.0, 1);
        assert!(approx(m.value, 111.4));
        assert_eq!(m.display, "111.4 °F");
    }

    #[test]
    fn fahrenheit_to_celsius() {
        let m = convert_temperature(212.0, TemperatureUnits::FahrenheitToCelsius, 0.0, 0);
        assert!(approx(m.value, 100.0));
        assert_eq!(m.display, "100 °C");
    }

    #[test]
    fn no_conversion_keeps_reading() {
        let m = convert_temperature(21.456, TemperatureUnits::Celsius, 0.0, 2);
        assert!(approx(m.value, 21.46));
        assert_eq!(m.display, "21.46 °C");

        let f = convert_temperature(70.0, TemperatureUnits::Fahrenheit, -1.5, 1);
        assert_eq!(f.display, "68.5 °F");
    }

    #[test]
    fn rounding_is_applied_after_offset() {
        // 20.04 + 0.02 = 20.06 -> 20.1 with one decimal
        let m = convert_temperature(20.04, TemperatureUnits::Celsius, 0.02, 1);
        assert!(approx(m.value, 20.1));
    }

    #[test]
    fn humidity_offset() {
        let m = convert_humidity(60.0, 4.0, 0);
        assert!(approx(m.value, 64.0));
        assert_eq!(m.display, "64%");
    }

    #[test]
    fn units_from_str() {
        assert_eq!("C->F".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::CelsiusToFahrenheit);
        assert_eq!("F".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::Fahrenheit);
        assert_eq!("".parse::<TemperatureUnits>().unwrap(), TemperatureUnits::Celsius);
        assert!("K".parse::<TemperatureUnits>().is_err());
    }

    #[test]
    fn energy_accumulation_is_additive() {
        let stepwise = accumulate_energy(accumulate_energy(1.25, 30.0), 45.0);
        let combined = accumulate_energy(1.25, 75.0);
        assert!((stepwise - combined).abs() < 1e-12);
        assert!(approx(accumulate_energy(0.0, 50.0), 50.0 / 60_000.0));
    }

    #[test]
    fn energy_display() {
        assert_eq!(format_energy(0.000_833), "0.0008 kWh");
    }

    #[test]
    fn parse_offset_values() {
        assert!(approx(parse_offset("temp-offset", Some("2")).unwrap(), 2.0));
        assert!(approx(parse_offset("temp-offset", Some(" -1.5 ")).unwrap(), -1.5));
        assert!(approx(parse_offset("temp-offset", None).unwrap(), 0.0));
        assert!(approx(parse_offset("temp-offset", Some("")).unwrap(), 0.0));
        assert_eq!(
            parse_offset("humidity-offset", Some("4a")),
            Err(ConfigError::InvalidNumber {
                option: "humidity-offset",
                value: "4a".to_string(),
            })
        );
        assert!(parse_offset("temp-offset", Some("NaN")).is_err());
    }

    #[test]
    fn parse_decimals_values() {
        assert_eq!(parse_decimals("temp-decimals", Some("1"), 0).unwrap(), 1);
        assert_eq!(parse_decimals("temp-decimals", None, 2).unwrap(), 2);
        assert!(parse_decimals("temp-decimals", Some("-1"), 0).is_err());
        assert!(parse_decimals("temp-decimals", Some("one"), 0).is_err());
    }
}
