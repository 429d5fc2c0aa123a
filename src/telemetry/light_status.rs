// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `<address>/<segment>/<n>/status` light messages.

use serde::Deserialize;

use crate::error::Error;
use crate::types::{LightMode, Percent, RgbColor};

/// Status object published by dimmers, bulbs, Duo and RGBW2 channels.
///
/// All fields are optional on the wire; which ones are present depends on
/// the model and on the channel's mode. Numbers are read as floats and
/// clamped into their valid range when converted.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::telemetry::LightStatus;
/// use shelly_mqtt::types::LightMode;
///
/// let status: LightStatus = serde_json::from_str(
///     r#"{"ison": true, "mode": "white", "brightness": 40, "power": 3.5, "overpower": false}"#,
/// ).unwrap();
///
/// assert!(status.ison);
/// assert!(status.check_mode(LightMode::White, true).is_ok());
/// assert!(status.check_mode(LightMode::Color, true).is_err());
/// assert_eq!(status.brightness_level().map(|b| b.value()), Some(40));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LightStatus {
    /// Whether the output is on.
    #[serde(default)]
    pub ison: bool,

    /// Active channel mode (`white` or `color`).
    #[serde(default)]
    pub mode: Option<String>,

    /// Brightness (0-100) in white mode.
    #[serde(default)]
    pub brightness: Option<f64>,

    /// Gain (0-100) in color mode.
    #[serde(default)]
    pub gain: Option<f64>,

    /// Red channel (0-255).
    #[serde(default)]
    pub red: Option<f64>,

    /// Green channel (0-255).
    #[serde(default)]
    pub green: Option<f64>,

    /// Blue channel (0-255).
    #[serde(default)]
    pub blue: Option<f64>,

    /// White channel level.
    #[serde(default)]
    pub white: Option<f64>,

    /// White color temperature in Kelvin.
    #[serde(default)]
    pub temp: Option<f64>,

    /// Consumed power in Watts.
    #[serde(default)]
    pub power: Option<f64>,

    /// Whether an overpower condition occurred.
    #[serde(default)]
    pub overpower: Option<bool>,
}

impl LightStatus {
    /// Checks the declared mode against the channel's configured mode.
    ///
    /// With `required`, a status that does not declare a mode is rejected
    /// too; otherwise only a declared, different mode is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ModeMismatch`] when the modes disagree.
    pub fn check_mode(&self, expected: LightMode, required: bool) -> Result<(), Error> {
        match self.mode.as_deref() {
            Some(mode) if mode.parse::<LightMode>().ok() == Some(expected) => Ok(()),
            None if !required => Ok(()),
            other => Err(Error::ModeMismatch {
                expected,
                actual: other.unwrap_or_default().to_string(),
            }),
        }
    }

    /// Returns the reported brightness, clamped to 0-100.
    #[must_use]
    pub fn brightness_level(&self) -> Option<Percent> {
        self.brightness.map(Percent::from_f64)
    }

    /// Returns the reported gain, falling back to brightness.
    #[must_use]
    pub fn gain_level(&self) -> Option<Percent> {
        self.gain.or(self.brightness).map(Percent::from_f64)
    }

    /// Returns `current` updated with whichever color channels were reported.
    ///
    /// Returns `None` if the status carries no color channel at all.
    #[must_use]
    pub fn color_over(&self, current: RgbColor) -> Option<RgbColor> {
        if self.red.is_none() && self.green.is_none() && self.blue.is_none() {
            return None;
        }
        Some(current.with_levels(
            self.red.map(round_level),
            self.green.map(round_level),
            self.blue.map(round_level),
        ))
    }

    /// Returns the white level clamped to `0..=max`.
    #[must_use]
    pub fn white_level(&self, max: u8) -> Option<u8> {
        self.white.map(|w| clamp_u8(round_level(w), max))
    }

    /// Returns the color temperature clamped to `min..=max` Kelvin.
    #[must_use]
    pub fn temperature_kelvin(&self, min: u16, max: u16) -> Option<u16> {
        self.temp.map(|t| clamp_u16(round_level(t), min, max))
    }
}

#[allow(clippy::cast_possible_truncation)]
fn round_level(value: f64) -> i64 {
    if value.is_nan() { 0 } else { value.round() as i64 }
}

// Safe: clamped into 0..=max first
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_u8(value: i64, max: u8) -> u8 {
    value.clamp(0, i64::from(max)) as u8
}

// Safe: clamped into min..=max first
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_u16(value: i64, min: u16, max: u16) -> u16 {
    value.clamp(i64::from(min), i64::from(max)) as u16
}
