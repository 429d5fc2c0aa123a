// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RGB color type with clamped channel construction.

use std::fmt;

/// RGB color with 8-bit channels (0-255).
///
/// Shelly color channels (bulbs and RGBW2 controllers in color mode) report
/// and accept each channel as an integer in 0-255. Values from the wire are
/// clamped on the way in.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::RgbColor;
///
/// let color = RgbColor::new(255, 128, 0);
/// assert_eq!(color.red(), 255);
/// assert_eq!(color.green(), 128);
/// assert_eq!(color.blue(), 0);
///
/// // Wire values are clamped
/// let clamped = RgbColor::clamped(300, -5, 12);
/// assert_eq!(clamped, RgbColor::new(255, 0, 12));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Creates a color from unchecked channel values, clamping each to 0-255.
    #[must_use]
    pub fn clamped(red: i64, green: i64, blue: i64) -> Self {
        Self::new(clamp_channel(red), clamp_channel(green), clamp_channel(blue))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns a copy with the given channels replaced, clamping each.
    ///
    /// `None` keeps the current value for that channel.
    #[must_use]
    pub fn with_levels(self, red: Option<i64>, green: Option<i64>, blue: Option<i64>) -> Self {
        Self {
            red: red.map_or(self.red, clamp_channel),
            green: green.map_or(self.green, clamp_channel),
            blue: blue.map_or(self.blue, clamp_channel),
        }
    }

    /// Converts the color to a hex string (without `#` prefix).
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl From<(u8, u8, u8)> for RgbColor {
    fn from((red, green, blue): (u8, u8, u8)) -> Self {
        Self::new(red, green, blue)
    }
}

/// Clamps a raw channel level into 0-255.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn clamp_channel(value: i64) -> u8 {
    // Safe: clamped into u8 range first
    value.clamp(0, 255) as u8
}
