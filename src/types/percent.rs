// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Percentage type for brightness, roller position and battery level.

use std::fmt;

/// A level as a percentage (0-100).
///
/// Shelly devices report brightness, roller position and battery charge in
/// the 0-100 range. Every constructor clamps, so a stored `Percent` is
/// always valid.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::types::Percent;
///
/// let level = Percent::clamped(75);
/// assert_eq!(level.value(), 75);
///
/// // Out-of-range inputs are clamped
/// assert_eq!(Percent::clamped(150), Percent::MAX);
/// assert_eq!(Percent::clamped(-20), Percent::MIN);
///
/// // Relative changes stay in range
/// assert_eq!(Percent::clamped(90).offset(25), Percent::MAX);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Percent(u8);

impl Percent {
    /// Minimum value (0%).
    pub const MIN: Self = Self(0);

    /// Maximum value (100%).
    pub const MAX: Self = Self(100);

    /// Creates a percentage, returning `None` above 100.
    #[must_use]
    pub const fn new(value: u8) -> Option<Self> {
        if value > 100 { None } else { Some(Self(value)) }
    }

    /// Creates a percentage, clamping to the valid range.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamped(value: i64) -> Self {
        // Safe: clamped into 0..=100 first
        Self(value.clamp(0, 100) as u8)
    }

    /// Creates a percentage from a float, rounding then clamping.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self::clamped(value.round().clamp(0.0, 100.0) as i64)
    }

    /// Returns this level moved by `delta`, clamped into the valid range.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        Self::clamped(i64::from(self.0).saturating_add(delta))
    }

    /// Returns the percentage value.
    #[must_use]
    pub const fn value(&self) -> u8 {
        self.0
    }

    /// Returns `true` if the level is above zero.
    #[must_use]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_valid_values() {
        for v in 0..=100 {
            assert_eq!(Percent::new(v).unwrap().value(), v);
        }
        assert!(Percent::new(101).is_none());
    }

    #[test]
    fn percent_clamped() {
        assert_eq!(Percent::clamped(50).value(), 50);
        assert_eq!(Percent::clamped(150).value(), 100);
        assert_eq!(Percent::clamped(-1).value(), 0);
        assert_eq!(Percent::clamped(i64::MAX).value(), 100);
    }

    #[test]
    fn percent_offset_saturates() {
        assert_eq!(Percent::MAX.offset(40), Percent::MAX);
        assert_eq!(Percent::MIN.offset(-40), Percent::MIN);
        assert_eq!(Percent::clamped(10).offset(-25), Percent::MIN);
        assert_eq!(Percent::clamped(50).offset(25).value(), 75);
        assert_eq!(Percent::clamped(50).offset(i64::MIN), Percent::MIN);
    }

    #[test]
    fn percent_from_f64() {
        assert_eq!(Percent::from_f64(49.6).value(), 50);
        assert_eq!(Percent::from_f64(250.0), Percent::MAX);
        assert_eq!(Percent::from_f64(f64::NAN), Percent::MIN);
    }

    #[test]
    fn percent_display() {
        assert_eq!(Percent::clamped(75).to_string(), "75%");
    }
}
