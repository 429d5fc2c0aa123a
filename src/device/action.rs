// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host-requested actions.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Channel levels for [`Action::SetColorLevels`].
///
/// Every field is optional; absent fields keep the device's current value.
/// Color channels are clamped to 0-255, the white level to the model's
/// range, and the white temperature to 2700-6500 K.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorLevels {
    /// Red channel.
    pub red: Option<i64>,
    /// Green channel.
    pub green: Option<i64>,
    /// Blue channel.
    pub blue: Option<i64>,
    /// White channel.
    pub white: Option<i64>,
    /// White color temperature in Kelvin.
    pub white_temperature: Option<i64>,
}

/// An action the host asks a device to perform.
///
/// Levels are accepted as signed integers and clamped by the device, so an
/// out-of-range request still does something sensible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "value", rename_all = "snake_case")]
pub enum Action {
    /// Switch on.
    TurnOn,
    /// Switch off.
    TurnOff,
    /// Switch to the opposite of the known power state.
    Toggle,
    /// Set brightness (or roller position) to a level.
    SetBrightness(i64),
    /// Raise brightness by a delta.
    BrightenBy(i64),
    /// Lower brightness by a delta.
    DimBy(i64),
    /// Set color and white channel levels.
    SetColorLevels(ColorLevels),
    /// Ask the device to publish its full status.
    RequestStatus,
    /// Zero the accumulated energy total.
    ResetEnergy,
}

impl Action {
    /// Returns the payload-free kind of this action.
    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        match self {
            Self::TurnOn => ActionKind::TurnOn,
            Self::TurnOff => ActionKind::TurnOff,
            Self::Toggle => ActionKind::Toggle,
            Self::SetBrightness(_) => ActionKind::SetBrightness,
            Self::BrightenBy(_) => ActionKind::BrightenBy,
            Self::DimBy(_) => ActionKind::DimBy,
            Self::SetColorLevels(_) => ActionKind::SetColorLevels,
            Self::RequestStatus => ActionKind::RequestStatus,
            Self::ResetEnergy => ActionKind::ResetEnergy,
        }
    }
}

/// The kind of an [`Action`], without its arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    /// [`Action::TurnOn`]
    TurnOn,
    /// [`Action::TurnOff`]
    TurnOff,
    /// [`Action::Toggle`]
    Toggle,
    /// [`Action::SetBrightness`]
    SetBrightness,
    /// [`Action::BrightenBy`]
    BrightenBy,
    /// [`Action::DimBy`]
    DimBy,
    /// [`Action::SetColorLevels`]
    SetColorLevels,
    /// [`Action::RequestStatus`]
    RequestStatus,
    /// [`Action::ResetEnergy`]
    ResetEnergy,
}

impl ActionKind {
    /// Returns the human-readable name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::TurnOn => "turn on",
            Self::TurnOff => "turn off",
            Self::Toggle => "toggle",
            Self::SetBrightness => "set brightness",
            Self::BrightenBy => "brighten",
            Self::DimBy => "dim",
            Self::SetColorLevels => "set color levels",
            Self::RequestStatus => "request status",
            Self::ResetEnergy => "reset energy",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
