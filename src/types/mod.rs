// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Shelly device state.
//!
//! Each type keeps its value inside the valid range at construction time,
//! so normalized state can never hold an out-of-range brightness or color
//! channel.
//!
//! # Types
//!
//! - [`PowerState`] - On/Off power state
//! - [`Percent`] - Brightness, position and battery level (0-100%)
//! - [`RgbColor`] - Color channels (0-255 each)
//! - [`LightMode`] - Operating mode of a light channel (white or color)
//! - [`RollerState`] - Movement state reported by a roller shutter
//! - [`ContactState`] - Open/closed state of a door/window sensor

mod contact;
mod light_mode;
mod percent;
mod power;
mod rgb_color;

pub use contact::{ContactState, RollerState};
pub use light_mode::LightMode;
pub use percent::Percent;
pub use power::PowerState;
pub use rgb_color::RgbColor;
