// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Normalized device state.
//!
//! [`DeviceState`] holds the canonical, unit-converted, clamped state of one
//! device instance. [`StateChange`] is a single field update applied to it.
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::state::{DeviceState, StateChange};
//! use shelly_mqtt::types::PowerState;
//!
//! let mut state = DeviceState::new();
//! state.apply(&StateChange::Power(PowerState::Off));
//! assert!(state.is_off());
//! ```

mod device_state;
mod state_change;

pub use device_state::DeviceState;
pub use state_change::StateChange;
