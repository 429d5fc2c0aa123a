// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound payload parsing for Shelly MQTT messages.
//!
//! Shelly Gen1 devices publish two kinds of payloads:
//!
//! - bare tokens on per-field topics (`on`, `1`, `true`, `101.5`, `open`)
//! - small flat JSON objects on `status` topics and on `shellies/announce`
//!
//! # Examples
//!
//! ```
//! use shelly_mqtt::telemetry::{Announcement, parse_flag, parse_number};
//!
//! assert!(parse_flag("1").unwrap());
//! assert!(!parse_flag("false").unwrap());
//! assert!((parse_number("power", "101.123").unwrap() - 101.123).abs() < 1e-9);
//!
//! let announce: Announcement = serde_json::from_str(
//!     r#"{"id":"shelly1-test","mac":"aa:bb:cc:dd","ip":"192.168.1.100","fw_ver":"0.0.0","new_fw":false}"#,
//! ).unwrap();
//! assert_eq!(announce.id, "shelly1-test");
//! ```

mod announce;
mod light_status;

pub use announce::Announcement;
pub use light_status::LightStatus;
pub(crate) use light_status::{clamp_u8, clamp_u16};

use crate::error::ParseError;

/// Parses a boolean token payload.
///
/// Accepts `1`/`0`, `true`/`false` and `on`/`off`, ignoring surrounding
/// whitespace and ASCII case.
///
/// # Errors
///
/// Returns [`ParseError::InvalidToken`] for anything else.
pub fn parse_flag(payload: &str) -> Result<bool, ParseError> {
    match payload.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" => Ok(true),
        "0" | "false" | "off" => Ok(false),
        _ => Err(ParseError::InvalidToken {
            expected: "a boolean token",
            payload: payload.to_string(),
        }),
    }
}

/// Parses a numeric payload.
///
/// # Errors
///
/// Returns [`ParseError::InvalidNumber`] if the payload is not a finite
/// number.
pub fn parse_number(field: &'static str, payload: &str) -> Result<f64, ParseError> {
    payload
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            field,
            value: payload.to_string(),
        })
}

/// Parses a JSON payload into `T`.
///
/// # Errors
///
/// Returns [`ParseError::Json`] if the payload is not valid JSON for `T`.
pub fn parse_json<T: serde::de::DeserializeOwned>(payload: &str) -> Result<T, ParseError> {
    serde_json::from_str(payload).map_err(ParseError::from)
}
