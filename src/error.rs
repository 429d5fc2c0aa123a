// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the Shelly MQTT adapter.
//!
//! Every failure a device adapter can hit while handling one message or one
//! action maps to a variant of [`Error`]. Those errors are caught at the
//! single-message boundary ([`Device::deliver`](crate::Device::deliver) and
//! [`Device::apply_action`](crate::Device::apply_action)), logged, and
//! dropped, so one broken payload never stops other devices from updating.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::device::ActionKind;
use crate::event::DeviceId;
use crate::types::LightMode;

/// The main error type for this library.
#[derive(Debug, Error)]
pub enum Error {
    /// The payload could not be decoded into the shape the topic expects.
    #[error("payload parse error: {0}")]
    Parse(#[from] ParseError),

    /// A light status declared a mode other than the channel's configured one.
    #[error("expected mode \"{expected}\", but device is in mode \"{actual}\"")]
    ModeMismatch {
        /// The mode the channel is configured for.
        expected: LightMode,
        /// The mode reported by the device, verbatim.
        actual: String,
    },

    /// A configuration option needed for this update is not usable.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// No variant in the delegation chain handles the action.
    #[error("action {0} is not supported by this device")]
    UnsupportedAction(ActionKind),

    /// The configuration failed validation.
    #[error("configuration is invalid: {0}")]
    Validation(#[from] ValidationErrors),

    /// Error occurred in the transport.
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    /// Device was not found in the manager.
    #[error("device not found")]
    DeviceNotFound,

    /// A device with this ID is already registered.
    #[error("device {0} is already registered")]
    DuplicateDevice(DeviceId),
}

/// Errors raised while decoding an inbound payload.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// A bare token payload was not one of the accepted values.
    #[error("expected {expected}, got {payload:?}")]
    InvalidToken {
        /// Human-readable description of the accepted tokens.
        expected: &'static str,
        /// The raw payload.
        payload: String,
    },

    /// A numeric payload or field could not be parsed.
    #[error("failed to parse {field} from {value:?}")]
    InvalidNumber {
        /// The field that failed to parse.
        field: &'static str,
        /// The raw value.
        value: String,
    },
}

/// Errors related to model-specific configuration options.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// An option that must be numeric holds something else.
    #[error("option {option} must be a number, got {value:?}")]
    InvalidNumber {
        /// The option key, as persisted (e.g. `temp-offset`).
        option: &'static str,
        /// The persisted value.
        value: String,
    },

    /// The unit conversion mode is not one of the known modes.
    #[error("unknown temperature units {0:?}")]
    UnknownUnits(String),

    /// The model id is not one of the supported models.
    #[error("unknown model {0:?}")]
    UnknownModel(String),
}

/// Errors related to the MQTT transport.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// MQTT connection or communication failed.
    #[cfg(feature = "mqtt")]
    #[error("MQTT error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    /// Connection to the broker failed.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// Invalid broker URL or address.
    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// Field-keyed validation failures for a device configuration.
///
/// Keys are the persisted option names (`address`, `broker-id`, ...), so a
/// configuration UI can attach each message to the matching form field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: BTreeMap<&'static str, String>,
}

impl ValidationErrors {
    /// Creates an empty set of validation errors.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error for a field, replacing any earlier one.
    pub fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    /// Returns `true` if no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns `true` if the given field failed.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Returns the message for a field.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Iterates over `(field, message)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.errors.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Returns the number of failed fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.errors {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// A specialized Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_mismatch_display() {
        let err = Error::ModeMismatch {
            expected: LightMode::White,
            actual: "color".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "expected mode \"white\", but device is in mode \"color\""
        );
    }

    #[test]
    fn config_error_display() {
        let err = ConfigError::InvalidNumber {
            option: "humidity-offset",
            value: "4a".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "option humidity-offset must be a number, got \"4a\""
        );
    }

    #[test]
    fn error_from_parse_error() {
        let err: Error = ParseError::InvalidToken {
            expected: "on or off",
            payload: "maybe".to_string(),
        }
        .into();
        assert!(matches!(err, Error::Parse(ParseError::InvalidToken { .. })));
    }

    #[test]
    fn unsupported_action_display() {
        let err = Error::UnsupportedAction(ActionKind::SetColorLevels);
        assert_eq!(
            err.to_string(),
            "action set color levels is not supported by this device"
        );
    }

    #[test]
    fn validation_errors_display_in_field_order() {
        let mut errors = ValidationErrors::new();
        errors.insert("message-type", "required");
        errors.insert("address", "required");
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("address"));
        assert_eq!(errors.to_string(), "address: required; message-type: required");
    }
}
