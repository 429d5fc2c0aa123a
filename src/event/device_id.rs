// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host record identifiers.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

/// Namespace for ids derived from host record keys.
const HOST_RECORD_NAMESPACE: Uuid = Uuid::from_u128(0x5c3e_41f2_8d7a_4b0e_9a61_2f4d_7c19_e803);

/// Stable identifier of one host device record.
///
/// Every state update and log event carries it, so the host can find the
/// record again. It is persisted next to the device's configuration and
/// handed back through
/// [`DeviceManager::restore_device`](crate::manager::DeviceManager::restore_device);
/// it must survive restarts.
///
/// Hosts that already key their records use [`DeviceId::for_record`],
/// which maps the same key to the same id every time.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::event::DeviceId;
///
/// let porch = DeviceId::for_record("indigo:1234567");
/// assert_eq!(porch, DeviceId::for_record("indigo:1234567"));
/// assert_ne!(porch, DeviceId::for_record("indigo:7654321"));
///
/// let stored = porch.to_string();
/// assert_eq!(stored.parse::<DeviceId>().unwrap(), porch);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct DeviceId(Uuid);

impl DeviceId {
    /// Allocates an id for a record the host has not persisted yet.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Derives the id of the host record keyed by `key`.
    #[must_use]
    pub fn for_record(key: &str) -> Self {
        Self(Uuid::new_v5(&HOST_RECORD_NAMESPACE, key.as_bytes()))
    }

    /// Wraps a persisted UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DeviceId {
    fn default() -> Self {
        Self::new()
    }
}

impl FromStr for DeviceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

impl fmt::Debug for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.0.simple().to_string();
        write!(f, "DeviceId({}...)", &full[..8])
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STORED: &str = "a1a2a3a4-b1b2-c1c2-d1d2-d3d4d5d6d7d8";

    #[test]
    fn record_key_maps_to_one_id() {
        let first = DeviceId::for_record("indigo:1234567");
        assert_eq!(first, DeviceId::for_record("indigo:1234567"));
        assert_ne!(first, DeviceId::for_record("indigo:1234568"));
        assert_eq!(first.as_uuid().get_version_num(), 5);
    }

    #[test]
    fn survives_persistence_as_text() {
        let id: DeviceId = STORED.parse().unwrap();
        assert_eq!(id.to_string(), STORED);
        assert_eq!(format!(" {STORED}\n").parse::<DeviceId>().unwrap(), id);
        assert!("shelly1-test".parse::<DeviceId>().is_err());
    }

    #[test]
    fn survives_persistence_as_json() {
        let id: DeviceId = STORED.parse().unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{STORED}\""));
        assert_eq!(serde_json::from_str::<DeviceId>(&json).unwrap(), id);
    }

    #[test]
    fn debug_is_abbreviated() {
        let id: DeviceId = STORED.parse().unwrap();
        assert_eq!(format!("{id:?}"), "DeviceId(a1a2a3a4...)");
    }
}
