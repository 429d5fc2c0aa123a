// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Parser for `shellies/announce` messages.

use serde::Deserialize;

use crate::state::StateChange;

/// Discovery announcement broadcast by every Shelly device.
///
/// The announcement topic is shared by all devices, so a device adapter only
/// accepts announcements whose `id` matches its own address.
///
/// # Examples
///
/// ```
/// use shelly_mqtt::telemetry::Announcement;
///
/// let json = r#"{"id":"shelly-bulb-test","mac":"aa:bb:cc:ee","ip":"192.168.1.101","fw_ver":"0.1.0","new_fw":false}"#;
/// let announce: Announcement = serde_json::from_str(json).unwrap();
///
/// assert_eq!(announce.state_changes().len(), 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Announcement {
    /// Device identifier, the last segment of the device's base address.
    pub id: String,

    /// MAC address.
    #[serde(default)]
    pub mac: Option<String>,

    /// IP address.
    #[serde(default)]
    pub ip: Option<String>,

    /// Firmware version.
    #[serde(default)]
    pub fw_ver: Option<String>,

    /// Whether a firmware update is available.
    #[serde(default)]
    pub new_fw: Option<bool>,
}

impl Announcement {
    /// Converts the announced fields into state changes.
    ///
    /// Fields missing from the payload produce no change, keeping the
    /// best-known value.
    #[must_use]
    pub fn state_changes(&self) -> Vec<StateChange> {
        let mut changes = Vec::with_capacity(4);
        if let Some(mac) = &self.mac {
            changes.push(StateChange::MacAddress(mac.clone()));
        }
        if let Some(ip) = &self.ip {
            changes.push(StateChange::IpAddress(ip.clone()));
        }
        if let Some(fw) = &self.fw_ver {
            changes.push(StateChange::Firmware(fw.clone()));
        }
        if let Some(new_fw) = self.new_fw {
            changes.push(StateChange::UpdateAvailable(new_fw));
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_announcement() {
        let json = r#"{"id": "shelly1-test", "mac": "aa:bb:cc:dd", "ip": "192.168.1.100", "fw_ver": "0.0.0", "new_fw": true}"#;
        let announce: Announcement = serde_json::from_str(json).unwrap();
        assert_eq!(announce.id, "shelly1-test");
        assert_eq!(
            announce.state_changes(),
            vec![
                StateChange::MacAddress("aa:bb:cc:dd".to_string()),
                StateChange::IpAddress("192.168.1.100".to_string()),
                StateChange::Firmware("0.0.0".to_string()),
                StateChange::UpdateAvailable(true),
            ]
        );
    }

    #[test]
    fn partial_announcement_keeps_missing_fields() {
        let announce: Announcement = serde_json::from_str(r#"{"id":"x","ip":"10.0.0.2"}"#).unwrap();
        assert_eq!(
            announce.state_changes(),
            vec![StateChange::IpAddress("10.0.0.2".to_string())]
        );
    }

    #[test]
    fn announcement_requires_id() {
        assert!(serde_json::from_str::<Announcement>(r#"{"ip":"10.0.0.2"}"#).is_err());
    }
}
