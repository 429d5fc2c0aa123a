// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Behavior shared by every model: announcements, liveness and
//! device-level flags.

use super::{Action, DeviceContext, Message, Outcome, Variant};
use crate::command::StatusRequest;
use crate::error::Result;
use crate::event::Severity;
use crate::normalize::convert_temperature;
use crate::state::StateChange;
use crate::telemetry::{Announcement, parse_flag, parse_json, parse_number};
use crate::topic::{ANNOUNCE_TOPIC, Endpoint, TopicSet};

/// Decimal places kept on the internal temperature.
const INTERNAL_TEMPERATURE_DECIMALS: u32 = 1;

/// End of every delegation chain.
pub(crate) struct Base;

impl Base {
    /// Adds the device-level temperature and overheating topics.
    pub(crate) fn temperature_topics(endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.device("temperature"));
        topics.push(endpoint.device("overtemperature"));
    }

    fn announce(ctx: &mut DeviceContext, endpoint: &Endpoint, payload: &str) -> Result<Outcome> {
        let announce: Announcement = parse_json(payload)?;
        if announce.id != endpoint.device_id() {
            // Shared topic, another device's announcement
            return Ok(Outcome::Handled);
        }
        for change in announce.state_changes() {
            ctx.update(change);
        }
        Ok(Outcome::Handled)
    }
}

impl Variant for Base {
    fn subscriptions(&self, _endpoint: &Endpoint, _topics: &mut TopicSet) {}

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let Message {
            endpoint,
            topic,
            payload,
        } = *message;

        if topic == ANNOUNCE_TOPIC {
            return Self::announce(ctx, endpoint, payload);
        }
        if topic == endpoint.online() {
            let online = parse_flag(payload)?;
            if ctx.update(StateChange::Online(online)) {
                ctx.log_received(if online { "online" } else { "offline" });
            }
        } else if topic == endpoint.device("temperature") {
            let raw = parse_number("temperature", payload)?;
            let units = ctx.config.internal_temperature_units()?;
            let reading = convert_temperature(raw, units, 0.0, INTERNAL_TEMPERATURE_DECIMALS);
            ctx.update(StateChange::InternalTemperature(reading));
        } else if topic == endpoint.device("overtemperature") {
            let flag = parse_flag(payload)?;
            ctx.update_fault(StateChange::Overtemperature(flag), "is overheating!");
        } else if topic == endpoint.device("overload") {
            let flag = parse_flag(payload)?;
            ctx.update_fault(StateChange::Overload(flag), "was overloaded!");
        } else if topic == endpoint.device("loaderror") {
            let flag = parse_flag(payload)?;
            ctx.update_fault(StateChange::LoadError(flag), "reported a load error!");
        } else {
            return Ok(Outcome::Unhandled);
        }
        Ok(Outcome::Handled)
    }

    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome> {
        match action {
            Action::RequestStatus => {
                ctx.send(endpoint, &StatusRequest);
                ctx.log(
                    Severity::Debug,
                    &format!("requested status of \"{}\"", ctx.name),
                );
                Ok(Outcome::Handled)
            }
            _ => Ok(Outcome::Unhandled),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::device::testing::Fixture;
    use crate::device::{Action, Model, Outcome};
    use crate::manager::DeviceConfig;

    const ADDRESS: &str = "shellies/shelly1-test";

    #[test]
    fn announce_for_this_device() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.deliver(
            "shellies/announce",
            r#"{"id":"shelly1-test","mac":"aa:bb:cc:dd","ip":"192.168.1.100","fw_ver":"0.0.0","new_fw":true}"#,
        );
        let state = fx.device.state();
        assert_eq!(state.ip_address(), Some("192.168.1.100"));
        assert_eq!(state.mac_address(), Some("aa:bb:cc:dd"));
        assert_eq!(state.firmware(), Some("0.0.0"));
        assert_eq!(state.update_available(), Some(true));
    }

    #[test]
    fn announce_for_other_device_is_ignored() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        let outcome = fx
            .device
            .handle_message(
                "shellies/announce",
                r#"{"id":"shelly-bulb-test","ip":"192.168.1.101"}"#,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::Handled);
        assert_eq!(fx.device.state().ip_address(), None);
        assert!(fx.sink.changes.lock().is_empty());
    }

    #[test]
    fn online_flag() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/online", "true");
        assert!(fx.device.state().is_online());
        fx.device.deliver("shellies/shelly1-test/online", "false");
        assert!(!fx.device.state().is_online());
    }

    #[test]
    fn internal_temperature_uses_configured_units() {
        let config = DeviceConfig::new(Model::MeteredRelay, ADDRESS)
            .with_internal_temperature_units("C->F");
        let mut fx = Fixture::new(config);
        fx.device.deliver("shellies/shelly1-test/temperature", "100");
        let temperature = fx.device.state().internal_temperature().unwrap();
        assert!((temperature - 212.0).abs() < 1e-9);
    }

    #[test]
    fn overtemperature_logs_once() {
        let mut fx = Fixture::model(Model::MeteredRelay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/overtemperature", "1");
        fx.device.deliver("shellies/shelly1-test/overtemperature", "1");
        assert!(fx.device.state().overtemperature());
        assert_eq!(fx.error_logs(), 1);

        fx.device.deliver("shellies/shelly1-test/overtemperature", "0");
        assert!(!fx.device.state().overtemperature());
    }

    #[test]
    fn request_status() {
        let mut fx = Fixture::model(Model::Bulb, "shellies/shelly-bulb-test");
        fx.device.apply_action(Action::RequestStatus);
        assert_eq!(
            fx.last_publish(),
            Some((
                "shellies/shelly-bulb-test/command".to_string(),
                "update".to_string()
            ))
        );
    }
}
