// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Battery-powered sensors: H&T, Flood and Door/Window.
//!
//! Sensors only report. Every action other than a status request falls
//! through to [`Base`] and is rejected as unsupported.

use super::base::Base;
use super::{Action, DeviceContext, Message, Outcome, Variant};
use crate::error::Result;
use crate::normalize::{Measurement, convert_humidity, convert_temperature};
use crate::state::StateChange;
use crate::telemetry::{parse_flag, parse_number};
use crate::topic::{Endpoint, TopicSet};
use crate::types::{ContactState, Percent};

fn temperature(ctx: &mut DeviceContext, payload: &str) -> Result<()> {
    let raw = parse_number("temperature", payload)?;
    let units = ctx.config.temperature_units()?;
    let offset = ctx.config.temperature_offset()?;
    let decimals = ctx.config.temperature_decimals()?;
    let reading = convert_temperature(raw, units, offset, decimals);
    let display = reading.display.clone();
    if ctx.update(StateChange::Temperature(reading)) {
        ctx.log_received(&format!("temperature {display}"));
    }
    Ok(())
}

fn humidity(ctx: &mut DeviceContext, payload: &str) -> Result<()> {
    let raw = parse_number("humidity", payload)?;
    let offset = ctx.config.humidity_offset()?;
    let decimals = ctx.config.humidity_decimals()?;
    let reading = convert_humidity(raw, offset, decimals);
    let display = reading.display.clone();
    if ctx.update(StateChange::Humidity(reading)) {
        ctx.log_received(&format!("humidity {display}"));
    }
    Ok(())
}

fn battery(ctx: &mut DeviceContext, payload: &str) -> Result<()> {
    let level = Percent::from_f64(parse_number("battery", payload)?);
    ctx.update(StateChange::Battery(level));
    Ok(())
}

/// Shelly H&T.
pub(crate) struct HumidityTemperature;

impl Variant for HumidityTemperature {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.sensor("temperature"));
        topics.push(endpoint.sensor("humidity"));
        topics.push(endpoint.sensor("battery"));
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        if message.topic == endpoint.sensor("temperature") {
            temperature(ctx, message.payload)?;
        } else if message.topic == endpoint.sensor("humidity") {
            humidity(ctx, message.payload)?;
        } else if message.topic == endpoint.sensor("battery") {
            battery(ctx, message.payload)?;
        } else {
            return Base.handle_message(ctx, message);
        }
        Ok(Outcome::Handled)
    }

    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome> {
        Base.handle_action(ctx, endpoint, action)
    }
}

/// Shelly Flood.
pub(crate) struct Flood;

impl Variant for Flood {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.sensor("flood"));
        topics.push(endpoint.sensor("temperature"));
        topics.push(endpoint.sensor("battery"));
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        if message.topic == endpoint.sensor("flood") {
            let flooded = parse_flag(message.payload)?;
            ctx.update_fault(StateChange::Flood(flooded), "detected a flood!");
        } else if message.topic == endpoint.sensor("temperature") {
            temperature(ctx, message.payload)?;
        } else if message.topic == endpoint.sensor("battery") {
            battery(ctx, message.payload)?;
        } else {
            return Base.handle_message(ctx, message);
        }
        Ok(Outcome::Handled)
    }

    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome> {
        Base.handle_action(ctx, endpoint, action)
    }
}

/// Shelly Door/Window.
pub(crate) struct DoorWindow;

impl Variant for DoorWindow {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.sensor("state"));
        topics.push(endpoint.sensor("lux"));
        topics.push(endpoint.sensor("battery"));
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        if message.topic == endpoint.sensor("state") {
            let contact: ContactState = message.payload.parse()?;
            if ctx.update(StateChange::Contact(contact)) {
                ctx.log_received(contact.as_str());
            }
        } else if message.topic == endpoint.sensor("lux") {
            let lux = parse_number("lux", message.payload)?;
            ctx.update(StateChange::Lux(Measurement::new(lux, format!("{lux} lux"))));
        } else if message.topic == endpoint.sensor("battery") {
            battery(ctx, message.payload)?;
        } else {
            return Base.handle_message(ctx, message);
        }
        Ok(Outcome::Handled)
    }

    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome> {
        Base.handle_action(ctx, endpoint, action)
    }
}

#[cfg(test)]
mod tests {
    use crate::device::testing::Fixture;
    use crate::device::{Action, Model};
    use crate::manager::DeviceConfig;
    use crate::types::ContactState;

    const HT: &str = "shellies/shelly-ht-test";

    #[test]
    fn ht_subscriptions() {
        let fx = Fixture::model(Model::HumidityTemperature, HT);
        assert_eq!(
            fx.device.subscriptions(),
            vec![
                "shellies/announce",
                "shellies/shelly-ht-test/online",
                "shellies/shelly-ht-test/sensor/temperature",
                "shellies/shelly-ht-test/sensor/humidity",
                "shellies/shelly-ht-test/sensor/battery",
            ]
        );
    }

    #[test]
    fn ht_temperature_with_conversion() {
        let config = DeviceConfig::new(Model::HumidityTemperature, HT)
            .with_temperature("C->F", "2", "1");
        let mut fx = Fixture::new(config);
        fx.device.deliver("shellies/shelly-ht-test/sensor/temperature", "43");
        let temperature = fx.device.state().temperature().unwrap();
        assert!((temperature - 111.4).abs() < 1e-9);
    }

    #[test]
    fn ht_humidity_with_offset() {
        let config = DeviceConfig::new(Model::HumidityTemperature, HT).with_humidity("4", "0");
        let mut fx = Fixture::new(config);
        fx.device.deliver("shellies/shelly-ht-test/sensor/humidity", "60");
        let humidity = fx.device.state().humidity().unwrap();
        assert!((humidity - 64.0).abs() < 1e-9);
    }

    #[test]
    fn invalid_offset_fails_only_that_update() {
        let config = DeviceConfig::new(Model::HumidityTemperature, HT)
            .with_temperature("C", "4a", "1");
        let mut fx = Fixture::new(config);
        fx.device.deliver("shellies/shelly-ht-test/sensor/temperature", "20");
        assert_eq!(fx.device.state().temperature(), None);
        assert_eq!(fx.error_logs(), 1);

        fx.device.deliver("shellies/shelly-ht-test/sensor/humidity", "50");
        assert!(fx.device.state().humidity().is_some());
    }

    #[test]
    fn battery_level() {
        let mut fx = Fixture::model(Model::HumidityTemperature, HT);
        fx.device.deliver("shellies/shelly-ht-test/sensor/battery", "87");
        assert_eq!(fx.device.state().battery().map(|b| b.value()), Some(87));
    }

    #[test]
    fn sensors_reject_switching() {
        let mut fx = Fixture::model(Model::Flood, "shellies/shellyflood-test");
        fx.device.apply_action(Action::TurnOn);
        fx.device.apply_action(Action::ResetEnergy);
        assert!(fx.publisher.is_empty());
        assert_eq!(fx.error_logs(), 2);
    }

    #[test]
    fn flood_raises_error_once() {
        let mut fx = Fixture::model(Model::Flood, "shellies/shellyflood-test");
        fx.device.deliver("shellies/shellyflood-test/sensor/flood", "true");
        fx.device.deliver("shellies/shellyflood-test/sensor/flood", "true");
        assert_eq!(fx.device.state().flood(), Some(true));
        assert_eq!(fx.error_logs(), 1);
        fx.device.deliver("shellies/shellyflood-test/sensor/flood", "false");
        assert_eq!(fx.device.state().flood(), Some(false));
    }

    #[test]
    fn door_window_contact_and_lux() {
        let mut fx = Fixture::model(Model::DoorWindow, "shellies/shellydw-test");
        fx.device.deliver("shellies/shellydw-test/sensor/state", "open");
        fx.device.deliver("shellies/shellydw-test/sensor/lux", "120");
        assert_eq!(fx.device.state().contact(), Some(ContactState::Open));
        assert!((fx.device.state().lux().unwrap() - 120.0).abs() < 1e-9);

        fx.device.deliver("shellies/shellydw-test/sensor/state", "close");
        assert_eq!(fx.device.state().contact(), Some(ContactState::Closed));
    }
}
