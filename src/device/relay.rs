// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Switched and metered channels.
//!
//! Both variants are parameterized by the channel segment, so lights and
//! rollers reuse them for the `power`, `energy` and on/off topics under
//! their own segment.

use super::base::Base;
use super::{Action, DeviceContext, Message, Outcome, Variant};
use crate::command::SwitchCommand;
use crate::error::{ParseError, Result};
use crate::event::Severity;
use crate::normalize::{Measurement, accumulate_energy};
use crate::state::StateChange;
use crate::telemetry::{parse_flag, parse_number};
use crate::topic::{Endpoint, RELAY, TopicSet};
use crate::types::PowerState;

/// On/off channel under a segment.
pub(crate) struct Relay(pub(crate) &'static str);

impl Relay {
    /// The `relay` channel of a Shelly 1.
    pub(crate) const SWITCH: Self = Self(RELAY);

    fn switch(&self, ctx: &mut DeviceContext, endpoint: &Endpoint, power: PowerState) {
        ctx.send(endpoint, &SwitchCommand::new(self.0, power));
        ctx.update(StateChange::Power(power));
        ctx.log_sent(power.as_str());
    }

    fn handle_channel(ctx: &mut DeviceContext, payload: &str) -> Result<()> {
        match payload.trim() {
            "on" => {
                ctx.update(StateChange::Overpower(false));
                if ctx.update(StateChange::Power(PowerState::On)) {
                    ctx.log_received("on");
                }
            }
            "off" => {
                if ctx.update(StateChange::Power(PowerState::Off)) {
                    ctx.log_received("off");
                }
            }
            "overpower" => {
                ctx.update_fault(StateChange::Overpower(true), "was overloaded!");
                ctx.update(StateChange::Power(PowerState::Off));
            }
            _ => {
                return Err(ParseError::InvalidToken {
                    expected: "on, off or overpower",
                    payload: payload.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Toggles from the known power state.
///
/// An indeterminate state is left alone with a warning.
pub(crate) fn toggle(
    ctx: &mut DeviceContext,
    turn: impl FnOnce(&mut DeviceContext, PowerState) -> Result<Outcome>,
) -> Result<Outcome> {
    match ctx.state.power() {
        Some(power) => turn(ctx, power.toggled()),
        None => {
            ctx.log(
                Severity::Warning,
                &format!("\"{}\" power state is unknown, not toggling", ctx.name),
            );
            Ok(Outcome::Handled)
        }
    }
}

impl Variant for Relay {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.channel(self.0));
        topics.push(endpoint.channel("input"));
        topics.push(endpoint.channel("longpush"));
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        let topic = message.topic;

        if topic == endpoint.channel(self.0) {
            Self::handle_channel(ctx, message.payload)?;
        } else if topic == endpoint.channel("input") {
            ctx.update(StateChange::Input(parse_flag(message.payload)?));
        } else if topic == endpoint.channel("longpush") {
            ctx.update(StateChange::LongPush(parse_flag(message.payload)?));
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
        match action {
            Action::TurnOn => self.switch(ctx, endpoint, PowerState::On),
            Action::TurnOff => self.switch(ctx, endpoint, PowerState::Off),
            Action::Toggle => {
                return toggle(ctx, |ctx, power| {
                    self.switch(ctx, endpoint, power);
                    Ok(Outcome::Handled)
                });
            }
            _ => return Base.handle_action(ctx, endpoint, action),
        }
        Ok(Outcome::Handled)
    }
}

/// Relay channel that also reports power draw and energy.
pub(crate) struct MeteredRelay(pub(crate) &'static str);

impl MeteredRelay {
    /// The `relay` channel of a Shelly 1PM.
    pub(crate) const SWITCH: Self = Self(RELAY);
}

impl Variant for MeteredRelay {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        Relay(self.0).subscriptions(endpoint, topics);
        topics.push(endpoint.channel_topic(self.0, "power"));
        topics.push(endpoint.channel_topic(self.0, "energy"));
        Base::temperature_topics(endpoint, topics);
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        let topic = message.topic;
        let payload = message.payload;

        if topic == endpoint.channel_topic(self.0, "power") {
            let watts = parse_number("power", payload)?;
            let reading = Measurement::new(watts, format!("{} W", payload.trim()));
            ctx.update(StateChange::CurrentPower(reading));
        } else if topic == endpoint.channel_topic(self.0, "energy") {
            let watt_minutes = parse_number("energy", payload)?;
            let total = accumulate_energy(ctx.state.accumulated_energy(), watt_minutes);
            ctx.update(StateChange::AccumulatedEnergy(total));
        } else {
            return Relay(self.0).handle_message(ctx, message);
        }
        Ok(Outcome::Handled)
    }

    fn handle_action(
        &self,
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        action: &Action,
    ) -> Result<Outcome> {
        if let Action::ResetEnergy = action {
            ctx.update(StateChange::AccumulatedEnergy(0.0));
            ctx.log(Severity::Info, &format!("reset energy of \"{}\"", ctx.name));
            return Ok(Outcome::Handled);
        }
        Relay(self.0).handle_action(ctx, endpoint, action)
    }
}

#[cfg(test)]
mod tests {
    use crate::device::testing::Fixture;
    use crate::device::{Action, Model};
    use crate::event::Severity;
    use crate::types::PowerState;

    const ADDRESS: &str = "shellies/shelly1-test";

    #[test]
    fn subscriptions_for_relay() {
        let fx = Fixture::model(Model::Relay, ADDRESS);
        assert_eq!(
            fx.device.subscriptions(),
            vec![
                "shellies/announce",
                "shellies/shelly1-test/online",
                "shellies/shelly1-test/relay/0",
                "shellies/shelly1-test/input/0",
                "shellies/shelly1-test/longpush/0",
            ]
        );
    }

    #[test]
    fn subscriptions_for_metered_relay() {
        let fx = Fixture::model(Model::MeteredRelay, ADDRESS);
        let topics = fx.device.subscriptions();
        assert!(topics.contains(&"shellies/shelly1-test/relay/0/power".to_string()));
        assert!(topics.contains(&"shellies/shelly1-test/relay/0/energy".to_string()));
        assert!(topics.contains(&"shellies/shelly1-test/temperature".to_string()));
        assert!(topics.contains(&"shellies/shelly1-test/overtemperature".to_string()));
    }

    #[test]
    fn relay_payloads() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/relay/0", "on");
        assert!(fx.device.is_on());
        fx.device.deliver("shellies/shelly1-test/relay/0", "off");
        assert!(fx.device.is_off());
    }

    #[test]
    fn overpower_switches_off_and_logs() {
        let mut fx = Fixture::model(Model::MeteredRelay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/relay/0", "on");
        fx.device.deliver("shellies/shelly1-test/relay/0", "overpower");
        assert!(fx.device.is_off());
        assert!(fx.device.state().overpower());
        assert_eq!(fx.error_logs(), 1);

        fx.device.deliver("shellies/shelly1-test/relay/0", "on");
        assert!(!fx.device.state().overpower());
    }

    #[test]
    fn input_and_longpush() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/input/0", "1");
        fx.device.deliver("shellies/shelly1-test/longpush/0", "0");
        assert_eq!(fx.device.state().input(), Some(true));
        assert_eq!(fx.device.state().long_push(), Some(false));
    }

    #[test]
    fn turn_on_and_off() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.apply_action(Action::TurnOn);
        assert_eq!(
            fx.last_publish(),
            Some(("shellies/shelly1-test/relay/0/command".to_string(), "on".to_string()))
        );
        assert!(fx.device.is_on());

        fx.device.apply_action(Action::TurnOff);
        assert_eq!(fx.last_publish().unwrap().1, "off");
        assert!(fx.device.is_off());
    }

    #[test]
    fn toggle_from_known_state() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/relay/0", "on");
        fx.device.apply_action(Action::Toggle);
        assert_eq!(fx.device.state().power(), Some(PowerState::Off));
        fx.device.apply_action(Action::Toggle);
        assert_eq!(fx.device.state().power(), Some(PowerState::On));
    }

    #[test]
    fn toggle_from_unknown_state_does_nothing() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.apply_action(Action::Toggle);
        assert!(fx.publisher.is_empty());
        assert_eq!(fx.device.state().power(), None);
        assert!(
            fx.sink
                .logs
                .lock()
                .iter()
                .any(|(severity, _)| *severity == Severity::Warning)
        );
    }

    #[test]
    fn power_and_energy() {
        let mut fx = Fixture::model(Model::MeteredRelay, ADDRESS);
        fx.device.deliver("shellies/shelly1-test/relay/0/power", "101.123");
        let power = fx.device.state().current_power().unwrap();
        assert!((power - 101.123).abs() < 1e-9);

        fx.device.deliver("shellies/shelly1-test/relay/0/energy", "30000");
        fx.device.deliver("shellies/shelly1-test/relay/0/energy", "30000");
        assert!((fx.device.state().accumulated_energy() - 1.0).abs() < 1e-9);

        fx.device.apply_action(Action::ResetEnergy);
        assert!(fx.device.state().accumulated_energy().abs() < f64::EPSILON);
    }

    #[test]
    fn plain_relay_has_no_energy_reset() {
        let mut fx = Fixture::model(Model::Relay, ADDRESS);
        fx.device.apply_action(Action::ResetEnergy);
        assert_eq!(fx.error_logs(), 1);
    }
}
