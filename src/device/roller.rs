// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Roller shutters.
//!
//! Position maps onto the brightness-style actions: 0 is closed, 100 is
//! fully open, and the shutter counts as "on" whenever it is not closed.

use super::base::Base;
use super::relay::{MeteredRelay, toggle};
use super::{Action, DeviceContext, Message, Outcome, Variant};
use crate::command::{Command, RollerCommand};
use crate::error::Result;
use crate::state::StateChange;
use crate::telemetry::parse_number;
use crate::topic::{Endpoint, ROLLER, TopicSet};
use crate::types::{Percent, PowerState, RollerState};

/// Shelly 2.5 in roller mode.
pub(crate) struct Roller;

impl Roller {
    fn update_position(ctx: &mut DeviceContext, position: Percent) -> bool {
        let power = ctx.update(StateChange::Power(PowerState::from(position.is_positive())));
        ctx.update(StateChange::Position(position)) || power
    }

    fn move_to(ctx: &mut DeviceContext, endpoint: &Endpoint, position: Percent) {
        ctx.send(endpoint, &RollerCommand::Position(position));
        Self::update_position(ctx, position);
        ctx.log_sent(&format!("position to {position}"));
    }

    fn run(ctx: &mut DeviceContext, endpoint: &Endpoint, command: RollerCommand) {
        ctx.send(endpoint, &command);
        ctx.log_sent(&command.payload());
    }
}

impl Variant for Roller {
    fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.channel(ROLLER));
        topics.push(endpoint.channel_topic(ROLLER, "pos"));
        topics.push(endpoint.channel_topic(ROLLER, "power"));
        topics.push(endpoint.channel_topic(ROLLER, "energy"));
        topics.push(endpoint.channel("input"));
        Base::temperature_topics(endpoint, topics);
    }

    fn handle_message(&self, ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
        let endpoint = message.endpoint;
        if message.topic == endpoint.channel(ROLLER) {
            let state: RollerState = message.payload.parse()?;
            if ctx.update(StateChange::Roller(state)) {
                ctx.log_received(state.as_str());
            }
        } else if message.topic == endpoint.channel_topic(ROLLER, "pos") {
            let raw = parse_number("position", message.payload)?;
            // -1 until the roller is calibrated
            if raw >= 0.0 {
                let position = Percent::from_f64(raw);
                if Self::update_position(ctx, position) {
                    ctx.log_received(&format!("position {position}"));
                }
            }
        } else {
            return MeteredRelay(ROLLER).handle_message(ctx, message);
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
            Action::TurnOn => Self::run(ctx, endpoint, RollerCommand::Open),
            Action::TurnOff => Self::run(ctx, endpoint, RollerCommand::Close),
            Action::Toggle => {
                return toggle(ctx, |ctx, power| {
                    let command = if power.is_on() {
                        RollerCommand::Open
                    } else {
                        RollerCommand::Close
                    };
                    Self::run(ctx, endpoint, command);
                    Ok(Outcome::Handled)
                });
            }
            Action::SetBrightness(level) => Self::move_to(ctx, endpoint, Percent::clamped(*level)),
            Action::BrightenBy(delta) => {
                let position = ctx.state.position().unwrap_or(Percent::MIN).offset(*delta);
                Self::move_to(ctx, endpoint, position);
            }
            Action::DimBy(delta) => {
                let position = ctx
                    .state
                    .position()
                    .unwrap_or(Percent::MIN)
                    .offset(delta.saturating_neg());
                Self::move_to(ctx, endpoint, position);
            }
            Action::SetColorLevels(_) => return Ok(Outcome::Unhandled),
            _ => return MeteredRelay(ROLLER).handle_action(ctx, endpoint, action),
        }
        Ok(Outcome::Handled)
    }
}
