// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Dimmable lights: Dimmer, Bulb, RGBW2 (color and white) and Duo.
//!
//! All lights report a JSON `status` object and accept one combined `set`
//! command. They differ in segment, mode, which levels the status carries
//! and how the `set` payload is built. Everything else is shared here and
//! falls back to [`MeteredRelay`] on the light's own segment.

use super::relay::{MeteredRelay, toggle};
use super::{Action, ColorLevels, DeviceContext, Message, Outcome, Variant};
use crate::command::{BrightnessSet, BulbSet, ColorSet, SwitchCommand};
use crate::error::Result;
use crate::normalize::Measurement;
use crate::state::StateChange;
use crate::telemetry::{LightStatus, clamp_u8, clamp_u16, parse_json};
use crate::topic::{COLOR, Endpoint, LIGHT, TopicSet, WHITE};
use crate::types::{LightMode, Percent, PowerState};

/// Full-scale white level on color lights.
const COLOR_WHITE_MAX: u8 = 255;
/// Full-scale white level on the Duo.
const DUO_WHITE_MAX: u8 = 100;
/// Duo white temperature range in Kelvin.
const DUO_KELVIN_MIN: u16 = 2700;
const DUO_KELVIN_MAX: u16 = 6500;

/// Model-specific parts of a light.
trait Light {
    /// Channel segment (`light`, `color` or `white`).
    const SEGMENT: &'static str;
    /// Mode the channel must be in.
    const MODE: LightMode;
    /// Whether a status without a mode is rejected.
    const MODE_REQUIRED: bool;
    /// Whether an on/off token also sets power right away.
    const TOKEN_SETS_POWER: bool = false;

    /// Adds the topics after the status topic.
    fn extra_topics(endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.channel_topic(Self::SEGMENT, "power"));
        topics.push(endpoint.channel_topic(Self::SEGMENT, "energy"));
    }

    /// Reads the brightness level from a status.
    fn level(status: &LightStatus) -> Option<Percent> {
        status.brightness_level()
    }

    /// Stores the model's extra status fields.
    fn apply_channels(_ctx: &mut DeviceContext, _status: &LightStatus) {}

    /// Publishes the combined `set` command built from current state.
    fn set(ctx: &DeviceContext, endpoint: &Endpoint);

    /// Whether on/off goes out as a bare command token.
    fn uses_token(ctx: &DeviceContext) -> bool {
        ctx.config.restore_brightness
    }

    /// Applies color levels, or declines.
    fn set_color_levels(
        _ctx: &mut DeviceContext,
        _endpoint: &Endpoint,
        _levels: &ColorLevels,
    ) -> Outcome {
        Outcome::Unhandled
    }
}

fn subscriptions<L: Light>(endpoint: &Endpoint, topics: &mut TopicSet) {
    topics.push(endpoint.channel_topic(L::SEGMENT, "status"));
    L::extra_topics(endpoint, topics);
}

fn handle_message<L: Light>(ctx: &mut DeviceContext, message: &Message<'_>) -> Result<Outcome> {
    if message.topic != message.endpoint.channel_topic(L::SEGMENT, "status") {
        return MeteredRelay(L::SEGMENT).handle_message(ctx, message);
    }

    let status: LightStatus = parse_json(message.payload)?;
    status.check_mode(L::MODE, L::MODE_REQUIRED)?;

    let changed = match (status.ison, L::level(&status)) {
        (true, Some(level)) => ctx.apply_brightness(level),
        (true, None) => ctx.update(StateChange::Power(PowerState::On)),
        (false, _) => ctx.apply_brightness(Percent::MIN),
    };
    if changed {
        ctx.log_received(&describe(ctx));
    }
    L::apply_channels(ctx, &status);

    match status.overpower {
        Some(true) => ctx.update_fault(StateChange::Overpower(true), "was overloaded!"),
        Some(false) => {
            ctx.update(StateChange::Overpower(false));
        }
        None => {}
    }
    if let Some(watts) = status.power {
        ctx.update(StateChange::CurrentPower(Measurement::new(
            watts,
            format!("{watts} W"),
        )));
    }
    Ok(Outcome::Handled)
}

fn describe(ctx: &DeviceContext) -> String {
    match ctx.state.brightness() {
        Some(level) if ctx.state.is_on() => format!("on, brightness {level}"),
        _ if ctx.state.is_on() => "on".to_string(),
        _ => "off".to_string(),
    }
}

fn handle_action<L: Light>(
    ctx: &mut DeviceContext,
    endpoint: &Endpoint,
    action: &Action,
) -> Result<Outcome> {
    match action {
        Action::TurnOn => switch::<L>(ctx, endpoint, PowerState::On),
        Action::TurnOff => switch::<L>(ctx, endpoint, PowerState::Off),
        Action::Toggle => {
            return toggle(ctx, |ctx, power| {
                switch::<L>(ctx, endpoint, power);
                Ok(Outcome::Handled)
            });
        }
        Action::SetBrightness(level) => dim_to::<L>(ctx, endpoint, Percent::clamped(*level)),
        Action::BrightenBy(delta) => {
            let level = ctx.brightness().offset(*delta);
            dim_to::<L>(ctx, endpoint, level);
        }
        Action::DimBy(delta) => {
            let level = ctx.brightness().offset(delta.saturating_neg());
            dim_to::<L>(ctx, endpoint, level);
        }
        Action::SetColorLevels(levels) => return Ok(L::set_color_levels(ctx, endpoint, levels)),
        _ => return MeteredRelay(L::SEGMENT).handle_action(ctx, endpoint, action),
    }
    Ok(Outcome::Handled)
}

fn switch<L: Light>(ctx: &mut DeviceContext, endpoint: &Endpoint, power: PowerState) {
    if L::uses_token(ctx) {
        // Brightness is restored by the device and arrives with the status echo
        ctx.send(endpoint, &SwitchCommand::new(L::SEGMENT, power));
        if L::TOKEN_SETS_POWER {
            ctx.update(StateChange::Power(power));
        }
    } else {
        let level = if power.is_on() {
            Percent::MAX
        } else {
            Percent::MIN
        };
        ctx.apply_brightness(level);
        L::set(ctx, endpoint);
    }
    ctx.log_sent(power.as_str());
}

fn dim_to<L: Light>(ctx: &mut DeviceContext, endpoint: &Endpoint, level: Percent) {
    ctx.apply_brightness(level);
    L::set(ctx, endpoint);
    ctx.log_sent(&format!("brightness to {level}"));
}

fn set_rgb(ctx: &mut DeviceContext, levels: &ColorLevels) {
    let color = ctx
        .state
        .color()
        .unwrap_or_default()
        .with_levels(levels.red, levels.green, levels.blue);
    ctx.update(StateChange::Color(color));
    if let Some(white) = levels.white {
        ctx.update(StateChange::WhiteLevel(clamp_u8(white, COLOR_WHITE_MAX)));
    }
}

fn apply_rgb(ctx: &mut DeviceContext, status: &LightStatus) {
    let current = ctx.state.color().unwrap_or_default();
    if let Some(color) = status.color_over(current) {
        ctx.update(StateChange::Color(color));
    }
    if let Some(white) = status.white_level(COLOR_WHITE_MAX) {
        ctx.update(StateChange::WhiteLevel(white));
    }
}

macro_rules! light_variant {
    ($($light:ident),+ $(,)?) => {$(
        impl Variant for $light {
            fn subscriptions(&self, endpoint: &Endpoint, topics: &mut TopicSet) {
                subscriptions::<Self>(endpoint, topics);
            }

            fn handle_message(
                &self,
                ctx: &mut DeviceContext,
                message: &Message<'_>,
            ) -> Result<Outcome> {
                handle_message::<Self>(ctx, message)
            }

            fn handle_action(
                &self,
                ctx: &mut DeviceContext,
                endpoint: &Endpoint,
                action: &Action,
            ) -> Result<Outcome> {
                handle_action::<Self>(ctx, endpoint, action)
            }
        }
    )+};
}

light_variant!(Dimmer, Bulb, RgbwColor, RgbwWhite, Duo);

/// Shelly Dimmer.
pub(crate) struct Dimmer;

impl Light for Dimmer {
    const SEGMENT: &'static str = LIGHT;
    const MODE: LightMode = LightMode::White;
    const MODE_REQUIRED: bool = false;

    fn extra_topics(endpoint: &Endpoint, topics: &mut TopicSet) {
        topics.push(endpoint.channel_topic(LIGHT, "power"));
        topics.push(endpoint.channel_topic(LIGHT, "energy"));
        topics.push(endpoint.channel("input"));
        topics.push(endpoint.channel("longpush"));
        topics.push(endpoint.device("temperature"));
        topics.push(endpoint.device("overtemperature"));
        topics.push(endpoint.device("overload"));
        topics.push(endpoint.device("loaderror"));
    }

    fn set(ctx: &DeviceContext, endpoint: &Endpoint) {
        ctx.send(endpoint, &BrightnessSet::new(LIGHT, ctx.turn(), ctx.brightness()));
    }
}

/// Shelly Bulb, always driven in color mode.
pub(crate) struct Bulb;

impl Light for Bulb {
    const SEGMENT: &'static str = LIGHT;
    const MODE: LightMode = LightMode::Color;
    const MODE_REQUIRED: bool = false;

    fn level(status: &LightStatus) -> Option<Percent> {
        status.gain_level()
    }

    fn apply_channels(ctx: &mut DeviceContext, status: &LightStatus) {
        apply_rgb(ctx, status);
    }

    fn set(ctx: &DeviceContext, endpoint: &Endpoint) {
        let color = ctx.state.color().unwrap_or_default();
        let white = ctx.state.white_level().unwrap_or(0);
        ctx.send(
            endpoint,
            &BulbSet::new(ctx.turn(), color, white, ctx.brightness()),
        );
    }

    fn set_color_levels(
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        levels: &ColorLevels,
    ) -> Outcome {
        set_rgb(ctx, levels);
        Self::set(ctx, endpoint);
        ctx.log_sent("color levels");
        Outcome::Handled
    }
}

/// Shelly RGBW2 in color mode.
pub(crate) struct RgbwColor;

impl Light for RgbwColor {
    const SEGMENT: &'static str = COLOR;
    const MODE: LightMode = LightMode::Color;
    const MODE_REQUIRED: bool = true;

    fn level(status: &LightStatus) -> Option<Percent> {
        status.gain_level()
    }

    fn apply_channels(ctx: &mut DeviceContext, status: &LightStatus) {
        apply_rgb(ctx, status);
    }

    fn set(ctx: &DeviceContext, endpoint: &Endpoint) {
        let color = ctx.state.color().unwrap_or_default();
        let white = ctx.state.white_level().unwrap_or(0);
        ctx.send(
            endpoint,
            &ColorSet::new(ctx.turn(), color, white, ctx.brightness()),
        );
    }

    fn set_color_levels(
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        levels: &ColorLevels,
    ) -> Outcome {
        set_rgb(ctx, levels);
        Self::set(ctx, endpoint);
        ctx.log_sent("color levels");
        Outcome::Handled
    }
}

/// One white channel of an RGBW2.
pub(crate) struct RgbwWhite;

impl Light for RgbwWhite {
    const SEGMENT: &'static str = WHITE;
    const MODE: LightMode = LightMode::White;
    const MODE_REQUIRED: bool = true;

    fn set(ctx: &DeviceContext, endpoint: &Endpoint) {
        ctx.send(endpoint, &BrightnessSet::new(WHITE, ctx.turn(), ctx.brightness()));
    }
}

/// Shelly Duo.
pub(crate) struct Duo;

impl Light for Duo {
    const SEGMENT: &'static str = LIGHT;
    const MODE: LightMode = LightMode::White;
    const MODE_REQUIRED: bool = false;
    const TOKEN_SETS_POWER: bool = true;

    fn extra_topics(_endpoint: &Endpoint, _topics: &mut TopicSet) {}

    fn apply_channels(ctx: &mut DeviceContext, status: &LightStatus) {
        if let Some(white) = status.white_level(DUO_WHITE_MAX) {
            ctx.update(StateChange::WhiteLevel(white));
        }
        if let Some(kelvin) = status.temperature_kelvin(DUO_KELVIN_MIN, DUO_KELVIN_MAX) {
            ctx.update(StateChange::WhiteTemperature(kelvin));
        }
    }

    fn set(ctx: &DeviceContext, endpoint: &Endpoint) {
        let brightness = ctx.brightness();
        let turn = PowerState::from(brightness.is_positive());
        ctx.send(endpoint, &BrightnessSet::new(LIGHT, turn, brightness));
    }

    fn uses_token(_ctx: &DeviceContext) -> bool {
        true
    }

    fn set_color_levels(
        ctx: &mut DeviceContext,
        endpoint: &Endpoint,
        levels: &ColorLevels,
    ) -> Outcome {
        if let Some(white) = levels.white {
            ctx.update(StateChange::WhiteLevel(clamp_u8(white, DUO_WHITE_MAX)));
        }
        if let Some(kelvin) = levels.white_temperature {
            ctx.update(StateChange::WhiteTemperature(clamp_u16(
                kelvin,
                DUO_KELVIN_MIN,
                DUO_KELVIN_MAX,
            )));
        }
        // The Duo set payload carries brightness only; white and temp stay local
        Self::set(ctx, endpoint);
        ctx.log_sent("white levels");
        Outcome::Handled
    }
}

#[cfg(test)]
mod tests {
    use crate::device::testing::Fixture;
    use crate::device::{Action, ColorLevels, Model};
    use crate::event::Severity;
    use crate::manager::DeviceConfig;
    use crate::types::{PowerState, RgbColor};

    const BULB: &str = "shellies/shelly-bulb-test";
    const DIMMER: &str = "shellies/shellydimmer-test";
    const RGBW: &str = "shellies/shellyrgbw2-test";
    const DUO: &str = "shellies/shellybulbduo-test";

    fn brightness(fx: &Fixture) -> Option<u8> {
        fx.device.state().brightness().map(|b| b.value())
    }

    #[test]
    fn bulb_subscriptions() {
        let fx = Fixture::model(Model::Bulb, BULB);
        assert_eq!(
            fx.device.subscriptions(),
            vec![
                "shellies/announce",
                "shellies/shelly-bulb-test/online",
                "shellies/shelly-bulb-test/light/0/status",
                "shellies/shelly-bulb-test/light/0/power",
                "shellies/shelly-bulb-test/light/0/energy",
            ]
        );
    }

    #[test]
    fn duo_subscribes_to_status_only() {
        let fx = Fixture::model(Model::Duo, DUO);
        assert_eq!(fx.device.subscriptions().len(), 3);
    }

    #[test]
    fn dimmer_subscribes_to_device_flags() {
        let fx = Fixture::model(Model::Dimmer, DIMMER);
        let topics = fx.device.subscriptions();
        assert!(topics.contains(&format!("{DIMMER}/loaderror")));
        assert!(topics.contains(&format!("{DIMMER}/overload")));
        assert!(topics.contains(&format!("{DIMMER}/input/0")));
    }

    #[test]
    fn bulb_turn_on_sends_full_set() {
        let mut fx = Fixture::model(Model::Bulb, BULB);
        fx.device.apply_action(Action::TurnOn);

        let (topic, _) = fx.last_publish().unwrap();
        assert_eq!(topic, "shellies/shelly-bulb-test/light/0/set");
        let json = fx.last_json();
        assert_eq!(json["turn"], "on");
        assert_eq!(json["mode"], "color");
        assert_eq!(json["gain"], 100);
        assert_eq!(json["white"], 0);
        assert!(fx.device.is_on());
        assert_eq!(brightness(&fx), Some(100));
    }

    #[test]
    fn bulb_status_updates_color() {
        let mut fx = Fixture::model(Model::Bulb, BULB);
        fx.device.deliver(
            "shellies/shelly-bulb-test/light/0/status",
            r#"{"ison":true,"mode":"color","red":255,"green":10,"blue":0,"white":20,"gain":60,"power":7.5}"#,
        );
        let state = fx.device.state();
        assert!(state.is_on());
        assert_eq!(brightness(&fx), Some(60));
        assert_eq!(state.color(), Some(RgbColor::new(255, 10, 0)));
        assert_eq!(state.white_level(), Some(20));
        assert!((state.current_power().unwrap() - 7.5).abs() < 1e-9);
    }

    #[test]
    fn status_off_zeroes_brightness() {
        let mut fx = Fixture::model(Model::Dimmer, DIMMER);
        fx.device.deliver(
            "shellies/shellydimmer-test/light/0/status",
            r#"{"ison":true,"brightness":40}"#,
        );
        assert_eq!(brightness(&fx), Some(40));
        fx.device.deliver(
            "shellies/shellydimmer-test/light/0/status",
            r#"{"ison":false,"brightness":40}"#,
        );
        assert!(fx.device.is_off());
        assert_eq!(brightness(&fx), Some(0));
    }

    #[test]
    fn wrong_mode_leaves_state_unchanged() {
        let mut fx = Fixture::model(Model::RgbwWhite, RGBW);
        fx.device.deliver(
            "shellies/shellyrgbw2-test/white/0/status",
            r#"{"ison":true,"mode":"color","brightness":40}"#,
        );
        assert_eq!(fx.device.state().power(), None);
        assert!(fx.sink.changes.lock().is_empty());
        assert_eq!(fx.error_logs(), 1);
    }

    #[test]
    fn rgbw_color_requires_mode() {
        let mut fx = Fixture::model(Model::RgbwColor, RGBW);
        fx.device.deliver(
            "shellies/shellyrgbw2-test/color/0/status",
            r#"{"ison":true,"gain":40}"#,
        );
        assert_eq!(fx.device.state().power(), None);
        assert_eq!(fx.error_logs(), 1);
    }

    #[test]
    fn dimmer_set_brightness() {
        let mut fx = Fixture::model(Model::Dimmer, DIMMER);
        fx.device.apply_action(Action::SetBrightness(140));
        let json = fx.last_json();
        assert_eq!(json["brightness"], 100);
        assert_eq!(json["turn"], "on");

        fx.device.apply_action(Action::SetBrightness(0));
        let json = fx.last_json();
        assert_eq!(json["brightness"], 0);
        assert_eq!(json["turn"], "off");
        assert!(fx.device.is_off());
    }

    #[test]
    fn brighten_and_dim_from_unknown() {
        let mut fx = Fixture::model(Model::RgbwWhite, RGBW);
        fx.device.apply_action(Action::BrightenBy(30));
        assert_eq!(brightness(&fx), Some(30));
        fx.device.apply_action(Action::DimBy(50));
        assert_eq!(brightness(&fx), Some(0));
        assert!(fx.device.is_off());
        assert_eq!(fx.last_publish().unwrap().0, "shellies/shellyrgbw2-test/white/0/set");
    }

    #[test]
    fn restore_brightness_sends_token() {
        let config = DeviceConfig::new(Model::Dimmer, DIMMER).with_restore_brightness(true);
        let mut fx = Fixture::new(config);
        fx.device.apply_action(Action::TurnOn);
        assert_eq!(
            fx.last_publish(),
            Some((
                "shellies/shellydimmer-test/light/0/command".to_string(),
                "on".to_string()
            ))
        );
        assert_eq!(fx.device.state().power(), None);
    }

    #[test]
    fn rgbw_color_levels() {
        let mut fx = Fixture::model(Model::RgbwColor, RGBW);
        fx.device.apply_action(Action::SetColorLevels(ColorLevels {
            red: Some(300),
            green: Some(-5),
            white: Some(12),
            ..ColorLevels::default()
        }));
        let json = fx.last_json();
        assert_eq!(json["red"], 255);
        assert_eq!(json["green"], 0);
        assert_eq!(json["blue"], 0);
        assert_eq!(json["white"], 12);
        assert_eq!(json["turn"], "off");
    }

    #[test]
    fn white_channel_rejects_color_levels() {
        let mut fx = Fixture::model(Model::RgbwWhite, RGBW);
        fx.device
            .apply_action(Action::SetColorLevels(ColorLevels::default()));
        assert!(fx.publisher.is_empty());
        assert_eq!(fx.error_logs(), 1);
    }

    #[test]
    fn duo_status_and_levels() {
        let mut fx = Fixture::model(Model::Duo, DUO);
        fx.device.deliver(
            "shellies/shellybulbduo-test/light/0/status",
            r#"{"ison":true,"brightness":80,"white":150,"temp":2000}"#,
        );
        let state = fx.device.state();
        assert_eq!(state.white_level(), Some(100));
        assert_eq!(state.white_temperature(), Some(2700));

        fx.device.apply_action(Action::SetColorLevels(ColorLevels {
            white_temperature: Some(5000),
            ..ColorLevels::default()
        }));
        assert_eq!(fx.device.state().white_temperature(), Some(5000));
        let json = fx.last_json();
        assert_eq!(json["turn"], "on");
        assert_eq!(json["brightness"], 80);
    }

    #[test]
    fn duo_switches_with_token() {
        let mut fx = Fixture::model(Model::Duo, DUO);
        fx.device.apply_action(Action::TurnOff);
        assert_eq!(
            fx.last_publish(),
            Some((
                "shellies/shellybulbduo-test/light/0/command".to_string(),
                "off".to_string()
            ))
        );
        assert!(fx.device.is_off());
    }

    #[test]
    fn duo_turn_on_sets_power_before_echo() {
        let mut fx = Fixture::model(Model::Duo, DUO);
        fx.device.deliver(
            "shellies/shellybulbduo-test/light/0/status",
            r#"{"ison":false,"mode":"white","brightness":30}"#,
        );
        assert!(fx.device.is_off());

        fx.device.apply_action(Action::TurnOn);
        assert_eq!(
            fx.last_publish(),
            Some((
                "shellies/shellybulbduo-test/light/0/command".to_string(),
                "on".to_string()
            ))
        );
        assert!(fx.device.is_on());
        assert_eq!(fx.device.state().power(), Some(PowerState::On));
    }

    #[test]
    fn toggle_light() {
        let mut fx = Fixture::model(Model::Dimmer, DIMMER);
        fx.device.apply_action(Action::Toggle);
        assert!(fx.publisher.is_empty());
        assert!(
            fx.sink
                .logs
                .lock()
                .iter()
                .any(|(severity, _)| *severity == Severity::Warning)
        );

        fx.device.apply_action(Action::TurnOff);
        fx.device.apply_action(Action::Toggle);
        assert_eq!(fx.device.state().power(), Some(PowerState::On));
    }

    #[test]
    fn light_energy_falls_back_to_metering() {
        let mut fx = Fixture::model(Model::RgbwWhite, RGBW);
        fx.device.deliver("shellies/shellyrgbw2-test/white/0/energy", "60000");
        assert!((fx.device.state().accumulated_energy() - 1.0).abs() < 1e-9);
    }
}
