// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reply messages and their templates.

use crate::environment::EnvironmentReading;
use crate::state::DeviceState;
use crate::types::TargetTemperature;

use super::intent::{DEGREE_SIGN, menu_words};

/// Prompt shown above the temperature menu.
pub const TEMPERATURE_PROMPT: &str = "何度にしますか？";

/// One quick-reply button: the label shown and the text sent when tapped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickReplyOption {
    /// Button label.
    pub label: String,
    /// Message text sent back when the button is tapped.
    pub value: String,
}

impl QuickReplyOption {
    /// Creates an option whose label and value are the same text.
    #[must_use]
    pub fn echo(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            label: text.clone(),
            value: text,
        }
    }
}

/// A reply to one chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyMessage {
    /// Message text.
    pub text: String,
    /// Quick-reply menu, possibly empty.
    pub quick_reply: Vec<QuickReplyOption>,
}

impl ReplyMessage {
    /// Creates a plain text reply without a menu.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            quick_reply: Vec::new(),
        }
    }

    /// Creates a text reply with a quick-reply menu.
    #[must_use]
    pub fn with_menu(text: impl Into<String>, quick_reply: Vec<QuickReplyOption>) -> Self {
        Self {
            text: text.into(),
            quick_reply,
        }
    }

    /// Reply offering every target temperature from 20 to 30 °C.
    #[must_use]
    pub fn temperature_menu() -> Self {
        let options = TargetTemperature::all()
            .map(|t| QuickReplyOption::echo(format!("{t}{DEGREE_SIGN}")))
            .collect();
        Self::with_menu(TEMPERATURE_PROMPT, options)
    }

    /// Reply confirming the applied target temperature.
    #[must_use]
    pub fn temperature_set(applied: TargetTemperature) -> Self {
        Self::text(format!("{applied}{DEGREE_SIGN}にしました。"))
    }

    /// Reply describing the room environment.
    #[must_use]
    pub fn environment(reading: &EnvironmentReading) -> Self {
        Self::text(format!(
            "室内環境は\n温度：{:.1}℃\n湿度：{:.1}%\n気圧：{:.1}hPa\nです。",
            reading.temperature, reading.humidity, reading.pressure
        ))
    }

    /// Reply summarizing the settings and offering every top-level command.
    #[must_use]
    pub fn status(state: &DeviceState, room_temperature: f64) -> Self {
        let text = format!(
            "エアコンの設定は\n電源：{}\nモード：{}\n温度：{}℃\nです。\n室温は{:.1}℃です。\nご用件は何ですか？",
            state.power(),
            state.mode(),
            state.target_temperature(),
            room_temperature
        );
        Self::with_menu(text, menu_words().map(QuickReplyOption::echo).collect())
    }

    /// Returns `true` if the reply carries a quick-reply menu.
    #[must_use]
    pub fn has_menu(&self) -> bool {
        !self.quick_reply.is_empty()
    }
}
