// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Intent classification of chat messages.
//!
//! Classification is ordered and the first match wins:
//!
//! 1. exact control word ([`CONTROL_COMMANDS`])
//! 2. exact [`ASK_TEMPERATURE_WORD`]
//! 3. a whole-message temperature such as `"25℃"` (20-30 only)
//! 4. exact [`SHOW_ENVIRONMENT_WORD`]
//! 5. anything else is [`Intent::ShowStatus`]

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{OperatingMode, TargetTemperature};

/// Word that asks for the temperature menu.
pub const ASK_TEMPERATURE_WORD: &str = "温度";

/// Word that asks for the room environment.
pub const SHOW_ENVIRONMENT_WORD: &str = "室内環境";

/// Degree sign appended to temperatures in messages.
pub const DEGREE_SIGN: &str = "℃";

static SET_TEMPERATURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(2[0-9]|30)℃$").unwrap_or_else(|e| panic!("invalid temperature pattern: {e}"))
});

/// What a chat message asks the bridge to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// Turn the air conditioner on.
    PowerOn,
    /// Turn the air conditioner off.
    PowerOff,
    /// Switch to cooling.
    SetModeCool,
    /// Switch to dehumidifying.
    SetModeDry,
    /// Switch to heating.
    SetModeHeat,
    /// Offer the temperature menu.
    AskTemperature,
    /// Set the target temperature.
    SetTemperature(TargetTemperature),
    /// Report the room environment.
    ShowEnvironment,
    /// Report the current settings and offer the command menu.
    ShowStatus,
}

/// A control word, the intent it triggers and its confirmation reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlCommand {
    /// Exact message text.
    pub word: &'static str,
    /// Intent triggered by the word.
    pub intent: Intent,
    /// Reply sent once the change has been pushed.
    pub confirmation: &'static str,
}

/// Control vocabulary, in menu order.
pub const CONTROL_COMMANDS: [ControlCommand; 5] = [
    ControlCommand {
        word: "オン",
        intent: Intent::PowerOn,
        confirmation: "電源をオンにしました。",
    },
    ControlCommand {
        word: "オフ",
        intent: Intent::PowerOff,
        confirmation: "電源をオフにしました。",
    },
    ControlCommand {
        word: "冷房",
        intent: Intent::SetModeCool,
        confirmation: "冷房にしました。",
    },
    ControlCommand {
        word: "ドライ",
        intent: Intent::SetModeDry,
        confirmation: "ドライにしました。",
    },
    ControlCommand {
        word: "暖房",
        intent: Intent::SetModeHeat,
        confirmation: "暖房にしました。",
    },
];

impl Intent {
    /// Classifies a message.
    ///
    /// # Examples
    ///
    /// ```
    /// use aircon_bridge::interpreter::Intent;
    ///
    /// assert_eq!(Intent::classify("オン"), Intent::PowerOn);
    /// assert!(matches!(Intent::classify("25℃"), Intent::SetTemperature(t) if t.value() == 25));
    /// assert_eq!(Intent::classify("31℃"), Intent::ShowStatus);
    /// ```
    #[must_use]
    pub fn classify(text: &str) -> Self {
        if let Some(command) = CONTROL_COMMANDS.iter().find(|c| c.word == text) {
            return command.intent;
        }
        if text == ASK_TEMPERATURE_WORD {
            return Self::AskTemperature;
        }
        if let Some(target) = parse_temperature(text) {
            return Self::SetTemperature(target);
        }
        if text == SHOW_ENVIRONMENT_WORD {
            return Self::ShowEnvironment;
        }
        Self::ShowStatus
    }

    /// Returns the mode this intent selects, if it is a mode change.
    #[must_use]
    pub const fn mode(&self) -> Option<OperatingMode> {
        match self {
            Self::SetModeCool => Some(OperatingMode::Cool),
            Self::SetModeDry => Some(OperatingMode::Dry),
            Self::SetModeHeat => Some(OperatingMode::Heat),
            _ => None,
        }
    }

    /// Returns the control-table entry for this intent, if any.
    #[must_use]
    pub fn control_command(&self) -> Option<&'static ControlCommand> {
        CONTROL_COMMANDS.iter().find(|c| c.intent == *self)
    }
}

/// Parses a whole message of the form `"NN℃"` with NN in 20-30.
#[must_use]
pub fn parse_temperature(text: &str) -> Option<TargetTemperature> {
    let captures = SET_TEMPERATURE.captures(text)?;
    let degrees = captures.get(1)?.as_str().parse::<i64>().ok()?;
    TargetTemperature::new(degrees)
}

/// Words offered by the status menu, in order.
pub fn menu_words() -> impl Iterator<Item = &'static str> {
    CONTROL_COMMANDS
        .iter()
        .map(|c| c.word)
        .chain([ASK_TEMPERATURE_WORD, SHOW_ENVIRONMENT_WORD])
}
