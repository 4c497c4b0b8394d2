// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command interpreter.
//!
//! Maps the text of a chat message to an [`Intent`], performs the matching
//! action on the air conditioner or the room sensor, and builds the
//! [`ReplyMessage`].
//!
//! | Message | Action | Reply |
//! |---------|--------|-------|
//! | `オン` / `オフ` | power on / off | fixed confirmation |
//! | `冷房` / `ドライ` / `暖房` | set mode | fixed confirmation |
//! | `温度` | none | prompt + 20℃..30℃ menu |
//! | `20℃`..`30℃` | set temperature | `"<N>℃にしました。"` (re-read value) |
//! | `室内環境` | read sensor | temperature, humidity, pressure |
//! | anything else | read shadow + sensor | status summary + command menu |

mod intent;
mod reply;

pub use intent::{
    ASK_TEMPERATURE_WORD, CONTROL_COMMANDS, ControlCommand, DEGREE_SIGN, Intent,
    SHOW_ENVIRONMENT_WORD, menu_words, parse_temperature,
};
pub use reply::{QuickReplyOption, ReplyMessage, TEMPERATURE_PROMPT};

use crate::device::AirconClient;
use crate::environment::RoomSensor;
use crate::error::Error;

/// Turns chat messages into device actions and replies.
#[derive(Debug, Clone)]
pub struct Interpreter {
    aircon: AirconClient,
    sensor: RoomSensor,
}

impl Interpreter {
    /// Creates an interpreter over an air conditioner and a room sensor.
    #[must_use]
    pub fn new(aircon: AirconClient, sensor: RoomSensor) -> Self {
        Self { aircon, sensor }
    }

    /// Handles one message and returns the reply.
    ///
    /// # Errors
    ///
    /// Returns `Error::RemoteRead` or `Error::RemoteWrite` if the shadow or
    /// the sensor table cannot be reached. No reply is produced in that
    /// case.
    pub async fn respond(&self, text: &str) -> Result<ReplyMessage, Error> {
        let intent = Intent::classify(text);
        tracing::info!(?intent, "Handling message");
        self.execute(intent).await
    }

    /// Performs an already classified intent.
    ///
    /// # Errors
    ///
    /// See [`Interpreter::respond`].
    pub async fn execute(&self, intent: Intent) -> Result<ReplyMessage, Error> {
        match intent {
            Intent::PowerOn => self.aircon.power_on().await?,
            Intent::PowerOff => self.aircon.power_off().await?,
            Intent::SetModeCool | Intent::SetModeDry | Intent::SetModeHeat => {
                if let Some(mode) = intent.mode() {
                    self.aircon.set_mode(mode).await?;
                }
            }
            Intent::AskTemperature => return Ok(ReplyMessage::temperature_menu()),
            Intent::SetTemperature(target) => {
                self.aircon
                    .set_temperature(i64::from(target.value()))
                    .await?;
                let applied = self.aircon.temperature().await?;
                return Ok(ReplyMessage::temperature_set(applied));
            }
            Intent::ShowEnvironment => {
                let reading = self.sensor.reading().await?;
                return Ok(ReplyMessage::environment(&reading));
            }
            Intent::ShowStatus => {
                let state = self.aircon.refresh().await?;
                let room = self.sensor.temperature().await?;
                return Ok(ReplyMessage::status(&state, room));
            }
        }

        let confirmation = intent
            .control_command()
            .map(|command| command.confirmation)
            .unwrap_or_default();
        Ok(ReplyMessage::text(confirmation))
    }
}
