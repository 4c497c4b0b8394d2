// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! `aircon_bridge` - control an air conditioner from LINE chat messages.
//!
//! The bridge receives LINE webhook requests, interprets short Japanese
//! command words, writes the desired state of an air conditioner to its
//! AWS IoT device shadow, reads room readings from a DynamoDB table, and
//! replies through the LINE Messaging API.
//!
//! # Commands
//!
//! | Message | Effect |
//! |---------|--------|
//! | `オン` / `オフ` | Power on / off |
//! | `冷房` / `ドライ` / `暖房` | Cooling / dry / heating mode |
//! | `温度` | Temperature menu (20℃..30℃) |
//! | `20℃`..`30℃` | Set the target temperature |
//! | `室内環境` | Room temperature, humidity and pressure |
//! | anything else | Status summary and command menu |
//!
//! # Quick Start
//!
//! ```no_run
//! use aircon_bridge::aws::{Credentials, ShadowClient, Signer, TableClient};
//! use aircon_bridge::{AirconClient, Interpreter, RoomSensor};
//!
//! #[tokio::main]
//! async fn main() -> aircon_bridge::Result<()> {
//!     let credentials = Credentials::new("AKID", "secret");
//!
//!     let shadow = ShadowClient::new(
//!         "https://data-ats.iot.ap-northeast-1.amazonaws.com",
//!         "aircon",
//!         Signer::new(credentials.clone(), "ap-northeast-1", "iotdata"),
//!     )?;
//!     let table = TableClient::new(
//!         "https://dynamodb.ap-northeast-1.amazonaws.com",
//!         Signer::new(credentials, "ap-northeast-1", "dynamodb"),
//!     )?;
//!
//!     let aircon = AirconClient::connect(shadow).await?;
//!     let sensor = RoomSensor::new(table, "environment", "location", "living");
//!     let interpreter = Interpreter::new(aircon, sensor);
//!
//!     let reply = interpreter.respond("25℃").await?;
//!     assert_eq!(reply.text, "25℃にしました。");
//!     Ok(())
//! }
//! ```
//!
//! # Server
//!
//! The `aircon-bridge` binary reads a [`Config`] from the environment and
//! runs [`server::serve`].

pub mod aws;
pub mod config;
pub mod device;
pub mod environment;
pub mod error;
pub mod interpreter;
pub mod line;
pub mod server;
pub mod state;
pub mod types;

pub use config::Config;
pub use device::AirconClient;
pub use environment::{EnvironmentReading, RoomSensor};
pub use error::{ConfigError, Error, ParseError, RemoteError, Result, WebhookError};
pub use interpreter::{Intent, Interpreter, QuickReplyOption, ReplyMessage};
pub use line::LineClient;
pub use server::{AppState, create_router, handle_webhook};
pub use state::{DesiredChange, DeviceState};
pub use types::{OperatingMode, PowerState, TargetTemperature};
