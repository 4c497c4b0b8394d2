// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Runtime configuration.
//!
//! Every setting is read from an environment variable and can be
//! overridden on the command line.

use std::fmt;
use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use crate::aws::{self, Credentials};
use crate::error::ConfigError;
use crate::line::DEFAULT_REPLY_ENDPOINT;

/// Bridge configuration.
#[derive(Parser, Clone)]
#[command(name = "aircon-bridge")]
#[command(about = "Control an air conditioner shadow from LINE messages", long_about = None)]
pub struct Config {
    /// AWS region of the device shadow and the environment table
    #[arg(long, env = "REGION")]
    pub region: String,

    /// Shadow thing name of the air conditioner
    #[arg(long, env = "THING_NAME")]
    pub thing_name: String,

    /// IoT data-plane endpoint (defaults to the regional ATS endpoint)
    #[arg(long, env = "IOT_ENDPOINT")]
    pub iot_endpoint: Option<String>,

    /// DynamoDB endpoint (defaults to the regional endpoint)
    #[arg(long, env = "DYNAMODB_ENDPOINT")]
    pub dynamodb_endpoint: Option<String>,

    /// Table holding environment readings
    #[arg(long, env = "TABLE_NAME")]
    pub table_name: String,

    /// Partition key attribute of the environment table
    #[arg(long, env = "PARTITION_KEY")]
    pub partition_key: String,

    /// Partition key value of the room to read
    #[arg(long, env = "PARTITION_NAME")]
    pub partition_name: String,

    /// Channel secret used to verify webhook signatures
    #[arg(long, env = "LINE_CHANNEL_SECRET", hide_env_values = true)]
    pub channel_secret: String,

    /// Channel access token used to post replies
    #[arg(long, env = "LINE_CHANNEL_ACCESS_TOKEN", hide_env_values = true)]
    pub channel_access_token: String,

    /// Reply API endpoint
    #[arg(long, env = "LINE_REPLY_ENDPOINT", default_value = DEFAULT_REPLY_ENDPOINT)]
    pub reply_endpoint: String,

    /// AWS access key id
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    pub aws_access_key_id: String,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    pub aws_secret_access_key: String,

    /// AWS session token for temporary credentials
    #[arg(long, env = "AWS_SESSION_TOKEN", hide_env_values = true)]
    pub aws_session_token: Option<String>,

    /// Address the webhook server listens on
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0:8080")]
    pub bind_address: SocketAddr,

    /// Timeout in seconds for every outbound request
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = 10)]
    pub request_timeout_secs: u64,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl Config {
    /// Checks that every required setting is non-empty.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` naming the first empty setting, or
    /// `ConfigError::Invalid` for a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("REGION", &self.region),
            ("THING_NAME", &self.thing_name),
            ("TABLE_NAME", &self.table_name),
            ("PARTITION_KEY", &self.partition_key),
            ("PARTITION_NAME", &self.partition_name),
            ("LINE_CHANNEL_SECRET", &self.channel_secret),
            ("LINE_CHANNEL_ACCESS_TOKEN", &self.channel_access_token),
            ("AWS_ACCESS_KEY_ID", &self.aws_access_key_id),
            ("AWS_SECRET_ACCESS_KEY", &self.aws_secret_access_key),
        ];
        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Missing(*name));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                name: "REQUEST_TIMEOUT_SECS",
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }

    /// Returns the IoT data-plane endpoint to use.
    #[must_use]
    pub fn iot_endpoint(&self) -> String {
        self.iot_endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| aws::default_iot_endpoint(&self.region))
    }

    /// Returns the DynamoDB endpoint to use.
    #[must_use]
    pub fn dynamodb_endpoint(&self) -> String {
        self.dynamodb_endpoint
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| aws::default_dynamodb_endpoint(&self.region))
    }

    /// Returns the signing credentials.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        let credentials = Credentials::new(&self.aws_access_key_id, &self.aws_secret_access_key);
        match self.aws_session_token.as_deref().filter(|t| !t.is_empty()) {
            Some(token) => credentials.with_session_token(token),
            None => credentials,
        }
    }

    /// Returns the outbound request timeout.
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the default log filter for the configured verbosity.
    #[must_use]
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "aircon_bridge=info",
            1 => "aircon_bridge=debug",
            _ => "aircon_bridge=trace,reqwest=debug",
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("region", &self.region)
            .field("thing_name", &self.thing_name)
            .field("iot_endpoint", &self.iot_endpoint())
            .field("dynamodb_endpoint", &self.dynamodb_endpoint())
            .field("table_name", &self.table_name)
            .field("partition_key", &self.partition_key)
            .field("partition_name", &self.partition_name)
            .field("reply_endpoint", &self.reply_endpoint)
            .field("aws_access_key_id", &self.aws_access_key_id)
            .field("bind_address", &self.bind_address)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish_non_exhaustive()
    }
}
