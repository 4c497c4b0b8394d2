// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device shadow client for the IoT data plane.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde_json::Value;

use crate::error::{ConfigError, ParseError, RemoteError};

use super::{Signer, build_http_client, parse_endpoint, send_signed};

/// Client for the classic (unnamed) shadow of one thing.
///
/// # Examples
///
/// ```no_run
/// use aircon_bridge::aws::{Credentials, ShadowClient, Signer};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Signer::new(Credentials::new("AKID", "secret"), "ap-northeast-1", "iotdata");
/// let client = ShadowClient::new(
///     "https://data-ats.iot.ap-northeast-1.amazonaws.com",
///     "aircon",
///     signer,
/// )?;
/// let document = client.get().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ShadowClient {
    client: Client,
    signer: Signer,
    shadow_url: Url,
    thing_name: String,
}

impl ShadowClient {
    /// Creates a shadow client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(
        endpoint: &str,
        thing_name: impl Into<String>,
        signer: Signer,
    ) -> Result<Self, crate::Error> {
        Self::with_timeout(endpoint, thing_name, signer, super::DEFAULT_TIMEOUT)
    }

    /// Creates a shadow client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL, the thing name is
    /// empty, or the HTTP client cannot be created.
    pub fn with_timeout(
        endpoint: &str,
        thing_name: impl Into<String>,
        signer: Signer,
        timeout: Duration,
    ) -> Result<Self, crate::Error> {
        let thing_name = thing_name.into();
        if thing_name.is_empty() {
            return Err(ConfigError::Missing("THING_NAME").into());
        }

        let base = parse_endpoint("IOT_ENDPOINT", endpoint)?;
        let shadow_url = base
            .join(&format!(
                "things/{}/shadow",
                urlencoding::encode(&thing_name)
            ))
            .map_err(|e| ConfigError::Invalid {
                name: "THING_NAME",
                message: e.to_string(),
            })?;

        let client = build_http_client(timeout).map_err(crate::Error::RemoteRead)?;

        Ok(Self {
            client,
            signer,
            shadow_url,
            thing_name,
        })
    }

    /// Returns the thing name.
    #[must_use]
    pub fn thing_name(&self) -> &str {
        &self.thing_name
    }

    /// Returns the shadow URL.
    #[must_use]
    pub fn shadow_url(&self) -> &Url {
        &self.shadow_url
    }

    /// Fetches the full shadow document.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails, the service answers with
    /// an error status, or the body is not JSON.
    pub async fn get(&self) -> Result<Value, RemoteError> {
        let body = send_signed(
            &self.client,
            &self.signer,
            Method::GET,
            &self.shadow_url,
            &[],
            Vec::new(),
        )
        .await?;

        serde_json::from_str(&body).map_err(|e| RemoteError::Parse(ParseError::Json(e)))
    }

    /// Sends a partial shadow document to be merged into the shadow.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails or the service answers
    /// with an error status.
    pub async fn update(&self, patch: &Value) -> Result<(), RemoteError> {
        let body = serde_json::to_vec(patch).map_err(|e| RemoteError::Parse(ParseError::Json(e)))?;

        send_signed(
            &self.client,
            &self.signer,
            Method::POST,
            &self.shadow_url,
            &[("content-type", "application/json")],
            body,
        )
        .await?;

        Ok(())
    }
}
