// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thin AWS clients for the device shadow and the environment table.
//!
//! Both services are reached over plain HTTPS with `reqwest`; requests are
//! authenticated with Signature Version 4 (see [`Signer`]).
//!
//! - [`ShadowClient`]: IoT data plane, `GET`/`POST /things/{thing}/shadow`
//! - [`TableClient`]: DynamoDB JSON protocol, `GetItem`

mod dynamodb;
mod shadow;
mod sigv4;

pub use dynamodb::{TableClient, number_attribute};
pub use shadow::ShadowClient;
pub use sigv4::{Credentials, Signer};

use std::time::Duration;

use reqwest::{Client, Method, Url};

use crate::error::{ConfigError, RemoteError};

/// Default timeout applied to every outbound AWS request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the default IoT data-plane endpoint for a region.
#[must_use]
pub fn default_iot_endpoint(region: &str) -> String {
    format!("https://data-ats.iot.{region}.amazonaws.com")
}

/// Returns the default DynamoDB endpoint for a region.
#[must_use]
pub fn default_dynamodb_endpoint(region: &str) -> String {
    format!("https://dynamodb.{region}.amazonaws.com")
}

/// Parses an endpoint so that relative joins append to its path.
fn parse_endpoint(name: &'static str, endpoint: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
        name,
        message: format!("{endpoint:?}: {e}"),
    })?;
    if url.host_str().is_none() {
        return Err(ConfigError::Invalid {
            name,
            message: format!("{endpoint:?} has no host"),
        });
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn build_http_client(timeout: Duration) -> Result<Client, RemoteError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(RemoteError::Http)
}

/// Sends a signed request and returns the response body.
///
/// Non-success statuses are turned into `RemoteError::Status`.
async fn send_signed(
    client: &Client,
    signer: &Signer,
    method: Method,
    url: &Url,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> Result<String, RemoteError> {
    let auth = signer.sign(method.as_str(), url, headers, &body, chrono::Utc::now())?;

    tracing::debug!(method = %method, url = %url, service = signer.service(), "Sending AWS request");

    let mut request = client.request(method, url.clone());
    for (name, value) in headers.iter().copied() {
        request = request.header(name, value);
    }
    for (name, value) in &auth {
        request = request.header(name.as_str(), value.as_str());
    }

    let response = request
        .body(body)
        .send()
        .await
        .map_err(RemoteError::Http)?;

    let status = response.status();
    let text = response.text().await.map_err(RemoteError::Http)?;

    if !status.is_success() {
        return Err(RemoteError::Status {
            status: status.as_u16(),
            body: text,
        });
    }

    tracing::debug!(body = %text, "Received AWS response");

    Ok(text)
}
