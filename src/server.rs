// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Webhook HTTP server.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `POST /webhook` | Verify, interpret and reply to chat messages |
//! | `GET /health` | Liveness probe with the crate version |
//!
//! `POST /webhook` always answers with an empty JSON object. The status
//! code carries the outcome:
//!
//! | Outcome | Status |
//! |---------|--------|
//! | all text messages answered | 200 |
//! | signature header absent or wrong | 403 |
//! | body is not a webhook payload | 400 |
//! | shadow, table or reply API failed | 500 |

use std::fmt;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::aws::{ShadowClient, Signer, TableClient};
use crate::config::Config;
use crate::device::AirconClient;
use crate::environment::RoomSensor;
use crate::error::{Error, WebhookError};
use crate::interpreter::Interpreter;
use crate::line::{LineClient, SIGNATURE_HEADER, TextMessage, WebhookPayload, verify_signature};

/// Shared state of the webhook server, built once per process.
#[derive(Clone)]
pub struct AppState {
    interpreter: Interpreter,
    line: LineClient,
    channel_secret: Arc<str>,
}

impl AppState {
    /// Creates the state from already constructed collaborators.
    #[must_use]
    pub fn new(interpreter: Interpreter, line: LineClient, channel_secret: &str) -> Self {
        Self {
            interpreter,
            line,
            channel_secret: Arc::from(channel_secret),
        }
    }

    /// Builds every client described by `config`.
    ///
    /// The device shadow is fetched once here to fill the air conditioner
    /// cache.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for unusable settings and `Error::RemoteRead`
    /// if the initial shadow fetch fails.
    pub async fn from_config(config: &Config) -> Result<Self, Error> {
        config.validate()?;

        let credentials = config.credentials();
        let timeout = config.request_timeout();

        let shadow = ShadowClient::with_timeout(
            &config.iot_endpoint(),
            config.thing_name.as_str(),
            Signer::new(credentials.clone(), config.region.as_str(), "iotdata"),
            timeout,
        )?;
        let aircon = AirconClient::connect(shadow).await?;
        tracing::info!(
            thing = %config.thing_name,
            state = ?aircon.snapshot(),
            "Loaded device shadow"
        );

        let table = TableClient::with_timeout(
            &config.dynamodb_endpoint(),
            Signer::new(credentials, config.region.as_str(), "dynamodb"),
            timeout,
        )?;
        let sensor = RoomSensor::new(
            table,
            config.table_name.as_str(),
            config.partition_key.as_str(),
            config.partition_name.as_str(),
        );

        let line = LineClient::with_endpoint(
            &config.reply_endpoint,
            config.channel_access_token.as_str(),
            timeout,
        )?;

        Ok(Self::new(
            Interpreter::new(aircon, sensor),
            line,
            &config.channel_secret,
        ))
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("interpreter", &self.interpreter)
            .field("line", &self.line)
            .field("channel_secret", &"<redacted>")
            .finish()
    }
}

/// Handles one webhook request body.
///
/// Returns the number of messages that were answered. Events that are not
/// text messages are skipped, as are malformed events; processing continues
/// with the next event.
///
/// # Errors
///
/// - `WebhookError::SignatureMismatch` before any remote call is made
/// - `WebhookError::MalformedBody` if the body is not a webhook payload
/// - `Error::RemoteRead` / `Error::RemoteWrite` from the first failing
///   message; later events are not processed
pub async fn handle_webhook(
    state: &AppState,
    signature: Option<&str>,
    body: &[u8],
) -> Result<usize, Error> {
    tracing::debug!(body = %String::from_utf8_lossy(body), "Webhook request received");

    verify_signature(&state.channel_secret, body, signature).inspect_err(|_| {
        tracing::error!("signature validation failed");
    })?;

    let payload = WebhookPayload::parse(body)?;
    tracing::info!(events = payload.events.len(), "Processing webhook events");

    let mut answered = 0;
    for event in &payload.events {
        let message = match TextMessage::from_event(event) {
            Ok(Some(message)) => message,
            Ok(None) => {
                let kind = event
                    .get("type")
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or("?");
                tracing::debug!(kind, "Skipping non-text event");
                continue;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Skipping malformed event");
                continue;
            }
        };

        let reply = state.interpreter.respond(&message.text).await?;
        state
            .line
            .reply(&message.reply_token, std::slice::from_ref(&reply))
            .await
            .map_err(Error::RemoteWrite)?;
        answered += 1;
    }

    Ok(answered)
}

async fn webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> (StatusCode, Json<Value>) {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    let status = match handle_webhook(&state, signature, &body).await {
        Ok(answered) => {
            tracing::debug!(answered, "Webhook handled");
            StatusCode::OK
        }
        Err(Error::Webhook(WebhookError::SignatureMismatch)) => StatusCode::FORBIDDEN,
        Err(Error::Webhook(e)) => {
            tracing::warn!(error = %e, "Rejected webhook body");
            StatusCode::BAD_REQUEST
        }
        Err(e) => {
            tracing::error!(error = %e, "Webhook handling failed");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    (status, Json(json!({})))
}

async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Creates the router with all routes configured.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", post(webhook))
        .route("/health", get(health))
        .with_state(state)
}

/// Builds the application state and serves the router until Ctrl-C.
///
/// # Errors
///
/// Returns error if the state cannot be built or the listener cannot be
/// bound.
pub async fn serve(config: &Config) -> Result<(), Error> {
    let state = AppState::from_config(config).await?;
    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!(address = %config.bind_address, "Webhook server listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Cannot listen for Ctrl-C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
