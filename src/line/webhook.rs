// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Inbound webhook payloads.
//!
//! Events are decoded one by one so that a single malformed event does not
//! reject the whole batch.

use serde::Deserialize;
use serde_json::Value;

use crate::error::WebhookError;

/// A webhook request body.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookPayload {
    /// Bot user id the events were sent to.
    #[serde(default)]
    pub destination: Option<String>,
    /// Raw events, decoded lazily with [`TextMessage::from_event`].
    #[serde(default)]
    pub events: Vec<Value>,
}

impl WebhookPayload {
    /// Parses a request body.
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedBody` if the body is not a JSON object
    /// or `events` is not an array.
    pub fn parse(body: &[u8]) -> Result<Self, WebhookError> {
        serde_json::from_slice(body).map_err(|e| WebhookError::MalformedBody(e.to_string()))
    }
}

/// A text message that needs a reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMessage {
    /// Token used to reply to this message.
    pub reply_token: String,
    /// Message text as typed by the user.
    pub text: String,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "replyToken")]
    reply_token: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    #[serde(rename = "type")]
    kind: String,
    text: Option<String>,
}

impl TextMessage {
    /// Extracts a text message from one event.
    ///
    /// Returns `Ok(None)` for events that are not text messages (follows,
    /// postbacks, stickers, images, ...).
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::MalformedEvent` if the event has no `type`, or
    /// is a text message without a `replyToken` or `text`.
    pub fn from_event(event: &Value) -> Result<Option<Self>, WebhookError> {
        let raw = RawEvent::deserialize(event)
            .map_err(|e| WebhookError::MalformedEvent(e.to_string()))?;

        if raw.kind != "message" {
            return Ok(None);
        }
        let message = raw
            .message
            .ok_or_else(|| WebhookError::MalformedEvent("message event without message".into()))?;
        if message.kind != "text" {
            return Ok(None);
        }

        let text = message
            .text
            .ok_or_else(|| WebhookError::MalformedEvent("text message without text".into()))?;
        let reply_token = raw
            .reply_token
            .ok_or_else(|| WebhookError::MalformedEvent("message without replyToken".into()))?;

        Ok(Some(Self { reply_token, text }))
    }
}
