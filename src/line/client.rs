// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Reply API client.

use std::fmt;
use std::time::Duration;

use reqwest::{Client, Url};
use serde::Serialize;

use crate::error::{ConfigError, RemoteError};
use crate::interpreter::{QuickReplyOption, ReplyMessage};

/// Default reply endpoint.
pub const DEFAULT_REPLY_ENDPOINT: &str = "https://api.line.me/v2/bot/message/reply";

/// Client that posts replies to the messaging platform.
#[derive(Clone)]
pub struct LineClient {
    client: Client,
    reply_url: Url,
    access_token: String,
}

#[derive(Debug, Serialize)]
struct ReplyRequest<'a> {
    #[serde(rename = "replyToken")]
    reply_token: &'a str,
    messages: Vec<OutgoingMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    text: &'a str,
    #[serde(rename = "quickReply", skip_serializing_if = "Option::is_none")]
    quick_reply: Option<QuickReply<'a>>,
}

#[derive(Debug, Serialize)]
struct QuickReply<'a> {
    items: Vec<QuickReplyItem<'a>>,
}

#[derive(Debug, Serialize)]
struct QuickReplyItem<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    action: MessageAction<'a>,
}

#[derive(Debug, Serialize)]
struct MessageAction<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    label: &'a str,
    text: &'a str,
}

impl<'a> From<&'a QuickReplyOption> for QuickReplyItem<'a> {
    fn from(option: &'a QuickReplyOption) -> Self {
        Self {
            kind: "action",
            action: MessageAction {
                kind: "message",
                label: &option.label,
                text: &option.value,
            },
        }
    }
}

impl<'a> From<&'a ReplyMessage> for OutgoingMessage<'a> {
    fn from(message: &'a ReplyMessage) -> Self {
        let quick_reply = message.has_menu().then(|| QuickReply {
            items: message.quick_reply.iter().map(QuickReplyItem::from).collect(),
        });
        Self {
            kind: "text",
            text: &message.text,
            quick_reply,
        }
    }
}

/// Builds the JSON body of a reply request.
#[must_use]
pub fn reply_body(reply_token: &str, messages: &[ReplyMessage]) -> serde_json::Value {
    let request = ReplyRequest {
        reply_token,
        messages: messages.iter().map(OutgoingMessage::from).collect(),
    };
    // Plain structs of strings always serialize
    serde_json::to_value(request).unwrap_or_default()
}

impl LineClient {
    /// Creates a client posting to [`DEFAULT_REPLY_ENDPOINT`].
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(access_token: impl Into<String>) -> Result<Self, crate::Error> {
        Self::with_endpoint(DEFAULT_REPLY_ENDPOINT, access_token, Duration::from_secs(10))
    }

    /// Creates a client posting to a custom endpoint.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn with_endpoint(
        endpoint: &str,
        access_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, crate::Error> {
        let reply_url = Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
            name: "LINE_REPLY_ENDPOINT",
            message: format!("{endpoint:?}: {e}"),
        })?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| crate::Error::RemoteWrite(RemoteError::Http(e)))?;

        Ok(Self {
            client,
            reply_url,
            access_token: access_token.into(),
        })
    }

    /// Posts reply messages for one reply token.
    ///
    /// A response body other than `{}` is logged but not treated as an
    /// error.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails or the API answers with a
    /// non-success status.
    pub async fn reply(
        &self,
        reply_token: &str,
        messages: &[ReplyMessage],
    ) -> Result<(), RemoteError> {
        let body = reply_body(reply_token, messages);

        tracing::debug!(url = %self.reply_url, body = %body, "Posting reply");

        let response = self
            .client
            .post(self.reply_url.clone())
            .bearer_auth(&self.access_token)
            .json(&body)
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

        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed != "{}" {
            tracing::info!(body = %trimmed, "Reply API returned a body");
        }

        Ok(())
    }
}

impl fmt::Debug for LineClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineClient")
            .field("reply_url", &self.reply_url.as_str())
            .field("access_token", &"<redacted>")
            .finish_non_exhaustive()
    }
}
