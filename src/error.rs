// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for the bridge.
//!
//! Remote failures are split by direction: anything that goes wrong while
//! fetching the device shadow or the environment table is a
//! [`Error::RemoteRead`], anything that goes wrong while pushing a shadow
//! patch or posting a chat reply is a [`Error::RemoteWrite`]. Both carry a
//! [`RemoteError`] describing the underlying cause.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching remote state failed or returned an unusable document.
    #[error("remote read failed: {0}")]
    RemoteRead(#[source] RemoteError),

    /// Pushing a change to a remote service failed.
    #[error("remote write failed: {0}")]
    RemoteWrite(#[source] RemoteError),

    /// Inbound webhook request was rejected.
    #[error("webhook error: {0}")]
    Webhook(#[from] WebhookError),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The webhook listener could not be bound or failed while serving.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` if this error came from a remote read.
    #[must_use]
    pub fn is_remote_read(&self) -> bool {
        matches!(self, Self::RemoteRead(_))
    }

    /// Returns `true` if this error came from a remote write.
    #[must_use]
    pub fn is_remote_write(&self) -> bool {
        matches!(self, Self::RemoteWrite(_))
    }
}

/// Underlying cause of a failed remote call.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// HTTP request failed (connection, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Response status code.
        status: u16,
        /// Response body, as returned by the service.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("{0}")]
    Parse(#[from] ParseError),

    /// Request signing could not be performed.
    #[error("request signing failed: {0}")]
    Signing(String),
}

/// Errors related to decoding remote documents.
#[derive(Debug, Error)]
pub enum ParseError {
    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Expected field is missing from the document.
    #[error("missing field in response: {0}")]
    MissingField(String),

    /// A field was present but held an unusable value.
    #[error("failed to parse {field}: {message}")]
    InvalidValue {
        /// The field that failed to parse.
        field: String,
        /// Description of the parsing failure.
        message: String,
    },
}

/// Errors raised while handling an inbound webhook request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WebhookError {
    /// The signature header does not match the body.
    #[error("signature mismatch")]
    SignatureMismatch,

    /// The request body is not a webhook payload at all.
    #[error("malformed webhook body: {0}")]
    MalformedBody(String),

    /// A single event has an unexpected shape.
    #[error("malformed event: {0}")]
    MalformedEvent(String),
}

/// Errors related to startup configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing required setting: {0}")]
    Missing(&'static str),

    /// A setting was provided but is not usable.
    #[error("invalid value for {name}: {message}")]
    Invalid {
        /// Setting name.
        name: &'static str,
        /// Why the value was rejected.
        message: String,
    },
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
