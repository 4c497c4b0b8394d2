// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! LINE Messaging API boundary.
//!
//! - [`verify_signature`]: checks the `x-line-signature` header
//! - [`WebhookPayload`] / [`TextMessage`]: inbound events
//! - [`LineClient`]: outbound replies

mod client;
mod signature;
mod webhook;

pub use client::{DEFAULT_REPLY_ENDPOINT, LineClient, reply_body};
pub use signature::{SIGNATURE_HEADER, compute_signature, verify_signature};
pub use webhook::{TextMessage, WebhookPayload};
