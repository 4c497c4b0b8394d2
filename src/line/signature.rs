// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Webhook signature verification.
//!
//! The platform signs every webhook body with HMAC-SHA256 keyed by the
//! channel secret and sends the base64 digest in [`SIGNATURE_HEADER`].

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the body signature.
pub const SIGNATURE_HEADER: &str = "x-line-signature";

fn mac(secret: &str, body: &[u8]) -> HmacSha256 {
    // HMAC accepts keys of any length
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap_or_else(|_| unreachable!());
    mac.update(body);
    mac
}

/// Computes the base64 signature of `body`.
///
/// # Examples
///
/// ```
/// use aircon_bridge::line::compute_signature;
///
/// let signature = compute_signature("channel-secret", br#"{"destination":"U0","events":[]}"#);
/// assert_eq!(signature, "W3dP9Bhbu4pAfrrGKmS3sZ+m7GXhMWYtP0X+0oJHG4w=");
/// ```
#[must_use]
pub fn compute_signature(secret: &str, body: &[u8]) -> String {
    STANDARD.encode(mac(secret, body).finalize().into_bytes())
}

/// Checks a signature header value against `body`.
///
/// The comparison is done on the decoded digest in constant time.
///
/// # Errors
///
/// Returns `WebhookError::SignatureMismatch` if the header is absent, is
/// not valid base64, or does not match.
pub fn verify_signature(
    secret: &str,
    body: &[u8],
    signature: Option<&str>,
) -> Result<(), WebhookError> {
    let signature = signature.ok_or(WebhookError::SignatureMismatch)?;
    let expected = STANDARD
        .decode(signature.trim())
        .map_err(|_| WebhookError::SignatureMismatch)?;

    mac(secret, body)
        .verify_slice(&expected)
        .map_err(|_| WebhookError::SignatureMismatch)
}
