// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! AWS Signature Version 4 request signing.
//!
//! Requests are signed with [`aws_sigv4`] in header mode. Bodies are fully
//! buffered, so the payload hash always covers the exact bytes sent.

use std::fmt;
use std::time::SystemTime;

use aws_sigv4::http_request::{self, SignableBody, SignableRequest, SigningSettings};
use aws_sigv4::sign::v4;
use chrono::{DateTime, Utc};
use reqwest::Url;

use crate::error::RemoteError;

const PROVIDER_NAME: &str = "aircon-bridge";

/// AWS credentials used to sign requests.
#[derive(Clone)]
pub struct Credentials {
    access_key_id: String,
    secret_access_key: String,
    session_token: Option<String>,
}

impl Credentials {
    /// Creates credentials from an access key pair.
    #[must_use]
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    /// Sets a session token for temporary credentials.
    #[must_use]
    pub fn with_session_token(mut self, token: impl Into<String>) -> Self {
        self.session_token = Some(token.into());
        self
    }

    /// Returns the access key id.
    #[must_use]
    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    fn to_aws(&self) -> aws_credential_types::Credentials {
        aws_credential_types::Credentials::new(
            &self.access_key_id,
            &self.secret_access_key,
            self.session_token.clone(),
            None,
            PROVIDER_NAME,
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Signs requests for one AWS service in one region.
#[derive(Debug, Clone)]
pub struct Signer {
    credentials: Credentials,
    region: String,
    service: String,
}

impl Signer {
    /// Creates a signer for `service` in `region`.
    #[must_use]
    pub fn new(
        credentials: Credentials,
        region: impl Into<String>,
        service: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            region: region.into(),
            service: service.into(),
        }
    }

    /// Returns the service name used in the credential scope.
    #[must_use]
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Computes the headers that authenticate a request.
    ///
    /// `headers` are additional headers the request will carry and that
    /// must be covered by the signature (for example `content-type`). The
    /// `host` header is derived from `url`.
    ///
    /// Returns the headers to add to the request: `x-amz-date`, the optional
    /// `x-amz-security-token` and `authorization`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::Signing` if the request cannot be signed, for
    /// example when a header value is not valid.
    pub fn sign(
        &self,
        method: &str,
        url: &Url,
        headers: &[(&str, &str)],
        body: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Vec<(String, String)>, RemoteError> {
        let identity = self.credentials.to_aws().into();
        let params: http_request::SigningParams<'_> = v4::SigningParams::builder()
            .identity(&identity)
            .region(&self.region)
            .name(&self.service)
            .time(SystemTime::from(now))
            .settings(SigningSettings::default())
            .build()
            .map_err(signing_error)?
            .into();

        let request = SignableRequest::new(
            method,
            url.as_str(),
            headers.iter().copied(),
            SignableBody::Bytes(body),
        )
        .map_err(signing_error)?;

        let (instructions, signature) = http_request::sign(request, &params)
            .map_err(signing_error)?
            .into_parts();
        tracing::trace!(service = %self.service, signature = %signature, "Signed AWS request");

        Ok(instructions
            .headers()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect())
    }
}

fn signing_error(e: impl fmt::Display) -> RemoteError {
    RemoteError::Signing(e.to_string())
}
