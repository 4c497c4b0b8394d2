// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! DynamoDB `GetItem` client using the JSON 1.0 protocol.

use std::time::Duration;

use reqwest::{Client, Method, Url};
use serde::Deserialize;
use serde_json::{Map, Value, json};

use crate::error::{ParseError, RemoteError};

use super::{Signer, build_http_client, parse_endpoint, send_signed};

const GET_ITEM_TARGET: &str = "DynamoDB_20120810.GetItem";
const CONTENT_TYPE: &str = "application/x-amz-json-1.0";

/// Client for reading single items from DynamoDB tables.
#[derive(Debug, Clone)]
pub struct TableClient {
    client: Client,
    signer: Signer,
    endpoint: Url,
}

#[derive(Debug, Deserialize)]
struct GetItemOutput {
    #[serde(rename = "Item")]
    item: Option<Map<String, Value>>,
}

impl TableClient {
    /// Creates a table client with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn new(endpoint: &str, signer: Signer) -> Result<Self, crate::Error> {
        Self::with_timeout(endpoint, signer, super::DEFAULT_TIMEOUT)
    }

    /// Creates a table client with a custom request timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the endpoint is not a valid URL or the HTTP client
    /// cannot be created.
    pub fn with_timeout(
        endpoint: &str,
        signer: Signer,
        timeout: Duration,
    ) -> Result<Self, crate::Error> {
        let endpoint = parse_endpoint("DYNAMODB_ENDPOINT", endpoint)?;
        let client = build_http_client(timeout).map_err(crate::Error::RemoteRead)?;
        Ok(Self {
            client,
            signer,
            endpoint,
        })
    }

    /// Reads the item whose string partition key `key_name` equals
    /// `key_value`.
    ///
    /// Returns the raw typed attributes (`{"temperature": {"N": "23.5"}}`),
    /// or `None` if no such item exists. Reads are strongly consistent.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError` if the request fails, the service answers with
    /// an error status, or the body cannot be decoded.
    pub async fn get_item(
        &self,
        table_name: &str,
        key_name: &str,
        key_value: &str,
    ) -> Result<Option<Map<String, Value>>, RemoteError> {
        let request = json!({
            "TableName": table_name,
            "Key": { key_name: { "S": key_value } },
            "ConsistentRead": true,
        });
        let body =
            serde_json::to_vec(&request).map_err(|e| RemoteError::Parse(ParseError::Json(e)))?;

        let text = send_signed(
            &self.client,
            &self.signer,
            Method::POST,
            &self.endpoint,
            &[("content-type", CONTENT_TYPE), ("x-amz-target", GET_ITEM_TARGET)],
            body,
        )
        .await?;

        let output: GetItemOutput =
            serde_json::from_str(&text).map_err(|e| RemoteError::Parse(ParseError::Json(e)))?;
        Ok(output.item)
    }
}

/// Decodes a numeric attribute value (`{"N": "..."}`) as `f64`.
///
/// String attributes holding a number (`{"S": "..."}`) are accepted too.
///
/// # Errors
///
/// Returns `ParseError::MissingField` if `name` is absent, and
/// `ParseError::InvalidValue` if the value is not a number.
pub fn number_attribute(item: &Map<String, Value>, name: &str) -> Result<f64, ParseError> {
    let attribute = item
        .get(name)
        .ok_or_else(|| ParseError::MissingField(name.to_string()))?;

    let raw = attribute
        .get("N")
        .or_else(|| attribute.get("S"))
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::InvalidValue {
            field: name.to_string(),
            message: format!("not a number attribute: {attribute}"),
        })?;

    raw.trim().parse::<f64>().map_err(|e| ParseError::InvalidValue {
        field: name.to_string(),
        message: format!("{raw:?}: {e}"),
    })
}
