// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared wiremock fixtures for the shadow service, the environment table
//! and the reply API.

#![allow(dead_code)]

use std::sync::Arc;

use aircon_bridge::aws::{Credentials, ShadowClient, Signer, TableClient};
use aircon_bridge::{AirconClient, Interpreter, RoomSensor};
use parking_lot::Mutex;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, header_exists, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const THING: &str = "aircon";
pub const SHADOW_PATH: &str = "/things/aircon/shadow";
pub const TABLE: &str = "environment";
pub const PARTITION_KEY: &str = "location";
pub const PARTITION_NAME: &str = "living";
pub const REPLY_PATH: &str = "/v2/bot/message/reply";

pub fn signer(service: &str) -> Signer {
    Signer::new(
        Credentials::new("AKIDEXAMPLE", "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY"),
        "ap-northeast-1",
        service,
    )
}

pub fn shadow_document(desired: Value) -> Value {
    json!({
        "state": { "desired": desired, "reported": {} },
        "metadata": {},
        "version": 1,
        "timestamp": 1_700_000_000
    })
}

/// In-memory device shadow that merges desired-state patches.
#[derive(Clone)]
pub struct FakeShadow {
    document: Arc<Mutex<Value>>,
}

impl FakeShadow {
    pub fn new(desired: Value) -> Self {
        Self {
            document: Arc::new(Mutex::new(shadow_document(desired))),
        }
    }

    /// Returns the current `state.desired`.
    pub fn desired(&self) -> Value {
        self.document.lock()["state"]["desired"].clone()
    }

    /// Changes one desired field as another client would.
    pub fn set_desired(&self, field: &str, value: Value) {
        if let Some(desired) = self.document.lock()["state"]["desired"].as_object_mut() {
            desired.insert(field.to_string(), value);
        }
    }

    pub async fn mount(&self, server: &MockServer) {
        Mock::given(method("GET"))
            .and(path(SHADOW_PATH))
            .and(header_exists("authorization"))
            .and(header_exists("x-amz-date"))
            .respond_with(ShadowRead(Arc::clone(&self.document)))
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path(SHADOW_PATH))
            .and(header_exists("authorization"))
            .and(header("content-type", "application/json"))
            .respond_with(ShadowWrite(Arc::clone(&self.document)))
            .mount(server)
            .await;
    }
}

struct ShadowRead(Arc<Mutex<Value>>);

impl Respond for ShadowRead {
    fn respond(&self, _request: &Request) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(self.0.lock().clone())
    }
}

struct ShadowWrite(Arc<Mutex<Value>>);

impl Respond for ShadowWrite {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Ok(patch) = serde_json::from_slice::<Value>(&request.body) else {
            return ResponseTemplate::new(400).set_body_json(json!({"message": "bad json"}));
        };

        let mut document = self.0.lock();
        if let (Some(changes), Some(desired)) = (
            patch["state"]["desired"].as_object(),
            document["state"]["desired"].as_object_mut(),
        ) {
            for (field, value) in changes {
                desired.insert(field.clone(), value.clone());
            }
        }

        ResponseTemplate::new(200).set_body_json(json!({"state": patch["state"], "version": 2}))
    }
}

pub fn shadow_client(server: &MockServer) -> ShadowClient {
    ShadowClient::new(&server.uri(), THING, signer("iotdata")).unwrap()
}

pub async fn aircon(server: &MockServer) -> AirconClient {
    AirconClient::connect(shadow_client(server)).await.unwrap()
}

pub fn get_item_request() -> Value {
    json!({
        "TableName": TABLE,
        "Key": { PARTITION_KEY: { "S": PARTITION_NAME } },
        "ConsistentRead": true
    })
}

/// Mounts a `GetItem` mock answering with one environment item.
pub async fn mount_environment(
    server: &MockServer,
    temperature: &str,
    humidity: &str,
    pressure: &str,
) {
    Mock::given(method("POST"))
        .and(path("/"))
        .and(header("x-amz-target", "DynamoDB_20120810.GetItem"))
        .and(header("content-type", "application/x-amz-json-1.0"))
        .and(header_exists("authorization"))
        .and(body_json(get_item_request()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "Item": {
                "location": { "S": PARTITION_NAME },
                "temperature": { "N": temperature },
                "humidity": { "N": humidity },
                "pressure": { "N": pressure }
            }
        })))
        .mount(server)
        .await;
}

pub fn room_sensor(server: &MockServer) -> RoomSensor {
    let table = TableClient::new(&server.uri(), signer("dynamodb")).unwrap();
    RoomSensor::new(table, TABLE, PARTITION_KEY, PARTITION_NAME)
}

pub async fn interpreter(server: &MockServer) -> Interpreter {
    Interpreter::new(aircon(server).await, room_sensor(server))
}

/// Number of requests the server received for `method path`.
pub async fn request_count(server: &MockServer, verb: &str, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == route)
        .count()
}
