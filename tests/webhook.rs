// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end tests of the webhook router with every remote service mocked.

mod common;

use std::time::Duration;

use aircon_bridge::line::{SIGNATURE_HEADER, compute_signature};
use aircon_bridge::{AppState, LineClient, create_router, handle_webhook};
use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{FakeShadow, REPLY_PATH, SHADOW_PATH, interpreter, mount_environment, request_count};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SECRET: &str = "test-channel-secret";
const TOKEN: &str = "test-access-token";

async fn app_state(server: &MockServer) -> AppState {
    let line = LineClient::with_endpoint(
        &format!("{}{REPLY_PATH}", server.uri()),
        TOKEN,
        Duration::from_secs(5),
    )
    .unwrap();
    AppState::new(interpreter(server).await, line, SECRET)
}

async fn setup() -> (MockServer, FakeShadow) {
    let server = MockServer::start().await;
    let shadow = FakeShadow::new(json!({"power": 0, "mode": 3, "temp": 24}));
    shadow.mount(&server).await;
    mount_environment(&server, "23.4", "51.0", "1009.8").await;
    (server, shadow)
}

async fn mount_reply_api(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(REPLY_PATH))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(server)
        .await;
}

fn text_event(reply_token: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "mode": "active",
        "timestamp": 1_700_000_000_000_i64,
        "source": {"type": "user", "userId": "U4af4980629"},
        "replyToken": reply_token,
        "message": {"id": "444573844083572737", "type": "text", "text": text}
    })
}

fn payload(events: Vec<Value>) -> Vec<u8> {
    serde_json::to_vec(&json!({"destination": "Uxxxxxxxx", "events": events})).unwrap()
}

fn signed_request(body: Vec<u8>) -> Request<Body> {
    let signature = compute_signature(SECRET, &body);
    Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap()
}

async fn send(state: AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = create_router(state).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn reply_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|r| r.url.path() == REPLY_PATH)
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect()
}

// ============================================================================
// Signature
// ============================================================================

mod signature {
    use super::*;

    #[tokio::test]
    async fn invalid_signature_is_forbidden_without_remote_calls() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;
        let connect_requests = server.received_requests().await.unwrap().len();

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(SIGNATURE_HEADER, "bm90IHRoZSByaWdodCBzaWduYXR1cmU=")
            .body(Body::from(payload(vec![text_event("r1", "オン")])))
            .unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({}));
        assert_eq!(
            server.received_requests().await.unwrap().len(),
            connect_requests
        );
    }

    #[tokio::test]
    async fn missing_signature_is_forbidden() {
        let (server, _shadow) = setup().await;
        let state = app_state(&server).await;

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .body(Body::from(payload(vec![text_event("r1", "オン")])))
            .unwrap();
        let (status, body) = send(state, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body, json!({}));
        assert_eq!(request_count(&server, "POST", SHADOW_PATH).await, 0);
    }

    #[tokio::test]
    async fn tampered_body_is_forbidden() {
        let (server, _shadow) = setup().await;
        let state = app_state(&server).await;

        let original = payload(vec![text_event("r1", "オフ")]);
        let signature = compute_signature(SECRET, &original);
        let tampered = payload(vec![text_event("r1", "オン")]);

        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(tampered))
            .unwrap();
        let (status, _) = send(state, request).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn header_name_is_case_insensitive() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let body = payload(vec![]);
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("X-Line-Signature", compute_signature(SECRET, &body))
            .body(Body::from(body))
            .unwrap();
        let (status, _) = send(state, request).await;

        assert_eq!(status, StatusCode::OK);
    }
}

// ============================================================================
// Dispatch
// ============================================================================

mod dispatch {
    use super::*;

    #[tokio::test]
    async fn text_message_is_answered() {
        let (server, shadow) = setup().await;
        Mock::given(method("POST"))
            .and(path(REPLY_PATH))
            .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
            .and(body_json(json!({
                "replyToken": "r1",
                "messages": [{"type": "text", "text": "電源をオンにしました。"}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(1)
            .mount(&server)
            .await;
        let state = app_state(&server).await;

        let (status, body) = send(state, signed_request(payload(vec![text_event("r1", "オン")]))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
        assert_eq!(shadow.desired()["power"], json!(1));
    }

    #[tokio::test]
    async fn status_reply_carries_quick_reply_items() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let (status, _) = send(state, signed_request(payload(vec![text_event("r1", "?")]))).await;
        assert_eq!(status, StatusCode::OK);

        let replies = reply_bodies(&server).await;
        assert_eq!(replies.len(), 1);
        let message = &replies[0]["messages"][0];
        assert_eq!(message["type"], "text");
        assert!(message["text"].as_str().unwrap().contains("室温は23.4℃です。"));

        let items = message["quickReply"]["items"].as_array().unwrap();
        assert_eq!(items.len(), 7);
        assert_eq!(
            items[0],
            json!({"type": "action", "action": {"type": "message", "label": "オン", "text": "オン"}})
        );
        assert_eq!(items[6]["action"]["text"], "室内環境");
    }

    #[tokio::test]
    async fn non_text_and_malformed_events_are_skipped() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let events = vec![
            json!({"type": "follow", "replyToken": "r0", "source": {"type": "user"}}),
            json!({
                "type": "message",
                "replyToken": "r1",
                "message": {"id": "1", "type": "sticker", "packageId": "1", "stickerId": "1"}
            }),
            json!({"type": "message", "message": {"id": "2", "type": "text", "text": "オン"}}),
            json!(42),
            text_event("r4", "温度"),
        ];
        let (status, body) = send(state, signed_request(payload(events))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));

        let replies = reply_bodies(&server).await;
        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0]["replyToken"], "r4");
        assert_eq!(
            replies[0]["messages"][0]["quickReply"]["items"]
                .as_array()
                .unwrap()
                .len(),
            11
        );
        assert_eq!(request_count(&server, "POST", SHADOW_PATH).await, 0);
    }

    #[tokio::test]
    async fn every_text_message_in_a_batch_is_answered() {
        let (server, shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let body = payload(vec![text_event("r1", "暖房"), text_event("r2", "28℃")]);
        let answered = handle_webhook(&state, Some(&compute_signature(SECRET, &body)), &body)
            .await
            .unwrap();

        assert_eq!(answered, 2);
        assert_eq!(shadow.desired()["mode"], json!(1));
        assert_eq!(shadow.desired()["temp"], json!(28));

        let replies = reply_bodies(&server).await;
        assert_eq!(replies[0]["messages"][0]["text"], "暖房にしました。");
        assert_eq!(replies[1]["messages"][0]["text"], "28℃にしました。");
    }

    #[tokio::test]
    async fn batch_without_text_messages_answers_nothing() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let body = payload(vec![
            json!({"type": "follow", "replyToken": "r0", "source": {"type": "user"}}),
            json!({"type": "unsend", "source": {"type": "user"}}),
            json!({"replyToken": "r2"}),
        ]);
        let answered = handle_webhook(&state, Some(&compute_signature(SECRET, &body)), &body)
            .await
            .unwrap();

        assert_eq!(answered, 0);
        assert!(reply_bodies(&server).await.is_empty());
    }

    #[tokio::test]
    async fn empty_event_list_is_ok() {
        let (server, _shadow) = setup().await;
        mount_reply_api(&server).await;
        let state = app_state(&server).await;

        let (status, body) = send(state, signed_request(payload(vec![]))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({}));
        assert!(reply_bodies(&server).await.is_empty());
    }
}

// ============================================================================
// Failures
// ============================================================================

mod failures {
    use super::*;

    #[tokio::test]
    async fn malformed_body_is_bad_request() {
        let (server, _shadow) = setup().await;
        let state = app_state(&server).await;

        let (status, body) = send(state, signed_request(b"not json".to_vec())).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn shadow_failure_is_server_error_and_stops_the_batch() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(SHADOW_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(common::shadow_document(
                json!({"power": 0, "mode": 3, "temp": 24}),
            )))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SHADOW_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(REPLY_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .expect(0)
            .mount(&server)
            .await;
        let state = app_state(&server).await;

        let events = vec![text_event("r1", "オン"), text_event("r2", "温度")];
        let (status, body) = send(state, signed_request(payload(events))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({}));
    }

    #[tokio::test]
    async fn reply_failure_is_remote_write() {
        let (server, _shadow) = setup().await;
        Mock::given(method("POST"))
            .and(path(REPLY_PATH))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"message": "Invalid reply token"})),
            )
            .mount(&server)
            .await;
        let state = app_state(&server).await;

        let body = payload(vec![text_event("expired", "温度")]);
        let err = handle_webhook(&state, Some(&compute_signature(SECRET, &body)), &body)
            .await
            .unwrap_err();
        assert!(err.is_remote_write());

        let (status, _) = send(state, signed_request(body)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn unexpected_reply_body_is_not_an_error() {
        let (server, _shadow) = setup().await;
        Mock::given(method("POST"))
            .and(path(REPLY_PATH))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"sentMessages": [{"id": "1"}]})),
            )
            .mount(&server)
            .await;
        let state = app_state(&server).await;

        let (status, _) = send(state, signed_request(payload(vec![text_event("r1", "温度")]))).await;

        assert_eq!(status, StatusCode::OK);
    }
}

// ============================================================================
// Startup
// ============================================================================

mod startup {
    use aircon_bridge::{AppState, Config, ConfigError, Error};
    use clap::Parser;

    use super::*;

    fn config(server: &MockServer) -> Config {
        let endpoint = server.uri();
        Config::try_parse_from([
            "aircon-bridge",
            "--region",
            "ap-northeast-1",
            "--thing-name",
            common::THING,
            "--table-name",
            common::TABLE,
            "--partition-key",
            common::PARTITION_KEY,
            "--partition-name",
            common::PARTITION_NAME,
            "--channel-secret",
            SECRET,
            "--channel-access-token",
            TOKEN,
            "--aws-access-key-id",
            "AKIDEXAMPLE",
            "--aws-secret-access-key",
            "secret",
            "--iot-endpoint",
            endpoint.as_str(),
            "--dynamodb-endpoint",
            endpoint.as_str(),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn invalid_config_fails_before_any_remote_call() {
        let (server, _shadow) = setup().await;
        let mut config = config(&server);
        config.thing_name = "  ".to_string();

        let err = AppState::from_config(&config).await.unwrap_err();

        assert!(matches!(err, Error::Config(ConfigError::Missing("THING_NAME"))));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn valid_config_loads_the_shadow_once() {
        let (server, _shadow) = setup().await;

        let state = AppState::from_config(&config(&server)).await.unwrap();

        assert_eq!(request_count(&server, "GET", SHADOW_PATH).await, 1);
        assert!(format!("{state:?}").contains("<redacted>"));
    }
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn health_reports_version() {
    let (server, _shadow) = setup().await;
    let state = app_state(&server).await;

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(state, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"status": "ok", "version": env!("CARGO_PKG_VERSION")})
    );
}
