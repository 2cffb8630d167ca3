//! Shared fixtures for API integration tests
//!
//! Boots a full `AppContext` against a WireMock stand-in for Google and a
//! JSON record file in a temp directory.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use slotwise_api::{router, AppContext};
use slotwise_domain::Config;
use tempfile::TempDir;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const API_PREFIX: &str = "/calendar/v3";

/// Running app plus the resources that must outlive it.
pub struct TestApp {
    pub router: Router,
    pub google: MockServer,
    _data_dir: TempDir,
}

pub fn data_file() -> Value {
    let policy = json!({
        "workStart": "09:00",
        "workEnd": "17:00",
        "break": {"start": "12:00", "end": "13:00"},
        "slotDurationMinutes": 60
    });
    let monday = json!({"start": "2024-06-10", "end": "2024-06-10"});

    json!({
        "credentials": {
            "host": credential("access-host", "refresh-host", "2099-01-01T00:00:00Z"),
            "guest": credential("access-guest", "refresh-guest", "2099-01-01T00:00:00Z"),
            "lapsed": credential("stale-lapsed", "refresh-lapsed", "2020-01-01T00:00:00Z")
        },
        "schedules": [
            {
                "id": "intro-call",
                "ownerId": "host",
                "principal": {"kind": "user", "id": "host"},
                "policy": policy,
                "dateRange": monday
            },
            {
                "id": "team-sync",
                "ownerId": "host",
                "principal": {"kind": "team", "id": "pair", "memberIds": ["host", "guest"]},
                "policy": policy,
                "dateRange": monday
            },
            {
                "id": "lapsed-call",
                "ownerId": "lapsed",
                "principal": {"kind": "user", "id": "lapsed"},
                "policy": policy,
                "dateRange": monday
            }
        ],
        "bookings": [
            {
                "scheduleId": "intro-call",
                "date": "2024-06-10",
                "startTime": "14:00",
                "endTime": "15:00",
                "hostCalendarEventId": "evt-booked"
            }
        ]
    })
}

fn credential(access: &str, refresh: &str, expires_at: &str) -> Value {
    json!({"accessToken": access, "refreshToken": refresh, "expiresAt": expires_at})
}

impl TestApp {
    pub async fn start() -> Self {
        let google = MockServer::start().await;
        mount_google(&google).await;

        let data_dir = TempDir::new().expect("temp dir");
        let data_path = data_dir.path().join("slotwise.json");
        std::fs::write(&data_path, serde_json::to_vec_pretty(&data_file()).expect("encode"))
            .expect("write data file");

        let mut config = Config::default();
        config.google.client_id = "client-id".into();
        config.google.client_secret = "client-secret".into();
        config.google.api_base_url = format!("{}{API_PREFIX}", google.uri());
        config.google.token_endpoint = format!("{}/token", google.uri());
        config.google.max_attempts = 1;
        config.storage.data_path = data_path.to_string_lossy().into_owned();

        let ctx = AppContext::new_with_config(config).await.expect("context");
        Self { router: router(Arc::new(ctx)), google, _data_dir: data_dir }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).expect("request");
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(body).expect("encode")))
            .expect("request");
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        (status, body)
    }
}

/// Start times of the returned slots, in order.
pub fn start_times(body: &Value) -> Vec<String> {
    body["slots"]
        .as_array()
        .map(|slots| {
            slots.iter().filter_map(|slot| slot["startTime"].as_str().map(str::to_string)).collect()
        })
        .unwrap_or_default()
}

fn timed_event(id: &str, start: &str, end: &str) -> Value {
    json!({"id": id, "status": "confirmed", "start": {"dateTime": start}, "end": {"dateTime": end}})
}

/// Host is busy 10-11, guest is busy 15-16, the booked event still exists
/// and the lapsed principal's refresh token has been revoked.
async fn mount_google(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/users/me/calendarList")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{"id": "primary"}]})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/calendars/primary/events")))
        .and(header("authorization", "Bearer access-host"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [timed_event("host-busy", "2024-06-10T10:00:00Z", "2024-06-10T11:00:00Z")]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/calendars/primary/events")))
        .and(header("authorization", "Bearer access-guest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [timed_event("guest-busy", "2024-06-10T15:00:00Z", "2024-06-10T16:00:00Z")]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/calendars/primary/events/evt-booked")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "evt-booked", "status": "confirmed"})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(400).set_body_string(r#"{"error":"invalid_grant"}"#))
        .mount(server)
        .await;
}
