//! Shared fixtures for infra integration tests

#![allow(dead_code)]

use std::time::Duration;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use slotwise_domain::GoogleConfig;
use slotwise_infra::{GoogleCalendarProvider, HttpClient};
use wiremock::MockServer;

pub const API_PREFIX: &str = "/calendar/v3";

pub fn google_config(server: &MockServer) -> GoogleConfig {
    GoogleConfig {
        client_id: "client-id".to_string(),
        client_secret: "client-secret".to_string(),
        api_base_url: format!("{}{}", server.uri(), API_PREFIX),
        token_endpoint: format!("{}/token", server.uri()),
        request_timeout_secs: 5,
        max_attempts: 2,
    }
}

/// Provider against the mock server with fast retries.
pub fn provider(server: &MockServer) -> GoogleCalendarProvider {
    let http = HttpClient::builder()
        .timeout(Duration::from_secs(5))
        .max_attempts(2)
        .base_backoff(Duration::from_millis(1))
        .build()
        .expect("http client");
    GoogleCalendarProvider::with_http_client(&google_config(server), http).expect("provider")
}

pub fn api_path(suffix: &str) -> String {
    format!("{API_PREFIX}{suffix}")
}

pub fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}
