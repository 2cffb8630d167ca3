//! Configuration structures
//!
//! Loaded by `slotwise_infra::config`. Every section has serde defaults so a
//! config file only needs the values it overrides.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_CALENDAR_ID, DEFAULT_HTTP_MAX_ATTEMPTS, DEFAULT_LOG_LEVEL,
    DEFAULT_MAX_PAGES_PER_CALENDAR, DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_TOKEN_LIFETIME_SECS,
};

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub google: GoogleConfig,
    #[serde(default)]
    pub availability: AvailabilityConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Google OAuth client and API endpoints.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoogleConfig {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            api_base_url: default_api_base_url(),
            token_endpoint: default_token_endpoint(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            max_attempts: DEFAULT_HTTP_MAX_ATTEMPTS,
        }
    }
}

impl std::fmt::Debug for GoogleConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("token_endpoint", &self.token_endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_attempts", &self.max_attempts)
            .finish()
    }
}

/// Tunables of the availability engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityConfig {
    /// Page ceiling per calendar; bounds latency against huge calendars.
    #[serde(default = "default_max_pages")]
    pub max_pages_per_calendar: u32,
    /// Lifetime assumed when the token endpoint omits `expires_in`.
    #[serde(default = "default_token_lifetime_secs")]
    pub default_token_lifetime_secs: i64,
    /// Calendar used when calendar listing fails, and for event verification.
    #[serde(default = "default_calendar_id")]
    pub default_calendar_id: String,
}

impl Default for AvailabilityConfig {
    fn default() -> Self {
        Self {
            max_pages_per_calendar: DEFAULT_MAX_PAGES_PER_CALENDAR,
            default_token_lifetime_secs: DEFAULT_TOKEN_LIFETIME_SECS,
            default_calendar_id: DEFAULT_CALENDAR_ID.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: default_bind_address() }
    }
}

/// Location of the JSON record file backing credentials, schedules and
/// bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_path")]
    pub data_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_path: default_data_path() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: default_log_level(), json: false }
    }
}

fn default_api_base_url() -> String {
    "https://www.googleapis.com/calendar/v3".to_string()
}

fn default_token_endpoint() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

fn default_max_attempts() -> usize {
    DEFAULT_HTTP_MAX_ATTEMPTS
}

fn default_max_pages() -> u32 {
    DEFAULT_MAX_PAGES_PER_CALENDAR
}

fn default_token_lifetime_secs() -> i64 {
    DEFAULT_TOKEN_LIFETIME_SECS
}

fn default_calendar_id() -> String {
    DEFAULT_CALENDAR_ID.to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_data_path() -> String {
    "slotwise-data.json".to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
