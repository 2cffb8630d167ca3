//! Application constants
//!
//! Centralized location for the domain-level defaults. Every value here is
//! only a default; the runtime value comes from [`crate::AvailabilityConfig`].

/// Google's alias for the user's main calendar.
pub const DEFAULT_CALENDAR_ID: &str = "primary";

/// Maximum number of event pages fetched per calendar before truncating.
pub const DEFAULT_MAX_PAGES_PER_CALENDAR: u32 = 10;

/// Lifetime assumed for a refreshed access token when the provider omits it.
pub const DEFAULT_TOKEN_LIFETIME_SECS: i64 = 3600;

/// Wire format for local clock times (`"09:30"`).
pub const CLOCK_TIME_FORMAT: &str = "%H:%M";

// HTTP defaults for provider adapters
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_MAX_ATTEMPTS: usize = 3;
pub const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";
