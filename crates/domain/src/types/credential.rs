//! OAuth credential pair owned by one principal

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Per-principal OAuth token pair.
///
/// Only the token lifecycle manager mutates a stored credential. Expiry is a
/// plain comparison against "now", not a TTL in the store.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCredential {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
}

impl AccessCredential {
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Copy of this credential carrying a freshly issued access token.
    ///
    /// The refresh token is kept unless the provider rotated it.
    pub fn refreshed(
        &self,
        access_token: String,
        rotated_refresh_token: Option<String>,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        Self {
            access_token,
            refresh_token: rotated_refresh_token
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| self.refresh_token.clone()),
            expires_at: now + lifetime,
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
