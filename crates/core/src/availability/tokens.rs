//! Access-token lifecycle: load, refresh when expired, persist

use std::sync::Arc;

use chrono::Duration;
use slotwise_domain::constants::DEFAULT_TOKEN_LIFETIME_SECS;
use slotwise_domain::{AccessCredential, AvailabilityError};
use tracing::{debug, info, instrument, warn};

use super::ports::{CalendarProvider, CredentialStore};
use crate::clock::Clock;

/// Hands out non-expired bearer tokens per principal.
pub struct TokenLifecycleManager {
    credentials: Arc<dyn CredentialStore>,
    provider: Arc<dyn CalendarProvider>,
    clock: Arc<dyn Clock>,
    default_lifetime: Duration,
}

impl TokenLifecycleManager {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        provider: Arc<dyn CalendarProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            provider,
            clock,
            default_lifetime: Duration::seconds(DEFAULT_TOKEN_LIFETIME_SECS),
        }
    }

    /// Lifetime assumed when the token endpoint does not report one.
    pub fn with_default_lifetime_secs(mut self, seconds: i64) -> Self {
        self.default_lifetime = Duration::seconds(seconds);
        self
    }

    /// Return an access token for `principal_id` that is valid right now.
    ///
    /// # Errors
    /// - `CredentialMissing` when nothing is stored for the principal
    /// - `CredentialStoreFailed` when the store cannot be read
    /// - `CredentialRefreshFailed` when the token is expired and the refresh
    ///   call fails; a stale token is never returned
    #[instrument(skip_all, fields(principal_id = %principal_id))]
    pub async fn valid_access_token(&self, principal_id: &str) -> Result<String, AvailabilityError> {
        let credential = self
            .credentials
            .get(principal_id)
            .await
            .map_err(|err| AvailabilityError::CredentialStoreFailed {
                principal_id: principal_id.to_string(),
                reason: err.to_string(),
            })?
            .ok_or_else(|| AvailabilityError::CredentialMissing {
                principal_id: principal_id.to_string(),
            })?;

        let now = self.clock.now();
        if !credential.is_expired(now) {
            debug!(expires_at = %credential.expires_at, "stored access token still valid");
            return Ok(credential.access_token);
        }

        let refreshed = self.refresh(principal_id, &credential).await?;
        Ok(refreshed.access_token)
    }

    async fn refresh(
        &self,
        principal_id: &str,
        credential: &AccessCredential,
    ) -> Result<AccessCredential, AvailabilityError> {
        info!(expires_at = %credential.expires_at, "access token expired; refreshing");

        let grant = self.provider.refresh_token(&credential.refresh_token).await.map_err(|err| {
            warn!(error = %err, "token refresh failed");
            AvailabilityError::CredentialRefreshFailed {
                principal_id: principal_id.to_string(),
                reason: err.to_string(),
            }
        })?;

        if grant.access_token.is_empty() {
            warn!("token endpoint returned an empty access token");
            return Err(AvailabilityError::CredentialRefreshFailed {
                principal_id: principal_id.to_string(),
                reason: "token endpoint returned an empty access token".to_string(),
            });
        }

        let lifetime = grant
            .expires_in_seconds
            .filter(|secs| *secs > 0)
            .map_or(self.default_lifetime, Duration::seconds);
        let refreshed =
            credential.refreshed(grant.access_token, grant.refresh_token, self.clock.now(), lifetime);

        // Concurrent refreshes for the same principal race here; last write wins.
        if let Err(err) = self.credentials.put(principal_id, refreshed.clone()).await {
            warn!(error = %err, "failed to persist refreshed credential; using it for this request");
        } else {
            debug!(expires_at = %refreshed.expires_at, "persisted refreshed credential");
        }

        Ok(refreshed)
    }
}
