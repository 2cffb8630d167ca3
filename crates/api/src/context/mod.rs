//! Application context - dependency injection container

use std::path::Path;
use std::sync::Arc;

use slotwise_core::{
    AvailabilityPorts, AvailabilityService, BookingStore, CalendarProvider, Clock, CredentialStore,
    ScheduleDirectory,
};
use slotwise_domain::{Config, Result};
use slotwise_infra::{GoogleCalendarProvider, JsonFileStore};
use tracing::info;

use crate::utils::health::{ComponentHealth, HealthStatus};

/// Application context - holds all services and dependencies
pub struct AppContext {
    pub config: Config,
    pub availability: Arc<AvailabilityService>,
    pub store: Arc<JsonFileStore>,
}

impl AppContext {
    /// Load configuration from the standard locations and wire everything.
    pub async fn new() -> Result<Self> {
        let config = slotwise_infra::config::load()?;
        Self::new_with_config(config).await
    }

    /// Wire the Google provider and the JSON record store for `config`.
    pub async fn new_with_config(config: Config) -> Result<Self> {
        let provider: Arc<dyn CalendarProvider> = Arc::new(GoogleCalendarProvider::new(&config.google)?);
        let store = Arc::new(JsonFileStore::open(&config.storage.data_path).await?);
        Ok(Self::from_parts(config, provider, store, None))
    }

    /// Assemble a context from already-built adapters.
    ///
    /// `clock` replaces the system clock when given.
    pub fn from_parts(
        config: Config,
        provider: Arc<dyn CalendarProvider>,
        store: Arc<JsonFileStore>,
        clock: Option<Arc<dyn Clock>>,
    ) -> Self {
        let credentials: Arc<dyn CredentialStore> = store.clone();
        let bookings: Arc<dyn BookingStore> = store.clone();
        let directory: Arc<dyn ScheduleDirectory> = store.clone();

        let mut ports = AvailabilityPorts::new(provider, credentials, bookings, directory);
        if let Some(clock) = clock {
            ports = ports.with_clock(clock);
        }

        let availability = Arc::new(AvailabilityService::with_config(ports, &config.availability));
        info!(
            data_path = %store.path().display(),
            max_pages = config.availability.max_pages_per_calendar,
            default_calendar = %config.availability.default_calendar_id,
            "application context ready"
        );

        Self { config, availability, store }
    }

    /// Comprehensive health check across components
    pub fn health_check(&self) -> HealthStatus {
        let mut status = HealthStatus::new().add_component(record_store_health(self.store.path()));

        let google = &self.config.google;
        status = if google.client_id.is_empty() || google.client_secret.is_empty() {
            status.add_component(ComponentHealth::unhealthy(
                "google_oauth",
                "client credentials not configured; expired tokens cannot be refreshed",
            ))
        } else {
            status.add_component(ComponentHealth::healthy("google_oauth"))
        };

        status.calculate_score();
        status
    }
}

/// The record file, or the directory it will be created in, must be writable.
fn record_store_health(path: &Path) -> ComponentHealth {
    let target = if path.exists() {
        path
    } else {
        path.parent().filter(|parent| !parent.as_os_str().is_empty()).unwrap_or(Path::new("."))
    };

    match std::fs::metadata(target) {
        Ok(meta) if meta.permissions().readonly() => {
            ComponentHealth::unhealthy("record_store", format!("{} is read-only", target.display()))
        }
        Ok(_) => ComponentHealth::healthy("record_store"),
        Err(e) => ComponentHealth::unhealthy(
            "record_store",
            format!("{} is not accessible: {e}", target.display()),
        ),
    }
}
