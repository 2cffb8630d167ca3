//! Google Calendar provider implementation

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use slotwise_core::{CalendarProvider, EventPage, RemoteEvent, TokenRefresh};
use slotwise_domain::{GoogleConfig, Result, SlotwiseError};
use tracing::{debug, instrument};
use url::Url;

use super::wire::{CalendarListResponse, EventsResponse, GoogleEvent, TokenResponse};
use crate::errors::{status_error, InfraError};
use crate::http::HttpClient;

/// Upper bound on `calendarList` pages; accounts rarely exceed one.
const MAX_CALENDAR_LIST_PAGES: usize = 10;
const EVENTS_PAGE_SIZE: &str = "250";

/// Google Calendar v3 over REST.
pub struct GoogleCalendarProvider {
    http: HttpClient,
    api_base: Url,
    token_endpoint: Url,
    client_id: String,
    client_secret: String,
}

impl GoogleCalendarProvider {
    /// Provider with an HTTP client built from the same config section.
    pub fn new(config: &GoogleConfig) -> Result<Self> {
        Self::with_http_client(config, HttpClient::from_config(config)?)
    }

    pub fn with_http_client(config: &GoogleConfig, http: HttpClient) -> Result<Self> {
        let api_base = Url::parse(&config.api_base_url).map_err(|err| {
            SlotwiseError::Config(format!("invalid google.api_base_url {}: {err}", config.api_base_url))
        })?;
        if api_base.cannot_be_a_base() {
            return Err(SlotwiseError::Config(format!(
                "google.api_base_url cannot carry a path: {}",
                config.api_base_url
            )));
        }
        let token_endpoint = Url::parse(&config.token_endpoint).map_err(|err| {
            SlotwiseError::Config(format!(
                "invalid google.token_endpoint {}: {err}",
                config.token_endpoint
            ))
        })?;

        Ok(Self {
            http,
            api_base,
            token_endpoint,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    /// `api_base` plus percent-encoded path segments.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        access_token: &str,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let request = self.http.request(Method::GET, url).bearer_auth(access_token).query(query);
        let response = ensure_success(self.http.send(request).await?).await?;
        response.json::<T>().await.map_err(|err| InfraError::from(err).into())
    }
}

#[async_trait]
impl CalendarProvider for GoogleCalendarProvider {
    #[instrument(skip_all)]
    async fn list_calendars(&self, access_token: &str) -> Result<Vec<String>> {
        let url = self.endpoint(&["users", "me", "calendarList"]);
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        for _ in 0..MAX_CALENDAR_LIST_PAGES {
            let mut query = vec![("minAccessRole", "freeBusyReader")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let page: CalendarListResponse = self.get_json(access_token, url.clone(), &query).await?;
            ids.extend(page.items.into_iter().filter(|entry| !entry.deleted).map(|entry| entry.id));

            match page.next_page_token {
                Some(next) if !next.is_empty() => page_token = Some(next),
                _ => break,
            }
        }

        debug!(calendar_count = ids.len(), "listed calendars");
        Ok(ids)
    }

    #[instrument(skip(self, access_token, time_min, time_max, page_cursor), fields(has_cursor = page_cursor.is_some()))]
    async fn list_events(
        &self,
        access_token: &str,
        calendar_id: &str,
        time_min: DateTime<Utc>,
        time_max: DateTime<Utc>,
        page_cursor: Option<&str>,
    ) -> Result<EventPage> {
        let url = self.endpoint(&["calendars", calendar_id, "events"]);
        let time_min = time_min.to_rfc3339_opts(SecondsFormat::Secs, true);
        let time_max = time_max.to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut query = vec![
            ("timeMin", time_min.as_str()),
            ("timeMax", time_max.as_str()),
            ("singleEvents", "true"),
            ("orderBy", "startTime"),
            ("maxResults", EVENTS_PAGE_SIZE),
        ];
        if let Some(cursor) = page_cursor {
            query.push(("pageToken", cursor));
        }

        let page: EventsResponse = self.get_json(access_token, url, &query).await?;
        let received = page.items.len();
        let events: Vec<_> =
            page.items.into_iter().filter_map(|item| item.into_busy_event(calendar_id)).collect();

        debug!(received, busy = events.len(), "fetched events page");
        Ok(EventPage {
            events,
            next_page_cursor: page.next_page_token.filter(|token| !token.is_empty()),
        })
    }

    #[instrument(skip(self, access_token))]
    async fn get_event(
        &self,
        access_token: &str,
        calendar_id: &str,
        event_id: &str,
    ) -> Result<Option<RemoteEvent>> {
        let url = self.endpoint(&["calendars", calendar_id, "events", event_id]);
        let request = self.http.request(Method::GET, url).bearer_auth(access_token);
        let response = self.http.send(request).await?;

        if matches!(response.status(), StatusCode::NOT_FOUND | StatusCode::GONE) {
            debug!(status = %response.status(), "event no longer exists");
            return Ok(None);
        }

        let event: GoogleEvent = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| SlotwiseError::from(InfraError::from(err)))?;
        let status = event.event_status();
        Ok(Some(RemoteEvent { id: event.id, status }))
    }

    #[instrument(skip_all)]
    async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRefresh> {
        if self.client_id.is_empty() || self.client_secret.is_empty() {
            return Err(SlotwiseError::Config("google.client_id / client_secret not configured".into()));
        }

        let request = self.http.request(Method::POST, self.token_endpoint.clone()).form(&[
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.as_str()),
            ("refresh_token", refresh_token),
            ("grant_type", "refresh_token"),
        ]);

        let response = self.http.send(request).await.map_err(|err| match err {
            SlotwiseError::Network(msg) => SlotwiseError::Network(format!("token refresh: {msg}")),
            other => other,
        })?;

        let grant: TokenResponse = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|err| SlotwiseError::Auth(format!("failed to parse token response: {err}")))?;

        debug!(expires_in = ?grant.expires_in, rotated = grant.refresh_token.is_some(), "refreshed access token");
        Ok(grant.into())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, Some(&body)))
}
