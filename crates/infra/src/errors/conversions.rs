//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use serde_json::Error as JsonError;
use slotwise_domain::SlotwiseError;
use std::io::Error as IoError;
use thiserror::Error;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct InfraError(pub SlotwiseError);

impl From<InfraError> for SlotwiseError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<SlotwiseError> for InfraError {
    fn from(value: SlotwiseError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoSlotwiseError {
    fn into_slotwise(self) -> SlotwiseError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for HttpError {
    fn into_slotwise(self) -> SlotwiseError {
        if self.is_timeout() {
            return SlotwiseError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return SlotwiseError::Network("HTTP connection failure".into());
        }

        if self.is_decode() {
            return SlotwiseError::InvalidInput(format!("failed to decode HTTP body: {self}"));
        }

        if let Some(status) = self.status() {
            return status_error(status, None);
        }

        SlotwiseError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/// Map a non-success HTTP status (plus optional body excerpt) to a domain
/// error.
pub fn status_error(status: reqwest::StatusCode, body: Option<&str>) -> SlotwiseError {
    let code = status.as_u16();
    let mut message =
        format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));
    if let Some(body) = body.map(str::trim).filter(|body| !body.is_empty()) {
        let excerpt: String = body.chars().take(200).collect();
        message.push_str(": ");
        message.push_str(&excerpt);
    }

    match code {
        400 if message.contains("invalid_grant") => SlotwiseError::Auth(message),
        401 | 403 => SlotwiseError::Auth(message),
        404 | 410 => SlotwiseError::NotFound(message),
        429 => SlotwiseError::Network(message),
        400..=499 => SlotwiseError::InvalidInput(message),
        _ => SlotwiseError::Network(message),
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json / toml / io → SlotwiseError */
/* -------------------------------------------------------------------------- */

impl IntoSlotwiseError for JsonError {
    fn into_slotwise(self) -> SlotwiseError {
        if self.is_io() {
            return SlotwiseError::Storage(format!("JSON I/O failure: {self}"));
        }
        SlotwiseError::InvalidInput(format!("invalid JSON: {self}"))
    }
}

impl From<JsonError> for InfraError {
    fn from(value: JsonError) -> Self {
        InfraError(value.into_slotwise())
    }
}

impl IntoSlotwiseError for TomlError {
    fn into_slotwise(self) -> SlotwiseError {
        SlotwiseError::Config(format!("invalid TOML: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_slotwise())
    }
}

impl IntoSlotwiseError for IoError {
    fn into_slotwise(self) -> SlotwiseError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::NotFound => SlotwiseError::NotFound(format!("file not found: {self}")),
            ErrorKind::PermissionDenied => {
                SlotwiseError::Storage(format!("permission denied: {self}"))
            }
            _ => SlotwiseError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_slotwise())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: SlotwiseError = InfraError::from(error).into();
        match mapped {
            SlotwiseError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[test]
    fn displays_the_wrapped_domain_error() {
        let err = InfraError(SlotwiseError::Network("calendar list timed out".into()));
        assert_eq!(err.to_string(), "Network error: calendar list timed out");

        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn gone_maps_to_not_found() {
        assert!(matches!(status_error(StatusCode::GONE, None), SlotwiseError::NotFound(_)));
    }

    #[test]
    fn invalid_grant_body_maps_to_auth() {
        let err = status_error(StatusCode::BAD_REQUEST, Some(r#"{"error":"invalid_grant"}"#));
        assert!(matches!(err, SlotwiseError::Auth(ref msg) if msg.contains("invalid_grant")));
    }

    #[test]
    fn io_not_found_maps_to_not_found() {
        let err = IoError::new(std::io::ErrorKind::NotFound, "slotwise-data.json");
        let mapped: SlotwiseError = InfraError::from(err).into();
        assert!(matches!(mapped, SlotwiseError::NotFound(_)));
    }

    #[test]
    fn malformed_json_maps_to_invalid_input() {
        let err = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let mapped: SlotwiseError = InfraError::from(err).into();
        assert!(matches!(mapped, SlotwiseError::InvalidInput(_)));
    }
}
