//! Typed client for the cinema ticketing REST API.
//!
//! One [`ApiClient`] wraps a `reqwest::Client` plus the configured base
//! URL; per-resource calls live in [`cinemas`] and [`showtimes`].
//! Responses follow the backend's loose conventions: a 2xx with an
//! empty body is success-with-no-payload, and error bodies may be JSON
//! with a `message` field, plain text, or empty.

pub mod cinemas;
pub mod showtimes;

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::config::ApiConfig;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (DNS, refused
    /// connection, timeout, broken body stream).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The request was abandoned via its cancellation token. Never
    /// shown to the user; callers that cancelled swallow it.
    #[error("request cancelled")]
    Cancelled,

    /// A 2xx response carried a body this client could not decode.
    #[error("invalid response body: {0}")]
    Decode(String),

    /// Non-success HTTP status; `message` is already human-readable.
    #[error("{message}")]
    Api { status: StatusCode, message: String },
}

impl ApiError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled)
    }
}

/// Client for the ticketing backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .expect("Failed to create HTTP client"),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turns a non-2xx response into an [`ApiError::Api`], passing 2xx
    /// responses through untouched.
    pub(crate) async fn ensure_success(res: Response) -> Result<Response, ApiError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res);
        }
        let body = res.text().await.unwrap_or_default();
        Err(ApiError::Api {
            status,
            message: extract_message(status, &body),
        })
    }

    /// Reads a success response body, treating an empty body as "no
    /// payload" rather than a decode failure.
    pub(crate) async fn json_body<T: DeserializeOwned>(
        res: Response,
    ) -> Result<Option<T>, ApiError> {
        let text = res.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`Self::json_body`] but for endpoints that must return an
    /// entity (create calls).
    pub(crate) async fn required_json<T: DeserializeOwned>(res: Response) -> Result<T, ApiError> {
        Self::json_body(res)
            .await?
            .ok_or_else(|| ApiError::Decode("empty response body where one was expected".into()))
    }
}

/// Races `fut` against the cancellation token; a cancelled token wins
/// as [`ApiError::Cancelled`] and the request future is dropped.
pub(crate) async fn cancellable<T, F>(cancel: &CancellationToken, fut: F) -> Result<T, ApiError>
where
    F: Future<Output = Result<T, ApiError>>,
{
    tokio::select! {
        _ = cancel.cancelled() => Err(ApiError::Cancelled),
        res = fut => res,
    }
}

/// Best-effort extraction of a human-readable error message: JSON
/// `message` field, else the raw body, else the status code.
fn extract_message(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        return format!("HTTP {}", status.as_u16());
    }
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(message) = value.get("message").and_then(|m| m.as_str()) {
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }
    body.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_from_json_body() {
        let msg = extract_message(
            StatusCode::CONFLICT,
            r#"{"message":"Seat 7 is already booked"}"#,
        );
        assert_eq!(msg, "Seat 7 is already booked");
    }

    #[test]
    fn raw_text_when_body_is_not_json() {
        let msg = extract_message(StatusCode::BAD_REQUEST, "cinema name taken");
        assert_eq!(msg, "cinema name taken");
    }

    #[test]
    fn raw_text_when_json_lacks_message() {
        let msg = extract_message(StatusCode::BAD_REQUEST, r#"{"error":"nope"}"#);
        assert_eq!(msg, r#"{"error":"nope"}"#);
    }

    #[test]
    fn status_code_when_body_is_empty() {
        let msg = extract_message(StatusCode::INTERNAL_SERVER_ERROR, "  ");
        assert_eq!(msg, "HTTP 500");
    }
}
