use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::CONFIG;
use crate::utils::http::get_http_client;

pub const GENERATE_PATH: &str = "/api/generate";
pub const REFINE_PATH: &str = "/api/refine";
pub const COMPLETE_PATH: &str = "/api/complete";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("request timed out after {0:?}")]
    TimedOut(Duration),
    #[error("request cancelled")]
    Cancelled,
    #[error("{message}")]
    Status { status: StatusCode, message: String },
}

/// Outcome of parsing a response body that is allowed to be empty or
/// malformed. `Defaulted` marks the degraded path explicitly so callers (and
/// readers) can see that a substitute value is in play.
#[derive(Debug, PartialEq)]
pub enum ParsedBody<T> {
    Json(T),
    Defaulted(T),
}

impl<T> ParsedBody<T> {
    pub fn into_inner(self) -> T {
        match self {
            ParsedBody::Json(value) => value,
            ParsedBody::Defaulted(value) => value,
        }
    }

    pub fn was_defaulted(&self) -> bool {
        matches!(self, ParsedBody::Defaulted(_))
    }
}

/// Parses `text` as JSON, substituting `T::default()` for an empty or
/// unparseable body. Only valid on a 2xx response; error statuses are handled
/// before this runs.
pub fn parse_or_default<T: DeserializeOwned + Default>(text: &str) -> ParsedBody<T> {
    if text.trim().is_empty() {
        return ParsedBody::Defaulted(T::default());
    }
    match serde_json::from_str(text) {
        Ok(value) => ParsedBody::Json(value),
        Err(err) => {
            debug!("Treating unparseable response body as empty: {err}");
            ParsedBody::Defaulted(T::default())
        }
    }
}

/// Best available error message for a non-2xx response: a structured `error`
/// field wins, then the raw body, then the status line.
fn status_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        if let Some(message) = value.get("error").and_then(|field| field.as_str()) {
            return message.to_string();
        }
    }
    if !body.trim().is_empty() {
        return body.trim().to_string();
    }
    status
        .canonical_reason()
        .map(|reason| reason.to_string())
        .unwrap_or_else(|| status.to_string())
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    start_timeout: Duration,
    request_timeout: Duration,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        ApiClient {
            base_url,
            start_timeout: Duration::from_millis(CONFIG.start_timeout_ms),
            request_timeout: Duration::from_millis(CONFIG.request_timeout_ms),
        }
    }

    pub fn from_config() -> Self {
        ApiClient::new(CONFIG.backend_base_url.clone())
    }

    pub fn with_timeouts(mut self, start: Duration, request: Duration) -> Self {
        self.start_timeout = start;
        self.request_timeout = request;
        self
    }

    pub fn start_timeout(&self) -> Duration {
        self.start_timeout
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    /// POSTs a JSON body and reads the response defensively: the body is read
    /// as text first, parsed with `parse_or_default` on success statuses, and
    /// turned into an `ApiError::Status` otherwise. The whole exchange races
    /// against `cancel` and `timeout`; a timeout also cancels the token so an
    /// expired request cannot apply a late result.
    pub async fn post_json<T>(
        &self,
        path: &str,
        body: &impl Serialize,
        cancel: &CancellationToken,
        timeout: Duration,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let url = format!("{}{}", self.base_url, path);
        let exchange = async {
            let response = get_http_client().post(&url).json(body).send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<(StatusCode, String), reqwest::Error>((status, text))
        };

        let (status, text) = tokio::select! {
            _ = cancel.cancelled() => {
                debug!("Request to {url} cancelled");
                return Err(ApiError::Cancelled);
            }
            _ = tokio::time::sleep(timeout) => {
                warn!("Request to {url} timed out after {timeout:?}");
                cancel.cancel();
                return Err(ApiError::TimedOut(timeout));
            }
            result = exchange => result?,
        };

        if !status.is_success() {
            return Err(ApiError::Status {
                status,
                message: status_message(status, &text),
            });
        }

        let parsed = parse_or_default::<T>(&text);
        if parsed.was_defaulted() {
            debug!("Empty or malformed body from {url}, using defaults");
        }
        Ok(parsed.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CandidateResponse;

    #[test]
    fn empty_body_parses_to_default() {
        let parsed = parse_or_default::<CandidateResponse>("");
        assert!(parsed.was_defaulted());
        assert!(parsed.into_inner().options.is_empty());
    }

    #[test]
    fn garbage_body_parses_to_default() {
        let parsed = parse_or_default::<CandidateResponse>("<html>bad gateway</html>");
        assert!(parsed.was_defaulted());
    }

    #[test]
    fn valid_body_parses_to_json() {
        let parsed =
            parse_or_default::<CandidateResponse>(r#"{"options":["img/x.png","img/y.png"]}"#);
        assert!(!parsed.was_defaulted());
        let response = parsed.into_inner();
        assert_eq!(response.options, vec!["img/x.png", "img/y.png"]);
    }

    #[test]
    fn status_message_prefers_structured_error_field() {
        let message = status_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error":"quota exceeded"}"#,
        );
        assert_eq!(message, "quota exceeded");
    }

    #[test]
    fn status_message_falls_back_to_raw_body() {
        let message = status_message(StatusCode::BAD_GATEWAY, "upstream unavailable");
        assert_eq!(message, "upstream unavailable");
    }

    #[test]
    fn status_message_falls_back_to_status_line() {
        let message = status_message(StatusCode::SERVICE_UNAVAILABLE, "  ");
        assert_eq!(message, "Service Unavailable");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:9999/");
        assert_eq!(client.base_url, "http://localhost:9999");
    }
}
