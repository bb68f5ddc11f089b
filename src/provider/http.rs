//! Shared HTTP client and error mapping utilities.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use crate::error::VisionError;

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Longest upstream error body kept in messages.
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Get (or create) the shared reqwest client.
///
/// No overall request timeout is set here; callers bound each call themselves.
pub fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Build default headers for a Bearer-token API.
pub fn bearer_headers(api_key: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Ok(val) = HeaderValue::from_str(&format!("Bearer {api_key}")) {
        headers.insert(AUTHORIZATION, val);
    }
    headers
}

/// Map a non-2xx response to an API fault carrying the status and raw body.
pub fn status_to_error(status: u16, body: &str) -> VisionError {
    let message = extract_error_message(body).unwrap_or_else(|| truncate(body));
    VisionError::api_with_body(status, message, body)
}

/// Map a reqwest failure. Connection and timeout failures become network faults.
pub fn transport_error(err: reqwest::Error) -> VisionError {
    if err.is_connect() || err.is_timeout() {
        VisionError::Network {
            message: format!("Network connection failed: {err}"),
            url: err.url().map(|u| u.to_string()),
        }
    } else {
        VisionError::Http(err)
    }
}

fn extract_error_message(body: &str) -> Option<String> {
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    let error = value.get("error")?;
    error
        .get("message")
        .and_then(|m| m.as_str())
        .or_else(|| error.as_str())
        .map(str::to_string)
}

fn truncate(body: &str) -> String {
    if body.trim().is_empty() {
        return "empty response body".to_string();
    }
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}
