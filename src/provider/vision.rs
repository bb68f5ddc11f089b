//! Chat-completions client for vision models.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::config::VisionConfig;
use crate::error::VisionError;
use crate::util::timeout::with_timeout;

use super::http::{bearer_headers, shared_client, status_to_error, transport_error};
use super::{CompletionProvider, VisionRequest};

/// Issues one `POST {base_url}/chat/completions` per [`CompletionProvider::complete`] call.
#[derive(Debug, Clone)]
pub struct VisionClient {
    config: Arc<VisionConfig>,
    http: reqwest::Client,
}

impl VisionClient {
    pub fn new(config: Arc<VisionConfig>) -> Self {
        Self::with_http_client(config, shared_client().clone())
    }

    pub fn with_http_client(config: Arc<VisionConfig>, http: reqwest::Client) -> Self {
        Self { config, http }
    }

    pub fn build_request_body(&self, request: &VisionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.config.model(),
            "messages": [{
                "role": "user",
                "content": request.content(),
            }],
            "thinking": { "type": "enabled" },
            "stream": false,
            "temperature": self.config.temperature(),
            "top_p": self.config.top_p(),
            "max_tokens": self.config.max_tokens(),
        })
    }

    async fn send(&self, body: &serde_json::Value) -> Result<String, VisionError> {
        let url = self.config.endpoint();
        let resp = self
            .http
            .post(&url)
            .headers(bearer_headers(self.config.api_key()))
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_to_error(status.as_u16(), &text));
        }
        parse_completion(status.as_u16(), &text)
    }
}

#[async_trait]
impl CompletionProvider for VisionClient {
    fn model_id(&self) -> &str {
        self.config.model()
    }

    async fn complete(&self, request: &VisionRequest) -> Result<String, VisionError> {
        let body = self.build_request_body(request);
        debug!(
            model = self.config.model(),
            media_items = request.media.len(),
            timeout_ms = self.config.timeout().as_millis() as u64,
            "Vision completion request"
        );
        with_timeout(self.config.timeout(), self.send(&body)).await
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChatMessage>,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Pull the first choice's content out of a 2xx body. Missing or blank content is an API fault.
fn parse_completion(status: u16, body: &str) -> Result<String, VisionError> {
    let data: ChatResponse = serde_json::from_str(body).map_err(|e| {
        VisionError::api_with_body(status, format!("Malformed completion response: {e}"), body)
    })?;

    data.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| {
            VisionError::api_with_body(status, "Invalid API response: missing content", body)
        })
}
