//! Shared test helpers and a scripted completion provider.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use vision_relay::config::VisionConfig;
use vision_relay::error::VisionError;
use vision_relay::provider::{CompletionProvider, VisionRequest};

/// A provider that replays queued outcomes and records what it was sent.
#[derive(Default)]
pub struct ScriptedProvider {
    outcomes: Mutex<VecDeque<Result<String, VisionError>>>,
    requests: Mutex<Vec<VisionRequest>>,
    calls: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queue a successful completion.
    pub fn queue_text(&self, text: &str) {
        self.outcomes.lock().unwrap().push_back(Ok(text.to_string()));
    }

    /// Queue a failed completion.
    pub fn queue_error(&self, err: VisionError) {
        self.outcomes.lock().unwrap().push_back(Err(err));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<VisionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionProvider for ScriptedProvider {
    fn model_id(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &VisionRequest) -> Result<String, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("default response".to_string()))
    }
}

/// Config with tiny delays so retry paths finish quickly.
pub fn fast_config() -> VisionConfig {
    VisionConfig::builder()
        .api_key("test-key")
        .retry_delay(Duration::from_millis(1))
        .recovery_delay(Duration::ZERO)
        .build()
}

/// Same as [`fast_config`] but pointed at a mock server.
pub fn config_for(base_url: &str) -> VisionConfig {
    VisionConfig::builder()
        .api_key("test-key")
        .base_url(base_url)
        .retry_count(0)
        .retry_delay(Duration::from_millis(1))
        .recovery_delay(Duration::ZERO)
        .build()
}
