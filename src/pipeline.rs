//! Per-request execution: Validating → Encoding → Calling → Formatting.
//!
//! The prompt is checked once up front. Source validation, encoding and the
//! remote call run together under the retry policy, so a failure in any of
//! them re-runs all three. Whatever fails last is classified once, after
//! retries are exhausted.

use std::sync::Arc;

use strum::Display;
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::config::VisionConfig;
use crate::error::{ErrorContext, ErrorHandler, RecoveryCoordinator, StandardError, VisionError};
use crate::format::ResultEnvelope;
use crate::media::{encode_source, validate_prompt, validate_source, AnalysisRequest, MediaKind};
use crate::provider::{CompletionProvider, VisionClient, VisionRequest};

/// Request stage, used in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Validating,
    Encoding,
    Calling,
    Formatting,
}

/// Runs analysis requests against a [`CompletionProvider`].
#[derive(Clone)]
pub struct AnalysisPipeline {
    config: Arc<VisionConfig>,
    provider: Arc<dyn CompletionProvider>,
    handler: ErrorHandler,
}

impl AnalysisPipeline {
    /// Pipeline backed by the HTTP [`VisionClient`].
    pub fn new(config: Arc<VisionConfig>) -> Self {
        let provider = Arc::new(VisionClient::new(Arc::clone(&config)));
        Self::with_provider(config, provider)
    }

    /// Pipeline backed by any provider. Recovery uses the configured delay.
    pub fn with_provider(config: Arc<VisionConfig>, provider: Arc<dyn CompletionProvider>) -> Self {
        let handler = ErrorHandler::new(RecoveryCoordinator::with_delay(config.recovery_delay()));
        Self {
            config,
            provider,
            handler,
        }
    }

    pub fn config(&self) -> &VisionConfig {
        &self.config
    }

    pub fn handler(&self) -> &ErrorHandler {
        &self.handler
    }

    /// Analyze one source. Failures come back classified.
    pub async fn analyze(
        &self,
        kind: MediaKind,
        source: &str,
        prompt: &str,
    ) -> Result<String, StandardError> {
        let request_id = Uuid::new_v4();
        let span = info_span!("analyze", %request_id, %kind);

        async move {
            match self.execute(kind, source, prompt).await {
                Ok(text) => Ok(text),
                Err(fault) => {
                    let context = ErrorContext::for_operation(format!("analyze_{kind}"))
                        .with("request_id", request_id.to_string())
                        .with("source", source)
                        .with("kind", kind.to_string())
                        .with("max_attempts", self.config.retry_count() + 1);
                    Err(self.handler.classify_and_handle(fault, context).await)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Analyze and wrap the outcome in an envelope.
    pub async fn run(&self, kind: MediaKind, source: &str, prompt: &str) -> ResultEnvelope {
        let result = self.analyze(kind, source, prompt).await;
        debug!(stage = %Stage::Formatting, success = result.is_ok(), "Formatting result");
        ResultEnvelope::from_result(result)
    }

    pub async fn analyze_image(&self, source: &str, prompt: &str) -> ResultEnvelope {
        self.run(MediaKind::Image, source, prompt).await
    }

    pub async fn analyze_video(&self, source: &str, prompt: &str) -> ResultEnvelope {
        self.run(MediaKind::Video, source, prompt).await
    }

    async fn execute(&self, kind: MediaKind, raw: &str, prompt: &str) -> Result<String, VisionError> {
        let prompt = validate_prompt(prompt)?;
        let policy = self.config.media_policy(kind);
        let policy = &policy;
        let provider = &self.provider;

        self.config
            .retry_policy()
            .execute(move || async move {
                debug!(stage = %Stage::Validating, "Validating source");
                let request = AnalysisRequest {
                    kind,
                    source: validate_source(raw, policy).await?,
                    prompt: prompt.to_string(),
                };

                debug!(stage = %Stage::Encoding, remote = request.source.is_remote(), "Encoding source");
                let encoded = encode_source(&request.source, request.kind).await?;

                debug!(stage = %Stage::Calling, model = provider.model_id(), "Calling provider");
                provider
                    .complete(&VisionRequest::single(request.kind, encoded, request.prompt))
                    .await
            })
            .await
    }
}

impl std::fmt::Debug for AnalysisPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisPipeline")
            .field("config", &self.config)
            .field("provider", &self.provider.model_id())
            .field("handler", &self.handler)
            .finish()
    }
}
