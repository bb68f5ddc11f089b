//! The `analyze_image` and `analyze_video` tools.

use std::sync::Arc;

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::tool::Tool;
use super::types::ToolParameters;
use crate::error::{ErrorContext, StandardError};
use crate::media::MediaKind;
use crate::pipeline::AnalysisPipeline;

/// Analysis tool bound to one media kind.
pub struct AnalyzeTool {
    kind: MediaKind,
    name: String,
    description: String,
    source_param: String,
    parameters: ToolParameters,
    pipeline: Arc<AnalysisPipeline>,
}

impl AnalyzeTool {
    pub fn new(kind: MediaKind, pipeline: Arc<AnalysisPipeline>) -> Self {
        let (description, source_doc) = match kind {
            MediaKind::Image => (
                "Analyze an image with the vision model. Accepts a local file path or an http(s) URL (JPG, JPEG or PNG, up to the configured size limit).",
                "Local file path or remote URL of the image",
            ),
            MediaKind::Video => (
                "Analyze a video with the vision model. Accepts a local file path or an http(s) URL (MP4, MOV, M4V and similar, up to the configured size limit).",
                "Local file path or remote URL of the video",
            ),
        };
        let source_param = format!("{kind}_source");
        let parameters = ToolParameters::object()
            .string(source_param.as_str(), source_doc, true)
            .string("prompt", "What to look for or describe", true)
            .build();

        Self {
            kind,
            name: format!("analyze_{kind}"),
            description: description.to_string(),
            source_param,
            parameters,
            pipeline,
        }
    }

    pub fn image(pipeline: Arc<AnalysisPipeline>) -> Self {
        Self::new(MediaKind::Image, pipeline)
    }

    pub fn video(pipeline: Arc<AnalysisPipeline>) -> Self {
        Self::new(MediaKind::Video, pipeline)
    }
}

#[async_trait]
impl Tool for AnalyzeTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn parameters(&self) -> &ToolParameters {
        &self.parameters
    }

    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, StandardError> {
        let fields = args
            .get_str(&self.source_param)
            .and_then(|source| Ok((source, args.get_str("prompt")?)));
        let (source, prompt) = match fields {
            Ok(fields) => fields,
            Err(fault) => {
                let inner = self
                    .pipeline
                    .handler()
                    .classify(fault, ErrorContext::for_operation(self.name.as_str()));
                return Err(StandardError::tool_execution(&self.name, inner));
            }
        };

        self.pipeline
            .analyze(self.kind, source, prompt)
            .await
            .map(serde_json::Value::String)
            .map_err(|inner| StandardError::tool_execution(&self.name, inner))
    }
}

impl std::fmt::Debug for AnalyzeTool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalyzeTool")
            .field("name", &self.name)
            .field("source_param", &self.source_param)
            .finish()
    }
}
