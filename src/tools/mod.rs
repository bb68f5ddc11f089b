//! Tool surface exposed to the host protocol layer.

pub mod analyze;
pub mod arguments;
pub mod tool;
pub mod types;
pub mod validation;

pub use analyze::AnalyzeTool;
pub use arguments::ToolArguments;
pub use tool::Tool;
pub use types::{ParameterBuilder, ToolDefinition, ToolParameters};
pub use validation::validate_arguments;

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{ErrorContext, ErrorHandler, StandardError, VisionError};
use crate::format::{ResultEnvelope, ToolOutput};
use crate::pipeline::AnalysisPipeline;

/// Named tools plus the handler used for faults raised before a tool runs.
#[derive(Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    handler: ErrorHandler,
}

impl ToolRegistry {
    pub fn new(handler: ErrorHandler) -> Self {
        Self {
            tools: Vec::new(),
            handler,
        }
    }

    /// `analyze_image` and `analyze_video` sharing one pipeline.
    pub fn builtin(pipeline: Arc<AnalysisPipeline>) -> Self {
        Self::new(pipeline.handler().clone())
            .register(Arc::new(AnalyzeTool::image(Arc::clone(&pipeline))))
            .register(Arc::new(AnalyzeTool::video(pipeline)))
    }

    /// Add a tool. A later tool with the same name replaces the earlier one.
    pub fn register(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.retain(|existing| existing.name() != tool.name());
        self.tools.push(tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|tool| tool.name() == name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|tool| tool.definition()).collect()
    }

    /// Dispatch one call. Every failure comes back as an error-flagged output.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> ToolOutput {
        info!(tool = name, "Tool call");
        let result = self.dispatch(name, arguments).await;
        debug!(tool = name, success = result.is_ok(), "Tool call finished");
        ResultEnvelope::from_result(result).render()
    }

    async fn dispatch(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, StandardError> {
        let Some(tool) = self.get(name) else {
            let fault = VisionError::invalid_field("name", format!("Unknown tool: {name}"));
            return Err(self.reject(name, fault).await);
        };

        if let Err(fault) = validate_arguments(&arguments, &tool.parameters().schema) {
            return Err(self.reject(name, fault).await);
        }

        tool.execute(&ToolArguments::new(arguments)).await
    }

    async fn reject(&self, name: &str, fault: VisionError) -> StandardError {
        let inner = self
            .handler
            .classify_and_handle(fault, ErrorContext::for_operation(name))
            .await;
        StandardError::tool_execution(name, inner)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish()
    }
}
