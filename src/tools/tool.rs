//! Tool trait.

use async_trait::async_trait;

use super::arguments::ToolArguments;
use super::types::{ToolDefinition, ToolParameters};
use crate::error::StandardError;

/// Core tool trait, implemented by everything the registry can dispatch to.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (must match what the host calls).
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> &str;

    /// JSON Schema parameters.
    fn parameters(&self) -> &ToolParameters;

    /// Execute the tool with arguments that already passed schema validation.
    async fn execute(&self, args: &ToolArguments) -> Result<serde_json::Value, StandardError>;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.parameters().schema.clone(),
        }
    }
}
