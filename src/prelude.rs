//! Convenience re-exports for common use.

pub use crate::config::{ConfigError, PlatformMode, VisionConfig};
pub use crate::error::{
    ErrorCategory, ErrorContext, ErrorHandler, ErrorKind, Result, Severity, StandardError,
    VisionError,
};
pub use crate::format::{ResultEnvelope, ToolOutput};
pub use crate::media::{MediaKind, MediaSource};
pub use crate::pipeline::AnalysisPipeline;
pub use crate::provider::{CompletionProvider, VisionClient, VisionRequest};
pub use crate::tools::{Tool, ToolArguments, ToolRegistry};
pub use crate::util::retry::{with_retry, RetryPolicy};
