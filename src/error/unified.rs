//! Unified error taxonomy: kinds, severities, categories and the classified error value.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::context::ErrorContext;

/// How bad an error is. Drives the log level used by the handler.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Broad area an error belongs to, used to route recovery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Validation,
    Authentication,
    Authorization,
    Network,
    Api,
    Business,
    System,
    Unknown,
}

/// Kind tag of a classified error. Each kind has fixed defaults, see [`ErrorKind::defaults`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    ResourceNotFound,
    Network,
    Api,
    Authentication,
    Authorization,
    ToolExecution,
    Unknown,
}

/// Default (severity, category, recoverable) triple of a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindDefaults {
    pub severity: Severity,
    pub category: ErrorCategory,
    pub recoverable: bool,
}

impl ErrorKind {
    pub fn defaults(self) -> KindDefaults {
        use ErrorCategory as C;
        use Severity as S;

        let (severity, category, recoverable) = match self {
            Self::Validation => (S::Medium, C::Business, true),
            Self::ResourceNotFound => (S::Medium, C::Business, true),
            Self::Network => (S::Medium, C::Network, true),
            Self::Api => (S::High, C::System, false),
            Self::Authentication => (S::High, C::Authentication, false),
            Self::Authorization => (S::High, C::Authorization, false),
            Self::ToolExecution => (S::Medium, C::Business, true),
            Self::Unknown => (S::High, C::System, false),
        };
        KindDefaults {
            severity,
            category,
            recoverable,
        }
    }

    /// Machine-readable code used when none is given explicitly.
    pub fn default_code(self) -> &'static str {
        match self {
            Self::Validation => "VALIDATION_ERROR",
            Self::ResourceNotFound => "RESOURCE_NOT_FOUND",
            Self::Network => "NETWORK_ERROR",
            Self::Api => "API_ERROR",
            Self::Authentication => "AUTHENTICATION_ERROR",
            Self::Authorization => "AUTHORIZATION_ERROR",
            Self::ToolExecution => "TOOL_EXECUTION_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }
}

/// A classified error. Fields are fixed at construction; the `with_*` builders
/// consume the value and return a new one.
#[derive(Clone)]
pub struct StandardError {
    kind: ErrorKind,
    code: String,
    message: String,
    severity: Severity,
    category: ErrorCategory,
    context: ErrorContext,
    cause: Option<Arc<dyn StdError + Send + Sync>>,
    recoverable: bool,
}

impl StandardError {
    /// Build an error of `kind` using that kind's table defaults.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let defaults = kind.defaults();
        Self {
            kind,
            code: kind.default_code().to_string(),
            message: message.into(),
            severity: defaults.severity,
            category: defaults.category,
            context: ErrorContext::new(),
            cause: None,
            recoverable: defaults.recoverable,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ResourceNotFound, message)
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Network, message)
    }

    pub fn api(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Api, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unknown, message)
    }

    /// Wrap an error raised inside a tool body. The message stays the inner one.
    pub fn tool_execution(tool_name: &str, inner: StandardError) -> Self {
        let context = ErrorContext::for_operation(tool_name)
            .with("tool", tool_name)
            .with("inner_code", inner.code.clone())
            .merge(inner.context.clone());
        Self::new(ErrorKind::ToolExecution, inner.message.clone())
            .with_context(context)
            .with_cause(inner)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_category(mut self, category: ErrorCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_recoverable(mut self, recoverable: bool) -> Self {
        self.recoverable = recoverable;
        self
    }

    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_cause(mut self, cause: impl StdError + Send + Sync + 'static) -> Self {
        self.cause = Some(Arc::new(cause));
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.cause.as_deref()
    }

    pub fn is_recoverable(&self) -> bool {
        self.recoverable
    }

    /// Messages of the full cause chain, outermost first, excluding `self`.
    pub fn cause_chain(&self) -> Vec<String> {
        let mut chain = Vec::new();
        let mut current = StdError::source(self);
        while let Some(err) = current {
            chain.push(err.to_string());
            current = err.source();
        }
        chain
    }
}

impl fmt::Display for StandardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for StandardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardError")
            .field("kind", &self.kind)
            .field("code", &self.code)
            .field("message", &self.message)
            .field("severity", &self.severity)
            .field("category", &self.category)
            .field("recoverable", &self.recoverable)
            .field("context", &self.context)
            .field("cause", &self.cause.as_ref().map(|c| c.to_string()))
            .finish()
    }
}

impl StdError for StandardError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn StdError + 'static))
    }
}
